use std::{
  fs,
  io::{self, Read},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use folio_config::OutputFormat;
use folio_render::RenderedContent;
use log::trace;
use walkdir::WalkDir;

/// Path argument that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// A document queued for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
  /// Standard input.
  Stdin,
  /// A file on disk.
  File {
    /// Where to read the document from.
    path:     PathBuf,
    /// Path of the document relative to the input it was found under. Used
    /// to lay out the output directory.
    relative: PathBuf,
  },
}

impl Source {
  /// Name used in log messages.
  #[must_use]
  pub fn display_name(&self) -> String {
    match self {
      Self::Stdin => "<stdin>".to_string(),
      Self::File { path, .. } => path.display().to_string(),
    }
  }

  /// Read the whole document.
  ///
  /// # Errors
  ///
  /// Returns an error if the document cannot be read.
  pub fn read(&self) -> Result<String> {
    match self {
      Self::Stdin => {
        let mut content = String::new();
        io::stdin()
          .read_to_string(&mut content)
          .wrap_err("Failed to read from stdin")?;
        Ok(content)
      },
      Self::File { path, .. } => {
        fs::read_to_string(path).wrap_err_with(|| {
          format!("Failed to read document: {}", path.display())
        })
      },
    }
  }

  /// Output location under `output_dir` for this document.
  #[must_use]
  pub fn output_path(
    &self,
    output_dir: &Path,
    format: OutputFormat,
  ) -> PathBuf {
    let mut path = match self {
      Self::Stdin => output_dir.join("stdin"),
      Self::File { relative, .. } => output_dir.join(relative),
    };
    path.set_extension(format.extension());
    path
  }
}

/// Whether `path` looks like an HTML document.
#[must_use]
pub fn is_html_file(path: &Path) -> bool {
  path.is_file()
    && path.extension().is_some_and(|ext| {
      ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
    })
}

/// Collect all HTML files below `input_dir`, sorted for deterministic output.
#[must_use]
pub fn collect_html_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
    .map(walkdir::DirEntry::into_path)
    .filter(|path| is_html_file(path))
    .collect();

  files.sort();
  trace!("Found {} HTML files in {}", files.len(), input_dir.display());
  files
}

/// Expand command line inputs into the documents to render.
///
/// # Errors
///
/// Returns an error if an input does not exist, or if stdin is requested more
/// than once.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<Source>> {
  let mut sources = Vec::with_capacity(inputs.len());
  let mut seen_stdin = false;

  for input in inputs {
    if input.as_os_str() == STDIN_PATH {
      if seen_stdin {
        bail!("Standard input can only be read once");
      }
      seen_stdin = true;
      sources.push(Source::Stdin);
    } else if input.is_dir() {
      for path in collect_html_files(input) {
        let relative = path
          .strip_prefix(input)
          .wrap_err_with(|| {
            format!(
              "Failed to determine relative path for {}",
              path.display()
            )
          })?
          .to_path_buf();
        sources.push(Source::File { path, relative });
      }
    } else if input.is_file() {
      let relative = input
        .file_name()
        .map_or_else(|| input.clone(), PathBuf::from);
      sources.push(Source::File {
        path: input.clone(),
        relative,
      });
    } else {
      bail!("Input does not exist: {}", input.display());
    }
  }

  Ok(sources)
}

/// Serialize rendered content in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_rendered(
  rendered: &RenderedContent,
  format: OutputFormat,
) -> Result<String> {
  match format {
    OutputFormat::Html => Ok(rendered.html.clone()),
    OutputFormat::Json => {
      serde_json::to_string_pretty(rendered)
        .wrap_err("Failed to serialize rendered content")
    },
  }
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::write(path, content)
    .wrap_err_with(|| format!("Failed to write output: {}", path.display()))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_collect_sources_walks_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("guide")).unwrap();
    fs::write(dir.path().join("index.html"), "<h1>i</h1>").unwrap();
    fs::write(dir.path().join("guide/setup.HTM"), "<h1>s</h1>").unwrap();
    fs::write(dir.path().join("notes.md"), "# no").unwrap();

    let sources = collect_sources(&[dir.path().to_path_buf()]).unwrap();
    let relative: Vec<_> = sources
      .iter()
      .map(|source| {
        match source {
          Source::File { relative, .. } => relative.clone(),
          Source::Stdin => PathBuf::from("-"),
        }
      })
      .collect();

    assert_eq!(relative, vec![
      PathBuf::from("guide/setup.HTM"),
      PathBuf::from("index.html")
    ]);
  }

  #[test]
  fn test_collect_sources_rejects_missing_input() {
    let dir = TempDir::new().unwrap();
    assert!(collect_sources(&[dir.path().join("missing.html")]).is_err());
  }

  #[test]
  fn test_stdin_only_once() {
    let stdin = PathBuf::from(STDIN_PATH);
    assert_eq!(collect_sources(&[stdin.clone()]).unwrap(), vec![
      Source::Stdin
    ]);
    assert!(collect_sources(&[stdin.clone(), stdin]).is_err());
  }

  #[test]
  fn test_output_path_uses_format_extension() {
    let source = Source::File {
      path:     PathBuf::from("in/guide/setup.htm"),
      relative: PathBuf::from("guide/setup.htm"),
    };
    assert_eq!(
      source.output_path(Path::new("out"), OutputFormat::Json),
      PathBuf::from("out/guide/setup.json")
    );
    assert_eq!(
      Source::Stdin.output_path(Path::new("out"), OutputFormat::Html),
      PathBuf::from("out/stdin.html")
    );
  }
}
