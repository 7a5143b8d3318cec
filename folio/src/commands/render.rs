use std::{
  collections::HashMap,
  io::Write,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Report, Result, bail, eyre};
use folio_config::{Config, OutputFormat};
use folio_render::{
  RenderedContent,
  create_default_manager,
  process_with_recovery,
};
use log::{debug, info, warn};
use rayon::prelude::*;

use super::create_processor;
use crate::utils::{self, Source};

/// Name of the stylesheet written next to highlighted output.
pub const STYLESHEET_NAME: &str = "highlight.css";

/// Arguments of the `render` command.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
  pub inputs:       Vec<PathBuf>,
  pub output_dir:   Option<PathBuf>,
  pub format:       Option<String>,
  pub no_highlight: bool,
  pub theme:        Option<String>,
}

impl RenderArgs {
  /// Fold the command line flags into `config`.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown.
  pub fn apply_to(&self, config: &mut Config) -> Result<()> {
    if let Some(ref output_dir) = self.output_dir {
      config.output_dir = Some(output_dir.clone());
    }
    if let Some(ref format) = self.format {
      config.format = Some(format.parse().map_err(|e: String| eyre!(e))?);
    }
    if self.no_highlight {
      config.highlight.get_or_insert_default().enable = false;
    }
    if let Some(ref theme) = self.theme {
      config.highlight.get_or_insert_default().theme = Some(theme.clone());
    }
    Ok(())
  }
}

/// A rendered document together with where it came from.
#[derive(Debug)]
pub struct RenderedSource {
  pub source:   Source,
  pub rendered: RenderedContent,
}

/// Render every source in parallel.
///
/// Each document is processed on its own; one that fails to process is shown
/// unprocessed instead of aborting the batch. Results keep the input order.
///
/// # Errors
///
/// Returns an error if the thread pool cannot be built or a source cannot be
/// read.
pub fn render_sources(
  config: &Config,
  sources: Vec<Source>,
) -> Result<Vec<RenderedSource>> {
  let processor = create_processor(config);
  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to build thread pool")?;

  debug!(
    "Rendering {} documents on {thread_count} threads",
    sources.len()
  );

  pool.install(|| {
    sources
      .into_par_iter()
      .map(|source| {
        let raw = source.read()?;
        let rendered = process_with_recovery(&processor, &raw);
        debug!(
          "Rendered {}: {} outline entries, {} internal links",
          source.display_name(),
          rendered.outline.len(),
          rendered.links.len()
        );
        Ok::<_, Report>(RenderedSource { source, rendered })
      })
      .collect()
  })
}

/// Fail if two sources would be written to the same file below `output_dir`.
///
/// # Errors
///
/// Returns an error naming both sources of the first collision.
pub fn check_output_paths(
  sources: &[Source],
  output_dir: &Path,
  format: OutputFormat,
) -> Result<()> {
  let mut claimed: HashMap<PathBuf, &Source> =
    HashMap::with_capacity(sources.len());

  for source in sources {
    let path = source.output_path(output_dir, format);
    if let Some(previous) = claimed.get(&path) {
      bail!(
        "{} and {} would both be written to {}",
        previous.display_name(),
        source.display_name(),
        path.display()
      );
    }
    claimed.insert(path, source);
  }

  Ok(())
}

/// Run the `render` command.
///
/// With an output directory every document is written below it, mirroring the
/// input layout, and a stylesheet is added when code is highlighted. Without
/// one, documents are written to `out` in input order.
///
/// # Errors
///
/// Returns an error if inputs cannot be collected, read or written, or if two
/// inputs map to the same output file.
pub fn run(
  config: &Config,
  inputs: &[PathBuf],
  out: &mut impl Write,
) -> Result<()> {
  let sources = utils::collect_sources(inputs)?;
  if sources.is_empty() {
    warn!("No HTML documents found in the given inputs");
    return Ok(());
  }

  let format = config.output_format();
  if let Some(ref output_dir) = config.output_dir {
    check_output_paths(&sources, output_dir, format)?;
  }
  let results = render_sources(config, sources)?;

  match config.output_dir {
    Some(ref output_dir) => {
      for result in &results {
        let path = result.source.output_path(output_dir, format);
        let content = utils::format_rendered(&result.rendered, format)?;
        utils::write_output(&path, &content)?;
      }
      if config.is_highlight_enabled() {
        write_stylesheet(config, output_dir)?;
      }
      info!(
        "Rendered {} documents into {}",
        results.len(),
        output_dir.display()
      );
    },
    None => {
      for result in &results {
        let content = utils::format_rendered(&result.rendered, format)?;
        writeln!(out, "{content}").wrap_err("Failed to write output")?;
      }
    },
  }

  Ok(())
}

fn write_stylesheet(config: &Config, output_dir: &Path) -> Result<()> {
  let manager = match create_default_manager() {
    Ok(manager) => manager,
    Err(e) => {
      debug!("Skipping stylesheet: {e}");
      return Ok(());
    },
  };
  let css = manager
    .stylesheet(config.highlight_theme())
    .wrap_err("Failed to generate highlight stylesheet")?;
  utils::write_output(&output_dir.join(STYLESHEET_NAME), &css)
}
