use std::{io::Write, path::Path};

use color_eyre::eyre::{Context, Result};
use folio_config::Config;
use folio_render::{OutlineEntry, process_with_recovery};

use super::create_processor;
use crate::utils::{STDIN_PATH, Source};

/// Render the outline as an indented list, one entry per line.
///
/// Entries are indented by heading level, not by nesting, so a document that
/// skips levels keeps its original depths.
#[must_use]
pub fn format_outline(outline: &[OutlineEntry]) -> String {
  let mut text = String::new();
  for entry in outline {
    let depth = usize::from(entry.level.saturating_sub(1));
    text.push_str(&"  ".repeat(depth));
    text.push_str("- ");
    text.push_str(&entry.text);
    text.push_str(" (#");
    text.push_str(&entry.id);
    text.push_str(")\n");
  }
  text
}

/// Run the `outline` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output written.
pub fn run(
  config: &Config,
  input: &Path,
  json: bool,
  out: &mut impl Write,
) -> Result<()> {
  let source = if input.as_os_str() == STDIN_PATH {
    Source::Stdin
  } else {
    Source::File {
      path:     input.to_path_buf(),
      relative: input.to_path_buf(),
    }
  };

  let raw = source.read()?;
  let rendered = process_with_recovery(&create_processor(config), &raw);

  let text = if json {
    let mut text = serde_json::to_string_pretty(&rendered.outline)
      .wrap_err("Failed to serialize outline")?;
    text.push('\n');
    text
  } else {
    format_outline(&rendered.outline)
  };

  out
    .write_all(text.as_bytes())
    .wrap_err("Failed to write outline")
}
