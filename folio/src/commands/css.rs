use std::io::Write;

use color_eyre::eyre::{Context, Result};
use folio_config::Config;
use folio_render::create_default_manager;

/// Run the `css` command: print the stylesheet matching the classes emitted by
/// the highlighter.
///
/// # Errors
///
/// Returns an error if no highlighting backend is available, the theme does
/// not exist, or the output cannot be written.
pub fn run(
  config: &Config,
  theme: Option<&str>,
  out: &mut impl Write,
) -> Result<()> {
  let manager =
    create_default_manager().wrap_err("Syntax highlighting unavailable")?;
  let theme = theme.or_else(|| config.highlight_theme());
  let css = manager
    .stylesheet(theme)
    .wrap_err("Failed to generate highlight stylesheet")?;

  out
    .write_all(css.as_bytes())
    .wrap_err("Failed to write stylesheet")
}
