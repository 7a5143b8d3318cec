pub mod css;
pub mod init;
pub mod outline;
pub mod render;

use color_eyre::eyre::{Context, Result};
use folio_config::Config;
use folio_render::ContentProcessor;

use crate::cli::Cli;

/// Load configuration files and overrides named on the command line, then
/// apply the global flags on top.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn load_config(cli: &Cli) -> Result<Config> {
  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  if cli.jobs.is_some() {
    config.jobs = cli.jobs;
  }
  config.validate().wrap_err("Invalid configuration")?;

  Ok(config)
}

/// Content processor described by `config`.
#[must_use]
pub fn create_processor(config: &Config) -> ContentProcessor {
  ContentProcessor::new(config.processor_options())
}
