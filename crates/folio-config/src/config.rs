use std::{
  fmt,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

use folio_render::{ProcessorOptions, ProcessorOptionsBuilder};
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  sections::{HeadingsConfig, HighlightConfig, LinksConfig},
};

/// File names searched, in order, when no config file is given.
const CONFIG_FILENAMES: [&str; 6] = [
  "folio.toml",
  "folio.json",
  ".folio.toml",
  ".folio.json",
  ".config/folio.toml",
  ".config/folio.json",
];

/// Serialization of rendered documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// Processed markup only
  #[default]
  Html,
  /// Markup, outline, title and links as a JSON object
  Json,
}

impl OutputFormat {
  /// File extension used for rendered output.
  #[must_use]
  pub const fn extension(self) -> &'static str {
    match self {
      Self::Html => "html",
      Self::Json => "json",
    }
  }
}

impl FromStr for OutputFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "html" => Ok(Self::Html),
      "json" => Ok(Self::Json),
      other => Err(format!("unknown output format '{other}'")),
    }
  }
}

impl fmt::Display for OutputFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

/// Configuration for Folio.
///
/// Every field is optional so that several files can be layered: a value set
/// in a later file replaces the earlier one, and anything left unset falls
/// back to its default through the accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Number of threads to use for batch rendering.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jobs: Option<usize>,

  /// Directory rendered files are written to. Output goes to stdout when
  /// unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_dir: Option<PathBuf>,

  /// Output format of rendered documents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub format: Option<OutputFormat>,

  /// Syntax highlighting options.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub highlight: Option<HighlightConfig>,

  /// Internal link options.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub links: Option<LinksConfig>,

  /// Heading options.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub headings: Option<HeadingsConfig>,
}

impl Config {
  /// Configuration with every field spelled out at its default value.
  #[must_use]
  pub fn documented() -> Self {
    Self {
      jobs:       None,
      output_dir: Some(PathBuf::from("build")),
      format:     Some(OutputFormat::Html),
      highlight:  Some(HighlightConfig::default()),
      links:      Some(LinksConfig::default()),
      headings:   Some(HeadingsConfig::default()),
    }
  }

  /// Output format, defaulting to HTML.
  #[must_use]
  pub fn output_format(&self) -> OutputFormat {
    self.format.unwrap_or_default()
  }

  /// Whether code blocks are highlighted.
  #[must_use]
  pub fn is_highlight_enabled(&self) -> bool {
    self.highlight.as_ref().is_none_or(|h| h.enable)
  }

  /// Highlight theme, if one is configured.
  #[must_use]
  pub fn highlight_theme(&self) -> Option<&str> {
    self.highlight.as_ref().and_then(|h| h.theme.as_deref())
  }

  /// Whether `doc:` links are rewritten.
  #[must_use]
  pub fn is_link_rewriting_enabled(&self) -> bool {
    self.links.as_ref().is_none_or(|l| l.rewrite)
  }

  /// Whether heading ids are written into the markup.
  #[must_use]
  pub fn assigns_heading_ids(&self) -> bool {
    self.headings.as_ref().is_none_or(|h| h.assign_ids)
  }

  /// Processor options described by this configuration.
  #[must_use]
  pub fn processor_options(&self) -> ProcessorOptions {
    ProcessorOptionsBuilder::new()
      .highlight_code(self.is_highlight_enabled())
      .rewrite_internal_links(self.is_link_rewriting_enabled())
      .assign_heading_ids(self.assigns_heading_ids())
      .build()
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, merged in order, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// When no file is given, a config file in a standard location is used if
  /// one exists.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is invalid, or
  /// the result fails validation.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for config_path in rest {
        merged.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Check values that parse but make no sense.
  ///
  /// # Errors
  ///
  /// Returns an error if `jobs` is zero.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.jobs == Some(0) {
      return Err(ConfigError::Config(
        "'jobs' must be at least 1".to_string(),
      ));
    }
    Ok(())
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "highlight.enable=false".to_string(),
  ///     "format=json".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Nested keys use dotted paths such as
  /// `highlight.theme`. An empty value clears optional fields.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some((section, field)) = key.split_once('.') {
      return match section {
        "highlight" => {
          self
            .highlight
            .get_or_insert_default()
            .apply_override(field, value)
        },
        "links" => {
          self.links.get_or_insert_default().apply_override(field, value)
        },
        "headings" => {
          self
            .headings
            .get_or_insert_default()
            .apply_override(field, value)
        },
        _ => {
          Err(ConfigError::Config(format!(
            "Unknown configuration key: '{key}'"
          )))
        },
      };
    }

    match key {
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e| {
            ConfigError::Config(format!(
              "Invalid value for 'jobs': '{value}' - {e}"
            ))
          })?)
        };
      },
      "output_dir" => {
        self.output_dir = (!value.is_empty()).then(|| PathBuf::from(value));
      },
      "format" => {
        self.format = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e: String| {
            ConfigError::Config(format!(
              "Invalid value for 'format': '{value}' - {e}"
            ))
          })?)
        };
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// Every field is an [`Option`]: the other config's [`Some`] value replaces
  /// this config's value, [`None`] leaves it untouched. Sections are replaced
  /// as a whole.
  pub fn merge(&mut self, other: Self) {
    let Self {
      jobs,
      output_dir,
      format,
      highlight,
      links,
      headings,
    } = other;

    if jobs.is_some() {
      self.jobs = jobs;
    }
    if output_dir.is_some() {
      self.output_dir = output_dir;
    }
    if format.is_some() {
      self.format = format;
    }
    if highlight.is_some() {
      self.highlight = highlight;
    }
    if links.is_some() {
      self.links = links;
    }
    if headings.is_some() {
      self.headings = headings;
    }
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    if let Some(found) = Self::find_config_file_in(&current_dir) {
      return Some(found);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
      let xdg_config_dir = PathBuf::from(xdg_config_home);
      for filename in &["folio.toml", "folio.json"] {
        let config_path = xdg_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    if let Ok(home) = std::env::var("HOME") {
      let home_config_dir = PathBuf::from(home).join(".config").join("folio");
      for filename in &["config.toml", "config.json"] {
        let config_path = home_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    None
  }

  /// First config file with a well-known name under `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Default configuration rendered in `format` ("toml" or "json").
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported.
  pub fn default_config_content(format: &str) -> Result<String, ConfigError> {
    let config = Self::documented();
    match format.to_lowercase().as_str() {
      "toml" => Ok(toml::to_string_pretty(&config)?),
      "json" => Ok(serde_json::to_string_pretty(&config)?),
      other => {
        Err(ConfigError::Config(format!(
          "Unsupported config format: '{other}'. Expected toml or json"
        )))
      },
    }
  }

  /// Generate a default configuration file
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = Self::default_config_content(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
