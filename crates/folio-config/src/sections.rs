use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Syntax highlighting of `pre > code` blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
  /// Whether to highlight code blocks
  pub enable: bool,

  /// Theme used when emitting the stylesheet. The backend default is used
  /// when unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub theme: Option<String>,
}

impl Default for HighlightConfig {
  fn default() -> Self {
    Self {
      enable: true,
      theme:  None,
    }
  }
}

impl HighlightConfig {
  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "enable" => self.enable = parse_bool(key, value)?,
      "theme" => {
        self.theme = (!value.is_empty()).then(|| value.to_string());
      },
      _ => return Err(unknown_key("highlight", key)),
    }
    Ok(())
  }
}

/// Rewriting of `doc:` links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
  /// Whether internal links are marked for navigation binding
  pub rewrite: bool,
}

impl Default for LinksConfig {
  fn default() -> Self {
    Self { rewrite: true }
  }
}

impl LinksConfig {
  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "rewrite" => self.rewrite = parse_bool(key, value)?,
      _ => return Err(unknown_key("links", key)),
    }
    Ok(())
  }
}

/// Heading anchors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingsConfig {
  /// Whether derived ids are written back onto headings
  pub assign_ids: bool,
}

impl Default for HeadingsConfig {
  fn default() -> Self {
    Self { assign_ids: true }
  }
}

impl HeadingsConfig {
  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "assign_ids" => self.assign_ids = parse_bool(key, value)?,
      _ => return Err(unknown_key("headings", key)),
    }
    Ok(())
  }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn unknown_key(section: &str, key: &str) -> ConfigError {
  ConfigError::Config(format!("Unknown configuration key: '{section}.{key}'"))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_parse_bool_variants() {
    assert!(parse_bool("k", "YES").unwrap());
    assert!(parse_bool("k", "1").unwrap());
    assert!(!parse_bool("k", "no").unwrap());
    assert!(parse_bool("k", "maybe").is_err());
  }

  #[test]
  fn test_empty_theme_clears_it() {
    let mut highlight = HighlightConfig {
      enable: true,
      theme:  Some("Solarized (dark)".to_string()),
    };
    highlight.apply_override("theme", "").unwrap();
    assert_eq!(highlight.theme, None);
  }

  #[test]
  fn test_unknown_section_key() {
    let err = LinksConfig::default()
      .apply_override("follow", "true")
      .unwrap_err();
    assert!(err.to_string().contains("links.follow"));
  }
}
