//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use kuchikikiki::NodeRef;
use tendril::TendrilSink;

use super::error::{SyntaxError, SyntaxResult};
use crate::utils::{add_class, code_language, has_class};

/// Class added to a code element once its contents have been highlighted.
pub const HIGHLIGHTED_CLASS: &str = "highlighted";

/// Trait for syntax highlighting backends.
///
/// Allows different syntax highlighting implementations to be used
/// interchangeably. A backend turns source text into inline HTML (spans with
/// token classes) and can produce the stylesheet for those classes.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Get a list of available themes
  fn available_themes(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Check if a theme is available
  fn has_theme(&self, theme: &str) -> bool {
    self
      .available_themes()
      .iter()
      .any(|t| t.eq_ignore_ascii_case(theme))
  }

  /// Highlight code in the given language.
  ///
  /// # Returns
  ///
  /// Inline HTML for the contents of a `<code>` element. The markup must not
  /// wrap itself in `<pre>` or `<code>`.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// Stylesheet for the token classes emitted by [`Self::highlight`].
  fn stylesheet(&self, theme: &str) -> SyntaxResult<String>;
}

/// Element-level highlighting collaborator used by the content pipeline.
///
/// Receives a `<code>` element (the child of a `<pre>`) and mutates it in
/// place. Calling it twice on the same element must not corrupt the output.
/// A failure leaves the block to the pipeline, which restores it and moves on.
pub trait CodeHighlighter: Send + Sync {
  /// Highlight the code element in place.
  ///
  /// # Errors
  ///
  /// Returns an error if the block could not be highlighted.
  fn highlight(&self, code: &NodeRef) -> SyntaxResult<()>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Default theme to use when none is specified
  pub default_theme: Option<String>,

  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,

  /// Whether to fall back to plain text for unsupported languages
  pub fallback_to_plain: bool,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let mut language_aliases = HashMap::new();

    language_aliases.insert("js".to_string(), "javascript".to_string());
    language_aliases.insert("jsx".to_string(), "javascript".to_string());
    language_aliases.insert("ts".to_string(), "typescript".to_string());
    language_aliases.insert("py".to_string(), "python".to_string());
    language_aliases.insert("rb".to_string(), "ruby".to_string());
    language_aliases.insert("rs".to_string(), "rust".to_string());
    language_aliases.insert("sh".to_string(), "bash".to_string());
    language_aliases.insert("shell".to_string(), "bash".to_string());
    language_aliases.insert("zsh".to_string(), "bash".to_string());
    language_aliases.insert("yml".to_string(), "yaml".to_string());
    language_aliases.insert("md".to_string(), "markdown".to_string());
    language_aliases.insert("htm".to_string(), "html".to_string());

    Self {
      default_theme: None,
      language_aliases,
      fallback_to_plain: true,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Manages a syntax highlighting backend and provides a convenient
/// interface for highlighting code with configuration options. It is also the
/// default [`CodeHighlighter`] used by the content pipeline.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Get the configuration
  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Update the configuration
  pub fn set_config(&mut self, config: SyntaxConfig) {
    self.config = config;
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let language = language.to_lowercase();
    self
      .config
      .language_aliases
      .get(&language)
      .cloned()
      .unwrap_or(language)
  }

  /// Highlight code with automatic language resolution and fallback
  ///
  /// # Errors
  ///
  /// Returns an error if the language is unsupported and plain-text fallback
  /// is disabled, or if the backend fails.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved_language = self.resolve_language(language);

    if self.highlighter.supports_language(&resolved_language) {
      return self.highlighter.highlight(code, &resolved_language);
    }

    if self.config.fallback_to_plain {
      if self.highlighter.supports_language("text") {
        return self.highlighter.highlight(code, "text");
      }
      if self.highlighter.supports_language("plain") {
        return self.highlighter.highlight(code, "plain");
      }
    }

    Err(SyntaxError::UnsupportedLanguage(resolved_language))
  }

  /// Stylesheet for `theme`, or for the configured default theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] if neither names an available
  /// theme.
  pub fn stylesheet(&self, theme: Option<&str>) -> SyntaxResult<String> {
    let theme = theme
      .or(self.config.default_theme.as_deref())
      .ok_or_else(|| SyntaxError::ThemeNotFound("<none>".to_string()))?;

    if !self.highlighter.has_theme(theme) {
      return Err(SyntaxError::ThemeNotFound(theme.to_string()));
    }
    self.highlighter.stylesheet(theme)
  }
}

impl CodeHighlighter for SyntaxManager {
  fn highlight(&self, code: &NodeRef) -> SyntaxResult<()> {
    let element = code.as_element().ok_or(SyntaxError::NotAnElement)?;
    if has_class(element, HIGHLIGHTED_CLASS) {
      return Ok(());
    }

    let language = code_language(element).unwrap_or_else(|| "text".to_string());
    let source = code.text_contents();
    let highlighted = self.highlight_code(&source, &language)?;

    // Parse the spans inside a throwaway code block, then move them over.
    let scratch = kuchikikiki::parse_html()
      .one(format!("<pre><code>{highlighted}</code></pre>").as_str());
    let inner = scratch.select_first("pre > code").map_err(|()| {
      SyntaxError::HighlightingFailed(
        "highlighter output could not be parsed".to_string(),
      )
    })?;

    for child in code.children().collect::<Vec<_>>() {
      child.detach();
    }
    for child in inner.as_node().children().collect::<Vec<_>>() {
      code.append(child);
    }
    add_class(element, HIGHLIGHTED_CLASS);

    Ok(())
  }
}
