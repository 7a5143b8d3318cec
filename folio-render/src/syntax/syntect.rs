//! Syntect-based syntax highlighting backend.
//!
//! Uses Sublime Text syntax definitions (TextMate grammars) bundled with
//! syntect. Output is class-based: tokens become `<span class="hl-...">`
//! elements and colours come from the stylesheet generated for a theme, so the
//! processed HTML stays theme independent.

use std::sync::OnceLock;

use syntect::{
  highlighting::ThemeSet,
  html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
  parsing::{SyntaxReference, SyntaxSet},
  util::LinesWithEndings,
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Prefix of every token class emitted by [`SyntectHighlighter`].
pub const CLASS_PREFIX: &str = "hl-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
  prefix: CLASS_PREFIX,
};

/// Theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Names that select the plain-text syntax.
const PLAIN_NAMES: [&str; 4] = ["text", "plain", "plaintext", "txt"];

/// Syntect-based syntax highlighter
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
  /// Create a new Syntect highlighter.
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Get the syntect `SyntaxSet`.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
  }

  /// Get the syntect `ThemeSet`.
  fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let syntax_set = Self::syntax_set();
    if PLAIN_NAMES.iter().any(|p| p.eq_ignore_ascii_case(language)) {
      return Some(syntax_set.find_syntax_plain_text());
    }
    syntax_set.find_syntax_by_token(language)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    let mut languages: Vec<String> = Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .chain(PLAIN_NAMES.iter().map(|p| (*p).to_string()))
      .collect();
    languages.sort();
    languages.dedup();
    languages
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::find_syntax(language).is_some()
  }

  fn available_themes(&self) -> Vec<String> {
    let mut themes: Vec<String> =
      Self::theme_set().themes.keys().cloned().collect();
    themes.sort();
    themes
  }

  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
    let syntax = Self::find_syntax(language)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(language.to_string()))?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(
      syntax,
      Self::syntax_set(),
      CLASS_STYLE,
    );
    for line in LinesWithEndings::from(code) {
      generator
        .parse_html_for_line_which_includes_newline(line)
        .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    }
    Ok(generator.finalize())
  }

  fn stylesheet(&self, theme: &str) -> SyntaxResult<String> {
    let theme = Self::theme_set()
      .themes
      .iter()
      .find(|(name, _)| name.eq_ignore_ascii_case(theme))
      .map(|(_, theme)| theme)
      .ok_or_else(|| SyntaxError::ThemeNotFound(theme.to_string()))?;

    css_for_theme_with_class_style(theme, CLASS_STYLE)
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }
}

/// Create a Syntect-based syntax manager with configuration
///
/// # Errors
///
/// Currently infallible; returns `Result` to match the other constructors.
#[allow(
  clippy::unnecessary_wraps,
  reason = "API consistency with create_default_manager"
)]
pub fn create_syntect_manager() -> SyntaxResult<SyntaxManager> {
  let config = SyntaxConfig {
    default_theme: Some(DEFAULT_THEME.to_string()),
    ..SyntaxConfig::default()
  };
  Ok(SyntaxManager::new(Box::new(SyntectHighlighter::new()), config))
}
