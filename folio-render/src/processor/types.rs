//! Type definitions for the content processor.
//!
//! # Examples
//!
//! ```
//! use folio_render::{ContentProcessor, ProcessorOptions};
//!
//! let options = ProcessorOptions {
//!   highlight_code: false,
//!   ..Default::default()
//! };
//!
//! let processor = ContentProcessor::new(options);
//! ```

use std::sync::Arc;

use crate::syntax::CodeHighlighter;

/// Options for configuring the content processor.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
  /// Enable syntax highlighting for `pre > code` blocks.
  pub highlight_code: bool,

  /// Extract internal `doc:` links and mark them for binding.
  pub rewrite_internal_links: bool,

  /// Assign anchor ids to headings. The outline is extracted either way.
  pub assign_heading_ids: bool,
}

impl Default for ProcessorOptions {
  fn default() -> Self {
    Self {
      highlight_code:         cfg!(feature = "syntect"),
      rewrite_internal_links: true,
      assign_heading_ids:     true,
    }
  }
}

/// Main content processor.
///
/// Can be cheaply cloned since the highlighter is shared through an `Arc`.
#[derive(Clone)]
pub struct ContentProcessor {
  pub(crate) options:     ProcessorOptions,
  pub(crate) highlighter: Option<Arc<dyn CodeHighlighter>>,
}

impl std::fmt::Debug for ContentProcessor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContentProcessor")
      .field("options", &self.options)
      .field("highlighter", &self.highlighter.is_some())
      .finish()
  }
}

/// Builder for constructing `ProcessorOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct ProcessorOptionsBuilder {
  options: ProcessorOptions,
}

impl ProcessorOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Enable or disable internal link rewriting.
  #[must_use]
  pub const fn rewrite_internal_links(mut self, enabled: bool) -> Self {
    self.options.rewrite_internal_links = enabled;
    self
  }

  /// Enable or disable writing heading ids back into the markup.
  #[must_use]
  pub const fn assign_heading_ids(mut self, enabled: bool) -> Self {
    self.options.assign_heading_ids = enabled;
    self
  }

  /// Build the final `ProcessorOptions`.
  #[must_use]
  pub fn build(self) -> ProcessorOptions {
    self.options
  }
}
