//! Provides a trait-based architecture for syntax highlighting that allows
//! multiple backends to be plugged in.
//!
//! Two seams exist:
//! - [`SyntaxHighlighter`]: a string-level backend (source in, inline HTML out)
//! - [`CodeHighlighter`]: the element-level collaborator the content pipeline
//!   hands each `pre > code` block to
//!
//! [`SyntaxManager`] bridges the two. The built-in backend is **Syntect**.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{
  CodeHighlighter,
  HIGHLIGHTED_CLASS,
  SyntaxConfig,
  SyntaxHighlighter,
  SyntaxManager,
};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")]
pub use self::syntect::{
  CLASS_PREFIX,
  DEFAULT_THEME,
  SyntectHighlighter,
  create_syntect_manager,
};

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without the `syntect` feature.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager()
  }

  #[cfg(not(feature = "syntect"))]
  {
    Err(SyntaxError::NoBackendAvailable)
  }
}
