//! Error types for content processing.
use std::{io, string::FromUtf8Error};

/// Result type for content processing.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that abort processing of a whole document.
///
/// Failures scoped to a single code block are not represented here; they are
/// contained and logged by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("Content could not be parsed: {0}")]
  ContentParse(String),
  #[error("Failed to serialize processed content: {0}")]
  Serialize(#[from] io::Error),
  #[error("Processed content is not valid UTF-8: {0}")]
  Encoding(#[from] FromUtf8Error),
}
