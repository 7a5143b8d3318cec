//! Content processing pipeline.
//!
//! - [`core`]: the processor and its DOM passes
//! - [`process`]: entry points with error recovery
//! - [`types`]: options and the processor type
pub mod core;
pub mod process;
pub mod types;

pub use process::{
  RAW_CONTENT_CLASS,
  fallback_content,
  is_recovering_panics,
  process_safe,
  process_with_recovery,
};
pub use types::{ContentProcessor, ProcessorOptions, ProcessorOptionsBuilder};
