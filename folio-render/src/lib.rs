//! # Folio Render - post-processing for document HTML
//!
//! Takes the raw HTML of a document body (as produced by an editor or an AI
//! response) and turns it into markup that is ready to be mounted: headings
//! get stable anchor ids, code blocks are syntax highlighted, and `doc:` links
//! are rewired into internal document links. An outline suitable for a table
//! of contents is extracted from the same parse.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_render::{ContentProcessor, ProcessorOptions};
//!
//! let processor = ContentProcessor::new(ProcessorOptions::default());
//! let rendered = processor
//!   .process("<h1>Hello World</h1><p>See <a href=\"doc:abc\">this</a>.</p>")
//!   .unwrap_or_default();
//!
//! println!("HTML: {}", rendered.html);
//! println!("Outline: {:?}", rendered.outline);
//! ```
//!
//! ## Features
//!
//! - **DOM-based processing** using `kuchikikiki`, tolerant of malformed input
//! - **Heading anchors and outline** for `h1`-`h3`
//! - **Pluggable highlighting** through [`CodeHighlighter`], with a `syntect`
//!   backend built in
//! - **Internal links** using the `doc:` scheme
//! - **Error recovery**: a failing code block never blanks the document, and a
//!   document that cannot be parsed falls back to escaped raw text
//!
//! ## Mounting
//!
//! [`ContentView`] models the display surface: it owns the mounted markup and
//! the bindings between internal links and a [`Navigator`], replacing both on
//! every update and ignoring renders of superseded content.

mod error;
pub mod processor;
pub mod syntax;
mod types;
pub mod utils;
pub mod view;

pub use crate::{
  error::{RenderError, RenderResult},
  processor::{
    ContentProcessor,
    ProcessorOptions,
    ProcessorOptionsBuilder,
    is_recovering_panics,
    process_safe,
    process_with_recovery,
  },
  syntax::{CodeHighlighter, create_default_manager},
  types::{InternalLink, OutlineEntry, RenderedContent},
  view::{Activation, ContentView, MountOutcome, Navigator},
};

/// Href scheme marking a link to another document.
pub const DOC_SCHEME: &str = "doc:";

/// Attribute carrying the target document id on rewired internal links.
pub const DOC_ID_ATTRIBUTE: &str = "data-doc-id";

/// Class distinguishing internal links from ordinary external ones.
pub const INTERNAL_LINK_CLASS: &str = "internal-link";
