//! Types for folio-render public API and internal use.
use serde::{Deserialize, Serialize};

/// One table-of-contents item derived from a heading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineEntry {
  /// Anchor id written back onto the heading. Not guaranteed to be unique.
  pub id:    String,
  /// Heading label.
  pub text:  String,
  /// Heading rank (1-3).
  pub level: u8,
}

/// A link to another document found while processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InternalLink {
  /// Identifier taken verbatim from the href after the `doc:` prefix. May be
  /// empty.
  pub document_id: String,
  /// Link label.
  pub text:        String,
}

/// Result of processing one snapshot of raw content.
///
/// `html` and `outline` always come from the same parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedContent {
  /// Processed HTML, ready to mount.
  pub html: String,

  /// Headings in document order (for `ToC`, navigation, etc).
  pub outline: Vec<OutlineEntry>,

  /// Title of the document, if found (first non-empty H1).
  pub title: Option<String>,

  /// Internal document links in document order.
  pub links: Vec<InternalLink>,
}

impl RenderedContent {
  /// Whether the outline has anything worth rendering as a table of contents.
  #[must_use]
  pub const fn has_outline(&self) -> bool {
    !self.outline.is_empty()
  }

  /// Find the outline entry for an anchor id. With duplicate ids the first
  /// entry in document order wins.
  #[must_use]
  pub fn find_entry(&self, id: &str) -> Option<&OutlineEntry> {
    self.outline.iter().find(|entry| entry.id == id)
  }
}
