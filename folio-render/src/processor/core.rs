//! Core implementation of the content processor.
//!
//! One call to [`ContentProcessor::process`] parses the raw HTML once, runs
//! every DOM pass over that single tree, and serializes it back, so the markup
//! and the outline it returns always describe the same snapshot.
use std::{any::Any, sync::Arc};

use kuchikikiki::NodeRef;
use log::{debug, trace, warn};
use markup5ever::local_name;
use tendril::TendrilSink;

use super::{
  process::contain_panics,
  types::{ContentProcessor, ProcessorOptions},
};
use crate::{
  DOC_ID_ATTRIBUTE,
  DOC_SCHEME,
  INTERNAL_LINK_CLASS,
  error::{RenderError, RenderResult},
  syntax::{CodeHighlighter, create_default_manager},
  types::{InternalLink, OutlineEntry, RenderedContent},
  utils,
};

impl ContentProcessor {
  /// Create a new `ContentProcessor` with the given options.
  ///
  /// When highlighting is enabled the default syntax manager is used; if no
  /// backend is available highlighting is silently skipped.
  #[must_use]
  pub fn new(options: ProcessorOptions) -> Self {
    let highlighter = if options.highlight_code {
      create_default_manager()
        .map(|manager| Arc::new(manager) as Arc<dyn CodeHighlighter>)
        .map_err(|e| debug!("Syntax highlighting unavailable: {e}"))
        .ok()
    } else {
      None
    };

    Self {
      options,
      highlighter,
    }
  }

  /// Replace the code block highlighter.
  #[must_use]
  pub fn with_highlighter(
    mut self,
    highlighter: Arc<dyn CodeHighlighter>,
  ) -> Self {
    self.highlighter = Some(highlighter);
    self
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &ProcessorOptions {
    &self.options
  }

  /// Whether code blocks will be highlighted.
  #[must_use]
  pub const fn highlights_code(&self) -> bool {
    self.options.highlight_code && self.highlighter.is_some()
  }

  /// Process raw HTML into mountable markup plus its outline.
  ///
  /// Malformed markup is recovered by the HTML5 tree builder and never fails
  /// the pipeline. Highlighter failures are contained to their code block.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::ContentParse`] if no document tree could be built
  /// at all, or a serialization error if the tree cannot be written back.
  pub fn process(&self, raw: &str) -> RenderResult<RenderedContent> {
    if raw.trim().is_empty() {
      return Ok(RenderedContent::default());
    }

    let document = parse_document(raw)?;
    let body = document.select_first("body").map_err(|()| {
      RenderError::ContentParse("document has no body".to_string())
    })?;
    let body = body.as_node();

    let (outline, title) = self.process_headings(body);

    if self.options.highlight_code {
      if let Some(highlighter) = &self.highlighter {
        highlight_code_blocks(body, highlighter.as_ref());
      }
    }

    let links = if self.options.rewrite_internal_links {
      rewrite_internal_links(body)
    } else {
      Vec::new()
    };

    let html = serialize_children(body)?;
    debug!(
      "Processed content: {} headings, {} internal links",
      outline.len(),
      links.len()
    );

    Ok(RenderedContent {
      html,
      outline,
      title,
      links,
    })
  }

  /// Assign ids to `h1`-`h3` in document order and collect the outline.
  fn process_headings(
    &self,
    root: &NodeRef,
  ) -> (Vec<OutlineEntry>, Option<String>) {
    let mut outline = Vec::new();
    let mut title = None;

    for (index, heading) in
      utils::select_elements(root, "h1, h2, h3").iter().enumerate()
    {
      let level = match heading.name.local {
        local_name!("h1") => 1,
        local_name!("h2") => 2,
        _ => 3,
      };
      let raw_text = heading.as_node().text_contents();
      let id = utils::heading_id(&raw_text, index);
      let text = utils::collapse_whitespace(&raw_text);

      if level == 1 && title.is_none() && !text.is_empty() {
        title = Some(text.clone());
      }

      if self.options.assign_heading_ids {
        heading
          .attributes
          .borrow_mut()
          .insert(local_name!("id"), id.clone());
      }

      trace!("Heading h{level} '{text}' -> #{id}");
      outline.push(OutlineEntry { id, text, level });
    }

    (outline, title)
  }
}

/// Parse raw HTML into a document tree.
///
/// The tree builder recovers from malformed markup on its own; only a panic
/// inside the parser is reported as a parse failure.
fn parse_document(raw: &str) -> RenderResult<NodeRef> {
  contain_panics(|| kuchikikiki::parse_html().one(raw))
    .map_err(|payload| RenderError::ContentParse(panic_message(&*payload)))
}

/// Hand every `pre > code` block to the highlighter, one at a time.
fn highlight_code_blocks(root: &NodeRef, highlighter: &dyn CodeHighlighter) {
  let blocks = utils::select_elements(root, "pre > code");
  let mut failed = 0usize;

  for (index, block) in blocks.iter().enumerate() {
    if !highlight_block(highlighter, block.as_node(), index) {
      failed += 1;
    }
  }

  if failed > 0 {
    warn!(
      "{failed} of {} code blocks were left unhighlighted",
      blocks.len()
    );
  }
}

/// Highlight one block, restoring it if the highlighter errors or panics.
fn highlight_block(
  highlighter: &dyn CodeHighlighter,
  code: &NodeRef,
  index: usize,
) -> bool {
  let children: Vec<NodeRef> = code.children().collect();
  let attributes = code
    .as_element()
    .map(|element| element.attributes.borrow().clone());

  let outcome = contain_panics(|| highlighter.highlight(code));
  let reason = match outcome {
    Ok(Ok(())) => return true,
    Ok(Err(e)) => e.to_string(),
    Err(payload) => panic_message(&*payload),
  };

  warn!("Failed to highlight code block {index}: {reason}");

  for child in code.children().collect::<Vec<_>>() {
    child.detach();
  }
  for child in children {
    code.append(child);
  }
  if let (Some(element), Some(attributes)) = (code.as_element(), attributes) {
    *element.attributes.borrow_mut() = attributes;
  }

  false
}

/// Mark `doc:` anchors as internal links and collect them.
fn rewrite_internal_links(root: &NodeRef) -> Vec<InternalLink> {
  let mut links = Vec::new();

  for anchor in utils::select_elements(root, "a[href]") {
    let document_id = {
      let attributes = anchor.attributes.borrow();
      match attributes
        .get(local_name!("href"))
        .and_then(|href| href.strip_prefix(DOC_SCHEME))
      {
        Some(id) => id.to_string(),
        None => continue,
      }
    };

    if document_id.is_empty() {
      debug!("Internal link without a document id");
    }

    anchor
      .attributes
      .borrow_mut()
      .insert(DOC_ID_ATTRIBUTE, document_id.clone());
    utils::add_class(&anchor, INTERNAL_LINK_CLASS);

    links.push(InternalLink {
      document_id,
      text: utils::collapse_whitespace(&anchor.as_node().text_contents()),
    });
  }

  links
}

/// Serialize the children of `node`, excluding the node itself.
fn serialize_children(node: &NodeRef) -> RenderResult<String> {
  let mut out = Vec::new();
  for child in node.children() {
    child.serialize(&mut out)?;
  }
  Ok(String::from_utf8(out)?)
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
  payload
    .downcast_ref::<String>()
    .cloned()
    .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_string()))
    .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntax::{SyntaxError, SyntaxResult};

  struct Upper;

  impl CodeHighlighter for Upper {
    fn highlight(&self, code: &NodeRef) -> SyntaxResult<()> {
      let text = code.text_contents().to_uppercase();
      for child in code.children().collect::<Vec<_>>() {
        child.detach();
      }
      code.append(NodeRef::new_text(text));
      Ok(())
    }
  }

  struct Vandal;

  impl CodeHighlighter for Vandal {
    fn highlight(&self, code: &NodeRef) -> SyntaxResult<()> {
      // Partially mutate before failing, the pipeline must undo this.
      for child in code.children().collect::<Vec<_>>() {
        child.detach();
      }
      if let Some(element) = code.as_element() {
        element
          .attributes
          .borrow_mut()
          .insert(local_name!("class"), "broken".to_string());
      }
      Err(SyntaxError::HighlightingFailed("vandalised".to_string()))
    }
  }

  fn plain_processor() -> ContentProcessor {
    ContentProcessor::new(ProcessorOptions {
      highlight_code: false,
      ..Default::default()
    })
  }

  #[test]
  fn test_serialize_excludes_wrapper_elements() {
    let rendered = plain_processor()
      .process("<p>Hello</p>")
      .expect("processing failed");
    assert_eq!(rendered.html, "<p>Hello</p>");
  }

  #[test]
  fn test_whitespace_only_input_is_empty() {
    let rendered = plain_processor()
      .process("  \n\t ")
      .expect("processing failed");
    assert_eq!(rendered, RenderedContent::default());
  }

  #[test]
  fn test_title_is_first_non_empty_h1() {
    let rendered = plain_processor()
      .process("<h2>Intro</h2><h1></h1><h1>Real  Title</h1><h1>Second</h1>")
      .expect("processing failed");
    assert_eq!(rendered.title.as_deref(), Some("Real Title"));
  }

  #[test]
  fn test_heading_ids_can_be_left_alone() {
    let processor = ContentProcessor::new(ProcessorOptions {
      highlight_code: false,
      assign_heading_ids: false,
      ..Default::default()
    });
    let rendered = processor
      .process("<h2>Overview</h2>")
      .expect("processing failed");
    assert_eq!(rendered.html, "<h2>Overview</h2>");
    assert_eq!(rendered.outline[0].id, "overview");
  }

  #[test]
  fn test_highlight_failure_restores_block() {
    let root = parse_document(
      r#"<pre><code class="language-rust">let x = 1;</code></pre>"#,
    )
    .expect("parse failed");
    let code = root.select_first("pre > code").expect("no code block");

    assert!(!highlight_block(&Vandal, code.as_node(), 0));
    assert_eq!(code.as_node().text_contents(), "let x = 1;");
    assert_eq!(
      code.attributes.borrow().get(local_name!("class")),
      Some("language-rust")
    );
  }

  #[test]
  fn test_custom_highlighter_mutates_in_place() {
    let processor = ContentProcessor::new(ProcessorOptions {
      highlight_code: true,
      ..Default::default()
    })
    .with_highlighter(Arc::new(Upper));

    let rendered = processor
      .process("<pre><code>abc</code></pre><p><code>inline</code></p>")
      .expect("processing failed");
    assert!(rendered.html.contains("<pre><code>ABC</code></pre>"));
    assert!(rendered.html.contains("<code>inline</code>"));
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_panic_message_variants() {
    use std::panic;

    let owned = panic::catch_unwind(|| panic!("{}", String::from("owned")))
      .expect_err("should panic");
    assert_eq!(panic_message(&*owned), "owned");

    let borrowed =
      panic::catch_unwind(|| panic!("borrowed")).expect_err("should panic");
    assert_eq!(panic_message(&*borrowed), "borrowed");
  }
}
