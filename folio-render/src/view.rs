//! Display surface for processed content.
//!
//! [`ContentView`] owns whatever is currently mounted: the processed markup,
//! its outline, and one binding per internal link. Every mount replaces all
//! three together. Bindings are derived from the mounted markup itself, so a
//! binding can never outlive the content it belongs to.
//!
//! Updates are stamped with a generation. Content rendered for an older
//! generation than the latest [`ContentView::begin_update`] is dropped on
//! mount instead of being attached.
use std::rc::Rc;

use kuchikikiki::NodeRef;
use log::{debug, trace};
use tendril::TendrilSink;

use crate::{
  DOC_ID_ATTRIBUTE,
  INTERNAL_LINK_CLASS,
  processor::{ContentProcessor, process_with_recovery},
  types::{OutlineEntry, RenderedContent},
  utils,
};

/// Navigation collaborator.
///
/// Requests are fire-and-forget; nothing the navigator returns is consumed.
pub trait Navigator {
  /// Show another document.
  fn navigate_to_document(&self, document_id: &str);

  /// Bring a section of the current document into view. Optional.
  fn scroll_to_section(&self, _section_id: &str) {}
}

/// Handle for one content update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
  generation: u64,
}

impl Snapshot {
  /// Generation this snapshot was issued for.
  #[must_use]
  pub const fn generation(self) -> u64 {
    self.generation
  }
}

/// Content rendered for a snapshot, waiting to be mounted.
#[derive(Debug, Clone)]
pub struct PendingContent {
  snapshot: Snapshot,
  rendered: RenderedContent,
}

impl PendingContent {
  /// The rendered content.
  #[must_use]
  pub const fn rendered(&self) -> &RenderedContent {
    &self.rendered
  }
}

/// Link between a mounted internal-link element and the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBinding {
  /// Document the element navigates to. May be empty.
  pub document_id: String,
  /// Element label.
  pub text:        String,
}

/// Outcome of [`ContentView::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
  /// Content is mounted with this many link bindings.
  Mounted { bindings: usize },
  /// A newer update was started; nothing was mounted or bound.
  Superseded,
}

/// Outcome of activating a mounted element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
  /// Default navigation was prevented and document navigation requested.
  Intercepted { document_id: String },
  /// No binding: the host's default behaviour applies.
  Default,
}

#[derive(Debug)]
struct Mounted {
  generation: u64,
  content:    RenderedContent,
  bindings:   Vec<LinkBinding>,
}

/// The display surface that processed content is mounted into.
pub struct ContentView {
  processor:  ContentProcessor,
  navigator:  Rc<dyn Navigator>,
  generation: u64,
  mounted:    Option<Mounted>,
}

impl ContentView {
  /// Create an empty view.
  #[must_use]
  pub fn new(
    processor: ContentProcessor,
    navigator: Rc<dyn Navigator>,
  ) -> Self {
    Self {
      processor,
      navigator,
      generation: 0,
      mounted: None,
    }
  }

  /// Start an update. Any snapshot issued earlier becomes stale.
  pub const fn begin_update(&mut self) -> Snapshot {
    self.generation += 1;
    Snapshot {
      generation: self.generation,
    }
  }

  /// Whether `snapshot` is the latest update.
  #[must_use]
  pub const fn is_current(&self, snapshot: Snapshot) -> bool {
    snapshot.generation == self.generation
  }

  /// Render raw content for `snapshot`.
  ///
  /// Rendering never fails: content that cannot be processed is rendered as
  /// escaped raw text.
  #[must_use]
  pub fn render(&self, snapshot: Snapshot, raw: &str) -> PendingContent {
    PendingContent {
      snapshot,
      rendered: process_with_recovery(&self.processor, raw),
    }
  }

  /// Mount rendered content, replacing whatever was mounted before.
  ///
  /// Stale content is discarded without touching the current mount. Otherwise
  /// previous bindings are released first, then one binding is created for
  /// every element in the new markup carrying the internal-link class and a
  /// document id.
  pub fn mount(&mut self, pending: PendingContent) -> MountOutcome {
    if !self.is_current(pending.snapshot) {
      debug!(
        "Discarding content for generation {}, current is {}",
        pending.snapshot.generation, self.generation
      );
      return MountOutcome::Superseded;
    }

    self.unmount();

    let bindings = bind_internal_links(&pending.rendered.html);
    let count = bindings.len();
    trace!(
      "Mounted generation {} with {count} link bindings",
      pending.snapshot.generation
    );

    self.mounted = Some(Mounted {
      generation: pending.snapshot.generation,
      content: pending.rendered,
      bindings,
    });

    MountOutcome::Mounted { bindings: count }
  }

  /// Begin, render and mount in one step.
  pub fn update(&mut self, raw: &str) -> MountOutcome {
    let snapshot = self.begin_update();
    let pending = self.render(snapshot, raw);
    self.mount(pending)
  }

  /// Release the mounted content and all of its bindings.
  pub fn unmount(&mut self) {
    if let Some(previous) = self.mounted.take() {
      trace!(
        "Released {} link bindings of generation {}",
        previous.bindings.len(),
        previous.generation
      );
    }
  }

  /// Currently mounted content.
  #[must_use]
  pub fn content(&self) -> Option<&RenderedContent> {
    self.mounted.as_ref().map(|m| &m.content)
  }

  /// Mounted markup, or an empty string when nothing is mounted.
  #[must_use]
  pub fn html(&self) -> &str {
    self.content().map_or("", |c| c.html.as_str())
  }

  /// Mounted outline.
  #[must_use]
  pub fn outline(&self) -> &[OutlineEntry] {
    self
      .content()
      .map(|c| c.outline.as_slice())
      .unwrap_or_default()
  }

  /// Live link bindings, in document order.
  #[must_use]
  pub fn bindings(&self) -> &[LinkBinding] {
    self
      .mounted
      .as_ref()
      .map(|m| m.bindings.as_slice())
      .unwrap_or_default()
  }

  /// Number of live link bindings.
  #[must_use]
  pub fn binding_count(&self) -> usize {
    self.bindings().len()
  }

  /// Activate the bound element at `index`.
  ///
  /// Bound elements prevent default navigation and ask the navigator for the
  /// document instead, even when the document id is empty.
  pub fn activate(&self, index: usize) -> Activation {
    let Some(binding) = self.bindings().get(index) else {
      return Activation::Default;
    };

    self.navigator.navigate_to_document(&binding.document_id);
    Activation::Intercepted {
      document_id: binding.document_id.clone(),
    }
  }

  /// Scroll to the outline entry `id`, if the mounted content has one.
  pub fn scroll_to(&self, id: &str) -> Option<&OutlineEntry> {
    let entry = self.content()?.find_entry(id)?;
    self.navigator.scroll_to_section(&entry.id);
    Some(entry)
  }
}

impl std::fmt::Debug for ContentView {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContentView")
      .field("processor", &self.processor)
      .field("generation", &self.generation)
      .field("mounted", &self.mounted)
      .finish_non_exhaustive()
  }
}

/// Find every internal-link element in `html` and bind it.
///
/// Only elements carrying both the marker class and the document id attribute
/// are bound. A hand-written `class="internal-link"` on an ordinary link keeps
/// its default navigation.
fn bind_internal_links(html: &str) -> Vec<LinkBinding> {
  if html.is_empty() {
    return Vec::new();
  }

  let document: NodeRef = kuchikikiki::parse_html().one(html);
  let selector = format!(".{INTERNAL_LINK_CLASS}[{DOC_ID_ATTRIBUTE}]");
  utils::select_elements(&document, &selector)
    .into_iter()
    .map(|element| {
      let document_id = element
        .attributes
        .borrow()
        .get(DOC_ID_ATTRIBUTE)
        .unwrap_or_default()
        .to_string();
      LinkBinding {
        document_id,
        text: utils::collapse_whitespace(&element.as_node().text_contents()),
      }
    })
    .collect()
}
