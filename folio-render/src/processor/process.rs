//! Processing entry points with error recovery.
use std::{
  cell::Cell,
  panic::{self, AssertUnwindSafe},
  thread,
};

use log::error;

use super::{core::panic_message, types::ContentProcessor};
use crate::{error::RenderResult, types::RenderedContent};

/// Class on the element wrapping unprocessed content shown after a failure.
pub const RAW_CONTENT_CLASS: &str = "content-raw";

thread_local! {
  static RECOVERY_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Whether the current thread is inside a section of the pipeline whose
/// panics are caught and recovered from.
///
/// Panic hooks run on the panicking thread before unwinding starts, so a hook
/// can use this to keep contained panics out of crash reports.
#[must_use]
pub fn is_recovering_panics() -> bool {
  RECOVERY_DEPTH.with(|depth| depth.get() > 0)
}

/// Run `f`, catching any panic it raises.
pub(crate) fn contain_panics<R>(
  f: impl FnOnce() -> R,
) -> thread::Result<R> {
  RECOVERY_DEPTH.with(|depth| depth.set(depth.get() + 1));
  let result = panic::catch_unwind(AssertUnwindSafe(f));
  RECOVERY_DEPTH.with(|depth| depth.set(depth.get() - 1));
  result
}

/// Process content, falling back to an escaped raw-text display on failure.
///
/// A parse or serialization failure, or a panic anywhere in the pipeline, is
/// logged and replaced by [`fallback_content`] so the caller never ends up
/// with a blank view.
#[must_use]
pub fn process_with_recovery(
  processor: &ContentProcessor,
  raw: &str,
) -> RenderedContent {
  process_safe(raw, |raw| processor.process(raw))
}

/// Run `process_fn` on `raw`, recovering from errors and panics.
///
/// Either failure is logged and replaced by [`fallback_content`].
pub fn process_safe<F>(raw: &str, process_fn: F) -> RenderedContent
where
  F: FnOnce(&str) -> RenderResult<RenderedContent>,
{
  match contain_panics(|| process_fn(raw)) {
    Ok(Ok(rendered)) => rendered,
    Ok(Err(e)) => {
      error!("Failed to process content, showing it unprocessed: {e}");
      fallback_content(raw)
    },
    Err(payload) => {
      error!(
        "Panic during content processing: {}",
        panic_message(&*payload)
      );
      fallback_content(raw)
    },
  }
}

/// Unprocessed display of `raw`: the text escaped inside a `<pre>` block.
///
/// The outline is empty and no links are bound.
#[must_use]
pub fn fallback_content(raw: &str) -> RenderedContent {
  if raw.is_empty() {
    return RenderedContent::default();
  }

  RenderedContent {
    html: format!(
      "<pre class=\"{RAW_CONTENT_CLASS}\">{}</pre>",
      html_escape::encode_text(raw)
    ),
    ..RenderedContent::default()
  }
}
