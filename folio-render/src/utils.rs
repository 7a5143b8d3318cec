use std::sync::LazyLock;

use kuchikikiki::{ElementData, NodeDataRef, NodeRef};
use markup5ever::local_name;
use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile WHITESPACE_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Derive the anchor id for a heading.
///
/// The text is trimmed, lowercased and has every run of whitespace collapsed
/// to a single dash. Punctuation is kept as-is. When nothing alphanumeric
/// remains, the positional id `heading-{index}` is used instead.
///
/// Identical headings produce identical ids; no de-duplication happens here.
#[must_use]
pub fn heading_id(text: &str, index: usize) -> String {
  let derived = WHITESPACE_RE.replace_all(text.trim(), "-").to_lowercase();
  if derived.chars().any(char::is_alphanumeric) {
    derived
  } else {
    format!("heading-{index}")
  }
}

/// Collapse runs of whitespace into single spaces and trim the result.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
  WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Check whether an element's `class` attribute contains `class`.
#[must_use]
pub fn has_class(element: &ElementData, class: &str) -> bool {
  element
    .attributes
    .borrow()
    .get(local_name!("class"))
    .is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

/// Append `class` to an element's `class` attribute unless already present.
pub fn add_class(element: &ElementData, class: &str) {
  if has_class(element, class) {
    return;
  }

  let mut attributes = element.attributes.borrow_mut();
  let value = match attributes.get(local_name!("class")) {
    Some(existing) if !existing.trim().is_empty() => {
      format!("{} {class}", existing.trim())
    },
    _ => class.to_string(),
  };
  attributes.insert(local_name!("class"), value);
}

/// Language named by a code element's `language-*` or `lang-*` class.
#[must_use]
pub fn code_language(element: &ElementData) -> Option<String> {
  let attributes = element.attributes.borrow();
  let classes = attributes.get(local_name!("class"))?;
  classes
    .split_whitespace()
    .find_map(|c| {
      c.strip_prefix("language-")
        .or_else(|| c.strip_prefix("lang-"))
    })
    .filter(|lang| !lang.is_empty())
    .map(str::to_lowercase)
}

/// Collect all elements matching `selector` below `root`.
///
/// Collecting up front keeps later DOM mutation from disturbing the
/// traversal. An invalid selector matches nothing.
#[must_use]
pub fn select_elements(
  root: &NodeRef,
  selector: &str,
) -> Vec<NodeDataRef<ElementData>> {
  root.select(selector).map_or_else(
    |()| {
      log::error!("Invalid selector '{selector}', skipping");
      Vec::new()
    },
    Iterator::collect,
  )
}

/// Create a regex that never matches anything.
///
/// Used as a fallback pattern when a regex fails to compile. It will never
/// match any input, which is safer than using a trivial regex like `^$` which
/// would match empty strings.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
#[allow(clippy::unwrap_used, reason = "Both patterns are statically valid")]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_heading_id_lowercases_and_dashes() {
    assert_eq!(heading_id("Getting Started", 0), "getting-started");
    assert_eq!(heading_id("A  \t lot\nof   space", 0), "a-lot-of-space");
  }

  #[test]
  fn test_heading_id_trims_edges() {
    assert_eq!(heading_id("  Padded  ", 0), "padded");
  }

  #[test]
  fn test_heading_id_keeps_punctuation() {
    assert_eq!(heading_id("What's new?", 0), "what's-new?");
  }

  #[test]
  fn test_heading_id_positional_fallback() {
    assert_eq!(heading_id("", 4), "heading-4");
    assert_eq!(heading_id("   \n ", 1), "heading-1");
    assert_eq!(heading_id("-- !!", 2), "heading-2");
  }

  #[test]
  fn test_collapse_whitespace() {
    assert_eq!(collapse_whitespace("  Two\n   lines "), "Two lines");
  }

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything"));
  }
}
