//! Reply cleanup.
//!
//! Models served through `OpenRouter` sometimes leak generation boundary
//! tokens or Markdown emphasis despite the plain-text instructions. Both are
//! removed here before the text reaches the chat.

// lazy_regex! validates patterns at compile time and initializes on first use
#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;

/// Boundary tokens emitted by some backends around generated text.
pub const SENTINEL_MARKERS: &[&str] = &[
    "<s>",
    "</s>",
    "<|im_end|>",
    "<|eot_id|>",
    "<|end|>",
    "<|endoftext|>",
];

/// Match bold text: **text**
static RE_BOLD: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"\*\*(.*?)\*\*");

/// Match 2+ consecutive underscores
static RE_UNDERSCORE_RUN: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"__+");

/// Remove every sentinel boundary marker.
///
/// Repeats until nothing changes, so removals can't splice a new marker
/// together (`<<s>s>`).
///
/// # Examples
///
/// ```
/// use cv_relay_core::sanitizer::strip_sentinels;
/// assert_eq!(strip_sentinels("<s> Hello</s>"), " Hello");
/// ```
#[must_use]
pub fn strip_sentinels(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        for marker in SENTINEL_MARKERS {
            next = next.replace(marker, "");
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Strip bold markup and underscore runs, then trim.
///
/// `**inner**` becomes `inner`, runs of two or more underscores disappear.
/// Both rewrites are applied until a fixed point so that, e.g., `*__*x*__*`
/// is fully cleaned in one call and the function stays idempotent.
///
/// # Examples
///
/// ```
/// use cv_relay_core::sanitizer::normalize;
/// assert_eq!(normalize("**bold**"), "bold");
/// assert_eq!(normalize("a__b___c"), "abc");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let unbolded = RE_BOLD.replace_all(&current, "$1");
        let next = RE_UNDERSCORE_RUN.replace_all(&unbolded, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

/// Final cleanup for text sent to a chat.
///
/// Alternates [`normalize`] and [`strip_sentinels`] until neither changes
/// the text. Markup removal can splice a marker together (`<**s**>`) and
/// marker removal can expose new markup, so a single pass is not enough.
///
/// # Examples
///
/// ```
/// use cv_relay_core::sanitizer::clean_reply;
/// assert_eq!(clean_reply("Answer<**s**>"), "Answer");
/// assert_eq!(clean_reply("Done<__/s>"), "Done");
/// ```
#[must_use]
pub fn clean_reply(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = strip_sentinels(&normalize(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Returns true if any sentinel marker is present.
#[must_use]
pub fn contains_sentinel(text: &str) -> bool {
    SENTINEL_MARKERS.iter().any(|marker| text.contains(marker))
}
