//! Text helpers shared by the core and the transports.

use std::sync::OnceLock;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Tokenizer built once per process; `None` if construction failed.
static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();

/// Safely truncates a string to a maximum character length (not bytes).
///
/// This is UTF-8 safe and will not panic on multi-byte characters.
///
/// # Examples
///
/// ```
/// use cv_relay_core::utils::truncate_str;
/// let s = "Привет, мир!";
/// assert_eq!(truncate_str(s, 6), "Привет");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Count tokens in a string using the cl100k tokenizer.
///
/// Falls back to a `len / 4` estimate when the tokenizer can't be built.
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    CL100K
        .get_or_init(|| cl100k_base().ok())
        .as_ref()
        .map_or(text.len() / 4, |bpe| {
            bpe.encode_with_special_tokens(text).len()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_unicode() {
        let s = "Привет, мир!";
        assert_eq!(truncate_str(s, 6), "Привет");
        assert_eq!(truncate_str(s, 50), "Привет, мир!");
    }

    #[test]
    fn test_count_tokens_grows_with_text() {
        assert_eq!(count_tokens(""), 0);
        let short = count_tokens("Senior Rust engineer");
        let long = count_tokens(&"Senior Rust engineer. ".repeat(50));
        assert!(short > 0);
        assert!(long > short);
    }
}
