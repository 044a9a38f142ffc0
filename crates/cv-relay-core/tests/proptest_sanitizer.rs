use cv_relay_core::sanitizer::{clean_reply, contains_sentinel, normalize, strip_sentinels};
use proptest::prelude::*;

proptest! {
    /// normalize must not crash on any valid UTF-8 input.
    #[test]
    fn does_not_crash(s in "\\PC*") {
        let _ = normalize(&s);
    }

    /// Applying normalize twice equals applying it once.
    #[test]
    fn normalize_is_idempotent(s in "\\PC*") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Idempotence on inputs dense in markup characters.
    #[test]
    fn normalize_is_idempotent_on_markup(s in "[*_ a-z\n]{0,40}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Bold spans are unwrapped without losing the inner text.
    #[test]
    fn bold_is_unwrapped(
        prefix in "[a-zA-Z0-9 ]*",
        inner in "[a-zA-Z0-9]+",
        suffix in "[a-zA-Z0-9 ]*"
    ) {
        let input = format!("{prefix}**{inner}**{suffix}");
        let result = normalize(&input);
        prop_assert!(!result.contains("**"));
        prop_assert!(result.contains(&inner));
    }

    /// Underscore runs never survive.
    #[test]
    fn underscore_runs_removed(s in "[a-z_]*") {
        prop_assert!(!normalize(&s).contains("__"));
    }

    /// No sentinel survives stripping, however they are interleaved.
    #[test]
    fn sentinels_removed(
        parts in proptest::collection::vec(
            "(<s>|</s>|<\\|im_end\\|>|<\\|eot_id\\|>|<|>|s|/|[a-z ]{0,5})",
            0..20
        )
    ) {
        let input = parts.concat();
        prop_assert!(!contains_sentinel(&strip_sentinels(&input)));
    }

    /// Markup mixed into markers can't leave a marker behind after cleanup.
    #[test]
    fn clean_reply_leaves_no_sentinel(
        parts in proptest::collection::vec(
            "(<s>|</s>|<\\|end\\|>|<|>|s|/|\\||\\*\\*|__|\\*|_|[a-z ]{0,3})",
            0..24
        )
    ) {
        let input = parts.concat();
        let cleaned = clean_reply(&input);
        prop_assert!(!contains_sentinel(&cleaned));
        prop_assert_eq!(clean_reply(&cleaned), cleaned);
    }
}

#[test]
fn normalize_documented_examples() {
    assert_eq!(normalize("**bold**"), "bold");
    assert_eq!(normalize("a__b___c"), "abc");
}
