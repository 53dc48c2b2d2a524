//! Bounded-length string reduction for log fields.
//!
//! Every field that ends up in a [`crate::record::LogRecord`] passes through
//! here so that downstream log sinks never receive unbounded payloads.

/// Marker appended to values cut short by [`truncate`].
pub const TRUNCATION_SUFFIX: &str = " ... [TRUNCATED]";

/// Truncate `value` to at most `max_length` characters, appending the
/// default [`TRUNCATION_SUFFIX`] when anything was cut.
pub fn truncate(value: &str, max_length: usize) -> String {
    truncate_with(value, max_length, TRUNCATION_SUFFIX)
}

/// Truncate `value` to at most `max_length` characters with a custom suffix.
///
/// Lengths are measured in characters, not bytes. A value that already fits
/// is returned unchanged. When the suffix alone does not fit inside
/// `max_length`, the result is the suffix verbatim - the bound is knowingly
/// exceeded rather than producing an unmarked cut.
pub fn truncate_with(value: &str, max_length: usize, suffix: &str) -> String {
    let length = value.chars().count();
    if length <= max_length {
        return value.to_string();
    }

    let suffix_length = suffix.chars().count();
    if suffix_length >= max_length {
        return suffix.to_string();
    }

    let keep = max_length - suffix_length;
    let mut result = String::with_capacity(value.len().min(max_length * 4));
    result.extend(value.chars().take(keep));
    result.push_str(suffix);
    result
}

/// Option-passthrough variant: absent values stay absent.
pub fn truncate_opt(value: Option<&str>, max_length: usize) -> Option<String> {
    value.map(|v| truncate(v, max_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn value_within_bound_is_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn value_over_bound_ends_with_suffix() {
        let long = "x".repeat(100);
        let result = truncate(&long, 50);
        assert_eq!(result.chars().count(), 50);
        assert!(result.ends_with(TRUNCATION_SUFFIX));
        let keep = 50 - TRUNCATION_SUFFIX.chars().count();
        assert!(result.starts_with(&"x".repeat(keep)));
    }

    #[test]
    fn suffix_longer_than_bound_falls_back_to_suffix() {
        // Bound smaller than the marker: result is the marker alone, and
        // the nominal bound is exceeded.
        let result = truncate("abcdefghij", 4);
        assert_eq!(result, TRUNCATION_SUFFIX);
    }

    #[test]
    fn suffix_exactly_at_bound_falls_back_to_suffix() {
        let suffix_len = TRUNCATION_SUFFIX.chars().count();
        let long = "y".repeat(suffix_len * 2);
        assert_eq!(truncate(&long, suffix_len), TRUNCATION_SUFFIX);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 4 characters, 8 bytes
        let value = "日本語字";
        assert_eq!(truncate(value, 4), value);

        let result = truncate_with(&value.repeat(10), 6, "..");
        assert_eq!(result.chars().count(), 6);
        assert_eq!(result, "日本語字..");
    }

    #[test]
    fn custom_suffix_is_honored() {
        assert_eq!(truncate_with("abcdefgh", 5, "!"), "abcd!");
    }

    #[test]
    fn option_passthrough() {
        assert_eq!(truncate_opt(None, 10), None);
        assert_eq!(truncate_opt(Some("abc"), 10), Some("abc".to_string()));
    }

    proptest! {
        /// When the suffix fits inside the bound, the result never exceeds
        /// the bound, and re-truncating is a no-op.
        #[test]
        fn truncation_bound_holds(value in ".{0,200}", max in 16usize..128) {
            let result = truncate(&value, max);
            prop_assert!(result.chars().count() <= max);
            prop_assert_eq!(truncate(&result, max), result.clone());
        }

        #[test]
        fn exact_bound_when_truncated(value in "[a-z]{129,300}", max in 16usize..128) {
            let result = truncate(&value, max);
            prop_assert_eq!(result.chars().count(), max);
        }
    }
}
