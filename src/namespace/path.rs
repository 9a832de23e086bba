//! Path segmentation.
//!
//! Paths address nested namespace entries with a double-underscore
//! separator, e.g. `fruits__banana__taste`. Empty segments are dropped, so
//! splitting a path and re-joining its segments is lossless.

/// Separator between path segments.
pub const SEPARATOR: &str = "__";

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Every non-empty prefix of a path, shortest first, up to and including
/// the full path. The empty path has no prefixes.
pub fn prefixes(path: &str) -> Vec<String> {
    let parts = segments(path);
    (0..parts.len())
        .map(|i| parts[..=i].join(SEPARATOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_empty() {
        assert!(prefixes("").is_empty());
    }

    #[test]
    fn test_prefixes_single() {
        assert_eq!(prefixes("foo"), vec!["foo"]);
    }

    #[test]
    fn test_prefixes_nested() {
        assert_eq!(prefixes("foo__bar"), vec!["foo", "foo__bar"]);
        assert_eq!(prefixes("a__b__c"), vec!["a", "a__b", "a__b__c"]);
    }

    #[test]
    fn test_prefixes_drops_empty_segments() {
        // A doubled separator collapses; segments never go empty.
        assert_eq!(prefixes("a____b"), vec!["a", "a__b"]);
        assert_eq!(segments("__a__"), vec!["a"]);
    }
}
