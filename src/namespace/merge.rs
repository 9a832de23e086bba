//! Deep-merge for namespaces.
//!
//! Merge semantics:
//! - Namespaces: deep-merge by key (recursive)
//! - Shortcut namespaces: REPLACE (overlay wins entirely)
//! - Objects, lazy values, scalars: override (overlay wins)

use super::{Namespace, Value};

/// Deep merge two namespaces. A shortcut overlay replaces the base
/// wholesale; otherwise overlay entries merge into the base key by key,
/// existing keys keeping their position.
pub fn deep_merge(mut base: Namespace, overlay: Namespace) -> Namespace {
    if overlay.is_shortcut() {
        return overlay;
    }
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}

/// Merge one value onto another: mergeable namespaces deep-merge, anything
/// else is replaced by the overlay.
pub fn merge_value(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Namespace(base), Value::Namespace(overlay)) if !overlay.is_shortcut() => {
            Value::Namespace(deep_merge(base, overlay))
        }
        (_, overlay) => overlay,
    }
}

/// Merge namespace layers in order (first is base, last has highest
/// precedence).
pub fn merge_all(layers: impl IntoIterator<Item = Namespace>) -> Namespace {
    layers.into_iter().fold(Namespace::new(), deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_override() {
        let base = Namespace::new().with("timeout", 100);
        let overlay = Namespace::new().with("timeout", 200);
        let result = deep_merge(base, overlay);
        assert_eq!(result.get_i64("timeout"), Some(200));
    }

    #[test]
    fn test_namespace_deep_merge() {
        let base = Namespace::new().with("cache__derived", "off").with("cache__spm", "off");
        let overlay = Namespace::new().with("cache__derived", "on");
        let result = deep_merge(base, overlay);

        // derived should be overridden, spm preserved
        assert_eq!(result.get_str("cache__derived"), Some("on"));
        assert_eq!(result.get_str("cache__spm"), Some("off"));
    }

    #[test]
    fn test_add_new_key() {
        let base = Namespace::new().with("a", 1);
        let overlay = Namespace::new().with("b", 2);
        let result = deep_merge(base, overlay);
        assert_eq!(result.get_i64("a"), Some(1));
        assert_eq!(result.get_i64("b"), Some(2));
    }

    #[test]
    fn test_shortcut_replaces_wholesale() {
        let base = Namespace::new().with("call__target", "old").with("call__extra", 1);
        let overlay = Namespace::new().with("call", Namespace::shortcut().with("target", "new"));
        let result = deep_merge(base, overlay);

        let call = result.get("call").unwrap().as_namespace().unwrap();
        assert!(call.is_shortcut());
        assert_eq!(call.get_str("target"), Some("new"));
        assert!(call.get_path("extra").is_none());
    }

    #[test]
    fn test_merge_all_precedence() {
        let builtin = Namespace::new().with("timeout", 100).with("cache__mode", "off");
        let host = Namespace::new().with("timeout", 200);
        let repo = Namespace::new().with("cache__mode", "on");
        let result = merge_all([builtin, host, repo]);

        assert_eq!(result.get_i64("timeout"), Some(200));
        assert_eq!(result.get_str("cache__mode"), Some("on"));
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = Namespace::new().with("l1__l2__a", 1).with("l1__l2__b", 2);
        let overlay = Namespace::new().with("l1__l2__b", 3).with("l1__l2__c", 4);
        let result = deep_merge(base, overlay);

        assert_eq!(result.get_i64("l1__l2__a"), Some(1));
        assert_eq!(result.get_i64("l1__l2__b"), Some(3));
        assert_eq!(result.get_i64("l1__l2__c"), Some(4));
    }
}
