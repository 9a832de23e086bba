//! Declarative attribute refinement for composable configuration objects.
//!
//! Configuration is accumulated in ordered, nested, path-addressed
//! [`Namespace`]s; later callers progressively override ("refine") earlier
//! values while every override layer's provenance is recorded in a
//! [`RefinedNamespace`] chain. Overrides that pass through a nested
//! configured [`RefinableObject`] descend into it and refine it in place
//! instead of overwriting it wholesale.

pub mod namespace;
pub mod refine;

pub use namespace::merge::{deep_merge, merge_all, merge_value};
pub use namespace::path::{prefixes, segments, SEPARATOR};
pub use namespace::{Flattened, Lazy, Namespace, Value};
pub use refine::{
    Declaration, MemberKind, NamespaceStack, RefinableObject, RefineError, RefineHook,
    RefinedNamespace, StackEntry,
};
