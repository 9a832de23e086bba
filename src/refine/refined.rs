//! Refinement layers with provenance.
//!
//! A [`RefinedNamespace`] records one override event: who refined (the
//! free-text description), what was overridden (the raw delta), at which
//! priority (the defaults flag), and over what (the parent link). Nodes
//! form a singly-linked chain back to a root plain [`Namespace`];
//! [`as_stack`](RefinedNamespace::as_stack) reconstructs the full ordered
//! layer history.

use std::fmt;

use crate::namespace::merge::merge_all;
use crate::namespace::path::prefixes;
use crate::namespace::{Flattened, Namespace, Value};

/// One layer of the refinement history: its description and flattened delta.
pub type StackEntry = (String, Flattened);

/// The accumulated configuration of a refinable object: either the root
/// plain namespace or the top of a refinement chain.
#[derive(Clone, PartialEq)]
pub enum NamespaceStack {
    Base(Namespace),
    Refined(RefinedNamespace),
}

impl NamespaceStack {
    /// The merged, currently-visible mapping.
    pub fn merged(&self) -> &Namespace {
        match self {
            NamespaceStack::Base(ns) => ns,
            NamespaceStack::Refined(refined) => refined.merged(),
        }
    }

    pub fn flatten(&self) -> Flattened {
        self.merged().flatten()
    }

    /// The full ordered layer history; a bare base namespace is a
    /// single-entry stack.
    pub fn as_stack(&self) -> Vec<StackEntry> {
        match self {
            NamespaceStack::Base(ns) => vec![("base".to_string(), ns.flatten())],
            NamespaceStack::Refined(refined) => refined.as_stack(),
        }
    }
}

impl From<Namespace> for NamespaceStack {
    fn from(ns: Namespace) -> NamespaceStack {
        NamespaceStack::Base(ns)
    }
}

impl From<RefinedNamespace> for NamespaceStack {
    fn from(refined: RefinedNamespace) -> NamespaceStack {
        NamespaceStack::Refined(refined)
    }
}

impl PartialEq<Namespace> for NamespaceStack {
    fn eq(&self, other: &Namespace) -> bool {
        self.merged() == other
    }
}

impl fmt::Debug for NamespaceStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.merged().fmt(f)
    }
}

/// One override event applied to a parent namespace or chain.
///
/// Construction performs the prefix-walk merge: each flattened delta pair
/// whose path passes through a nested [`RefinableObject`] in the parent
/// refines that object in place (so its unrelated attributes survive).
/// Every other pair is a plain override, or, in defaults mode, a fallback
/// fill that never beats an existing parent value.
///
/// [`RefinableObject`]: crate::refine::RefinableObject
#[derive(Clone, PartialEq)]
pub struct RefinedNamespace {
    description: String,
    parent: Box<NamespaceStack>,
    delta: Namespace,
    defaults: bool,
    merged: Namespace,
}

impl RefinedNamespace {
    pub fn new(
        description: &str,
        parent: impl Into<NamespaceStack>,
        defaults: bool,
        delta: Namespace,
    ) -> RefinedNamespace {
        let parent = parent.into();
        let parent_ns = parent.merged().clone();

        let mut updates = Namespace::new();
        let mut default_updates = Namespace::new();
        for (path, value) in delta.flatten() {
            let mut found = false;
            for prefix in prefixes(&path) {
                let Some(existing) = parent_ns.get_path(&prefix) else {
                    break;
                };
                if let Value::Object(existing) = existing {
                    // The delta rooted at this prefix is a namespace whenever
                    // the path continues past it; a scalar aimed straight at
                    // the object falls through to a plain override below.
                    let Some(Value::Namespace(sub_delta)) = delta.get_path(&prefix) else {
                        continue;
                    };
                    let refined = if defaults {
                        existing.refine_defaults(sub_delta.clone())
                    } else {
                        existing.refine(sub_delta.clone())
                    };
                    updates.set_path(&prefix, Value::Object(refined));
                    found = true;
                }
            }
            if !found {
                if defaults {
                    default_updates.set_path(&path, value);
                } else {
                    updates.set_path(&path, value);
                }
            }
        }

        let merged = if defaults {
            // Genuine defaults never beat existing parent values; a nested
            // object's own defaults-refinement already carries the correct
            // precedence and lands via `updates`.
            merge_all([default_updates, parent_ns, updates])
        } else {
            merge_all([parent_ns, updates])
        };

        RefinedNamespace {
            description: description.to_string(),
            parent: Box::new(parent),
            delta,
            defaults,
            merged,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> &NamespaceStack {
        &self.parent
    }

    pub fn delta(&self) -> &Namespace {
        &self.delta
    }

    pub fn is_defaults(&self) -> bool {
        self.defaults
    }

    /// The merged, currently-visible mapping.
    pub fn merged(&self) -> &Namespace {
        &self.merged
    }

    pub fn flatten(&self) -> Flattened {
        self.merged.flatten()
    }

    /// Reconstruct the ordered layer history by walking the parent links
    /// back to the root. Defaults layers are reported in visitation
    /// (child-to-root) order, then the root as `("base", ...)`, then
    /// override layers in chronological (root-to-child) order.
    pub fn as_stack(&self) -> Vec<StackEntry> {
        let mut refinements: Vec<StackEntry> = Vec::new();
        let mut default_refinements: Vec<StackEntry> = Vec::new();
        let mut node = self;
        let base = loop {
            let entry = (node.description.clone(), node.delta.flatten());
            if node.defaults {
                default_refinements.push(entry);
            } else {
                refinements.insert(0, entry);
            }
            match node.parent.as_ref() {
                NamespaceStack::Refined(parent) => node = parent,
                NamespaceStack::Base(ns) => break ns,
            }
        };

        let mut stack = default_refinements;
        stack.push(("base".to_string(), base.flatten()));
        stack.extend(refinements);
        stack
    }
}

impl PartialEq<Namespace> for RefinedNamespace {
    fn eq(&self, other: &Namespace) -> bool {
        &self.merged == other
    }
}

impl fmt::Debug for RefinedNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.merged.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_precedence() {
        let base = Namespace::new().with("a", 1).with("b", 2);
        let refined = RefinedNamespace::new("refinement", base, false, Namespace::new().with("b", 3));
        assert_eq!(refined, Namespace::new().with("a", 1).with("b", 3));
    }

    #[test]
    fn test_defaults_precedence() {
        let base = Namespace::new().with("a", 1).with("b", 2);
        let refined = RefinedNamespace::new(
            "refinement",
            base,
            true,
            Namespace::new().with("b", 3).with("c", 4),
        );
        // Existing b wins over the default, new c fills in.
        assert_eq!(
            refined,
            Namespace::new().with("a", 1).with("b", 2).with("c", 4)
        );
    }

    #[test]
    fn test_delta_is_not_mutated_into_parent() {
        let base = Namespace::new().with("a", 1);
        let refined = RefinedNamespace::new("refinement", base.clone(), false, Namespace::new().with("b", 2));
        assert_eq!(refined.parent().merged(), &base);
        assert_eq!(refined.delta(), &Namespace::new().with("b", 2));
    }

    #[test]
    fn test_as_stack_single_layer() {
        let refined = RefinedNamespace::new(
            "refinement",
            Namespace::new().with("a", 1),
            false,
            Namespace::new().with("b", 2),
        );
        let stack = refined.as_stack();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0].0, "base");
        assert_eq!(stack[1].0, "refinement");
        assert_eq!(stack[1].1["b"], Value::from(2));
    }

    #[test]
    fn test_as_stack_mixed_chain_ordering() {
        let namespace = RefinedNamespace::new(
            "refinement",
            Namespace::new().with("a", 1),
            false,
            Namespace::new().with("b", 2),
        );
        let namespace = RefinedNamespace::new(
            "defaults refinement",
            namespace,
            true,
            Namespace::new().with("c", 3),
        );
        let namespace = RefinedNamespace::new(
            "further refinement",
            namespace,
            false,
            Namespace::new().with("d", 4),
        );
        let namespace = RefinedNamespace::new(
            "further defaults refinement",
            namespace,
            true,
            Namespace::new().with("e", 5),
        );

        assert_eq!(
            namespace,
            Namespace::new()
                .with("a", 1)
                .with("b", 2)
                .with("c", 3)
                .with("d", 4)
                .with("e", 5)
        );

        let stack = namespace.as_stack();
        let descriptions: Vec<&str> = stack.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "further defaults refinement",
                "defaults refinement",
                "base",
                "refinement",
                "further refinement",
            ]
        );
        assert_eq!(stack[0].1["e"], Value::from(5));
        assert_eq!(stack[1].1["c"], Value::from(3));
        assert_eq!(stack[2].1["a"], Value::from(1));
        assert_eq!(stack[3].1["b"], Value::from(2));
        assert_eq!(stack[4].1["d"], Value::from(4));
    }
}
