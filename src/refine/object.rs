//! The refinable object protocol.
//!
//! A [`RefinableObject`] accumulates configuration in a namespace chain,
//! produces refined copies without mutating the original, and finalizes
//! exactly once: `refine_done` materializes the accumulated entries into
//! concrete attribute slots and permanently closes the object to further
//! refinement.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::namespace::merge::deep_merge;
use crate::namespace::{Namespace, Value};

use super::declaration::{Declaration, MemberKind};
use super::errors::RefineError;
use super::refined::{NamespaceStack, RefinedNamespace};

/// A configuration-bearing object with declared refinable members.
#[derive(Clone, PartialEq)]
pub struct RefinableObject {
    decl: Arc<Declaration>,
    namespace: NamespaceStack,
    is_refine_done: bool,
    attrs: IndexMap<String, Value>,
}

impl RefinableObject {
    /// Construct from keyword arguments alone.
    pub fn new(decl: Arc<Declaration>, kwargs: Namespace) -> Result<RefinableObject, RefineError> {
        RefinableObject::with_namespace(decl, Namespace::new(), kwargs)
    }

    /// Construct from an initial namespace blob plus keyword arguments.
    /// Keywords whose top-level segment names a declared member merge into
    /// the namespace by their full path; any other keyword is an error. An
    /// embedding type that consumes extra keywords of its own splits them
    /// off first with [`Declaration::partition`].
    pub fn with_namespace(
        decl: Arc<Declaration>,
        initial: Namespace,
        kwargs: Namespace,
    ) -> Result<RefinableObject, RefineError> {
        let (declared, rest) = decl.partition(kwargs);
        if !rest.is_empty() {
            return Err(RefineError::unknown_attributes(
                decl.type_name(),
                rest.flatten().keys().cloned().collect::<Vec<_>>(),
                decl.sorted_member_names(),
            ));
        }
        let namespace = deep_merge(initial, declared);
        Ok(RefinableObject {
            decl,
            namespace: NamespaceStack::Base(namespace),
            is_refine_done: false,
            attrs: IndexMap::new(),
        })
    }

    pub fn declaration(&self) -> &Arc<Declaration> {
        &self.decl
    }

    /// The accumulated, not-yet-materialized configuration.
    pub fn namespace(&self) -> &NamespaceStack {
        &self.namespace
    }

    pub fn is_refine_done(&self) -> bool {
        self.is_refine_done
    }

    /// A materialized attribute. `None` before `refine_done`, and for
    /// never-declared names after it.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// All materialized attributes, in declaration order.
    pub fn attrs(&self) -> &IndexMap<String, Value> {
        &self.attrs
    }

    /// A new sibling with `overrides` applied at higher priority than every
    /// existing value. The receiver is untouched.
    ///
    /// # Panics
    /// If the object is already finalized.
    pub fn refine(&self, overrides: Namespace) -> RefinableObject {
        assert!(!self.is_refine_done, "{self:?} already finalized");
        let mut result = self.clone();
        result.namespace = NamespaceStack::Refined(RefinedNamespace::new(
            "refine",
            self.namespace.clone(),
            false,
            overrides,
        ));
        result
    }

    /// A new sibling with `overrides` applied only where no existing value
    /// already covers that path. The receiver is untouched.
    ///
    /// # Panics
    /// If the object is already finalized.
    pub fn refine_defaults(&self, overrides: Namespace) -> RefinableObject {
        assert!(!self.is_refine_done, "{self:?} already finalized");
        let mut result = self.clone();
        result.namespace = NamespaceStack::Refined(RefinedNamespace::new(
            "refine defaults",
            self.namespace.clone(),
            true,
            overrides,
        ));
        result
    }

    /// Materialize the accumulated namespace into attribute slots, exactly
    /// once. Plain and evaluated members always materialize (null when
    /// absent); member collections only when present. Leftover namespace
    /// keys that match no declared member are an error. On success the
    /// object is permanently finalized and the declaration's
    /// `on_refine_done` hook runs.
    ///
    /// # Panics
    /// If the object is already finalized.
    pub fn refine_done(mut self) -> Result<RefinableObject, RefineError> {
        assert!(
            !self.is_refine_done,
            "refine_done() already invoked on {self:?}"
        );

        let mut remaining = self.namespace.merged().clone();
        for (name, kind) in self.decl.members() {
            match kind {
                MemberKind::Refinable | MemberKind::Evaluated => {
                    let value = remaining.remove(name).unwrap_or_else(Value::none);
                    self.attrs.insert(name.clone(), value);
                }
                MemberKind::Members => {
                    if let Some(value) = remaining.remove(name) {
                        self.attrs.insert(name.clone(), value);
                    }
                }
            }
        }

        if !remaining.is_empty() {
            return Err(RefineError::unknown_attributes(
                self.decl.type_name(),
                remaining.keys().cloned().collect::<Vec<_>>(),
                self.decl.sorted_member_names(),
            ));
        }

        self.is_refine_done = true;
        if let Some(hook) = self.decl.hook() {
            hook(&mut self);
        }
        Ok(self)
    }
}

impl fmt::Debug for RefinableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {:?}>", self.decl.type_name(), self.namespace)
    }
}
