//! Member declarations.
//!
//! A [`Declaration`] is the static registration table for a refinable type:
//! which named attributes accept deferred configuration, and of what kind.
//! Tables are built once per type and inherited by explicit merge: a child
//! declaration copies its parent's table and overrides entries by name.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::namespace::path::segments;
use crate::namespace::Namespace;

use super::object::RefinableObject;

/// The kind of a declared refinable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Plain refinable attribute; materializes to null when never set.
    Refinable,
    /// Refinable whose value the consumer evaluates after finalization.
    Evaluated,
    /// Collection of refinable children; materializes only when present.
    Members,
}

impl MemberKind {
    pub fn is_evaluated(&self) -> bool {
        matches!(self, MemberKind::Evaluated)
    }
}

/// Finalization hook, run once at the end of a successful `refine_done`.
pub type RefineHook = fn(&mut RefinableObject);

/// The declared refinable members of a type.
///
/// Equality covers the type name and member table only; the finalization
/// hook is a fn pointer, and fn pointer comparison is unreliable.
#[derive(Debug, Clone)]
pub struct Declaration {
    type_name: String,
    members: IndexMap<String, MemberKind>,
    on_refine_done: Option<RefineHook>,
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Declaration) -> bool {
        self.type_name == other.type_name && self.members == other.members
    }
}

impl Declaration {
    pub fn new(type_name: &str) -> Declaration {
        Declaration {
            type_name: type_name.to_string(),
            members: IndexMap::new(),
            on_refine_done: None,
        }
    }

    /// Inherit from a parent declaration: the parent's table and hook are
    /// copied, and subsequent [`member`](Declaration::member) calls override
    /// by name.
    pub fn extending(type_name: &str, parent: &Declaration) -> Declaration {
        Declaration {
            type_name: type_name.to_string(),
            members: parent.members.clone(),
            on_refine_done: parent.on_refine_done,
        }
    }

    /// Declare a member. Redeclaring a name overrides its kind in place.
    pub fn member(mut self, name: &str, kind: MemberKind) -> Declaration {
        self.members.insert(name.to_string(), kind);
        self
    }

    /// Install the finalization hook.
    pub fn on_refine_done(mut self, hook: RefineHook) -> Declaration {
        self.on_refine_done = Some(hook);
        self
    }

    /// Finish the table. Declarations are shared between an object and all
    /// of its refined copies.
    pub fn build(self) -> Arc<Declaration> {
        Arc::new(self)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn members(&self) -> &IndexMap<String, MemberKind> {
        &self.members
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// All declared member names, sorted, for error messages.
    pub fn sorted_member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn hook(&self) -> Option<RefineHook> {
        self.on_refine_done
    }

    /// Split a keyword namespace into the entries whose top-level segment
    /// names a declared member and the rest. The rest is what an embedding
    /// type's own constructor consumes.
    pub fn partition(&self, kwargs: Namespace) -> (Namespace, Namespace) {
        let mut declared = Namespace::new();
        let mut rest = Namespace::new();
        for (key, value) in kwargs {
            let head = segments(&key).first().map(|s| s.to_string());
            match head {
                Some(head) if self.contains(&head) => declared.set_path(&key, value),
                _ => rest.set_path(&key, value),
            }
        }
        (declared, rest)
    }
}
