//! The refinement engine.
//!
//! Ties the namespace primitive to the refinable-object protocol: declared
//! member tables, the layered override chain with provenance, and the
//! construct → refine* → finalize lifecycle.

pub mod declaration;
pub mod errors;
pub mod object;
pub mod refined;

pub use declaration::{Declaration, MemberKind, RefineHook};
pub use errors::RefineError;
pub use object::RefinableObject;
pub use refined::{NamespaceStack, RefinedNamespace, StackEntry};
