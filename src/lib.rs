//! Positional n-ary forests with iterative traversal and in-place reordering.
//!
//! A [`Forest`] owns any number of root subtrees. Nodes are addressed through
//! [`NodeId`] handles that resolve only in the issuing forest and become stale
//! (never dangling) once the node is removed. Traversals ([`TraversalOrder`]) and transformations
//! ([`Translation`]) run on explicit work-lists, so deep trees do not exhaust
//! the call stack.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod host;
pub mod util;

pub use domain::{
    DomainError, DomainResult, Forest, NodeId, NodeKind, NodeMut, NodeRef, PathIter, PathView,
    Translation, TraversalOrder, TreeRender,
};
pub use host::{ForestHandle, HostRegistry, HostValue, NodeHandle};
