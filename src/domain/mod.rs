//! Domain layer: the forest container and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod forest;
pub mod node;
pub mod render;
pub mod translation;
pub mod traversal;

pub use error::{DomainError, DomainResult};
pub use forest::Forest;
pub use node::{NodeId, NodeKind, NodeMut, NodeRef};
pub use render::TreeRender;
pub use translation::Translation;
pub use traversal::{PathIter, PathView, TraversalOrder};
