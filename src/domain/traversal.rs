//! Iterative traversals over a [`Forest`].
//!
//! All orders run on an explicit work-list, so the native stack usage does
//! not grow with the height of the tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, NodeRef};
use crate::domain::Forest;

/// Order in which a traversal visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Node, then each child subtree left to right.
    #[default]
    PreOrder,
    /// Children `[0, n/2)`, then the node, then children `[n/2, n)`.
    /// A leaf is visited on its own.
    InOrder,
    /// Each child subtree left to right, then the node.
    PostOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::InOrder => "in-order",
            TraversalOrder::PostOrder => "post-order",
        };
        f.write_str(name)
    }
}

impl FromStr for TraversalOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pre" | "pre-order" | "preorder" => Ok(TraversalOrder::PreOrder),
            "in" | "in-order" | "inorder" => Ok(TraversalOrder::InOrder),
            "post" | "post-order" | "postorder" => Ok(TraversalOrder::PostOrder),
            _ => Err(DomainError::UnknownOrder(s.to_string())),
        }
    }
}

/// Projection of a visited node into the caller's output type.
///
/// Every projection refers to the node that was visited; none copies node
/// state beyond what the target type itself holds.
pub trait PathView<'a, T>: Sized {
    fn project(node: NodeRef<'a, T>) -> Self;
}

impl<'a, T> PathView<'a, T> for NodeRef<'a, T> {
    fn project(node: NodeRef<'a, T>) -> Self {
        node
    }
}

impl<'a, T> PathView<'a, T> for NodeId {
    fn project(node: NodeRef<'a, T>) -> Self {
        node.id()
    }
}

impl<'a, T> PathView<'a, T> for &'a T {
    fn project(node: NodeRef<'a, T>) -> Self {
        node.data()
    }
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Subtree not yet opened
    Expand(NodeId),
    /// Node whose own visit is due
    Emit(NodeId),
}

/// Lazy traversal over one or more subtrees.
pub struct PathIter<'a, T> {
    forest: &'a Forest<T>,
    order: TraversalOrder,
    stack: Vec<Frame>,
}

impl<'a, T> PathIter<'a, T> {
    fn new(forest: &'a Forest<T>, order: TraversalOrder, starts: &[NodeId]) -> Self {
        let mut iter = Self {
            forest,
            order,
            stack: Vec::with_capacity(starts.len()),
        };
        iter.push_subtrees(starts);
        iter
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }

    // Reverse push so the leftmost subtree pops first
    fn push_subtrees(&mut self, ids: &[NodeId]) {
        self.stack.extend(ids.iter().rev().map(|&id| Frame::Expand(id)));
    }
}

impl<'a, T> Iterator for PathIter<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(id) => {
                    if let Some(node) = self.forest.node(id) {
                        return Some(node);
                    }
                }
                Frame::Expand(id) => {
                    let Some(node) = self.forest.node(id) else {
                        continue;
                    };
                    let children = node.child_ids();
                    match self.order {
                        TraversalOrder::PreOrder => {
                            self.push_subtrees(children);
                            return Some(node);
                        }
                        TraversalOrder::PostOrder => {
                            self.stack.push(Frame::Emit(id));
                            self.push_subtrees(children);
                        }
                        TraversalOrder::InOrder => {
                            if children.is_empty() {
                                return Some(node);
                            }
                            let (left, right) = children.split_at(children.len() / 2);
                            self.push_subtrees(right);
                            self.stack.push(Frame::Emit(id));
                            self.push_subtrees(left);
                        }
                    }
                }
            }
        }
        None
    }
}

impl<T> Forest<T> {
    /// Lazy traversal of every root subtree, roots in insertion order.
    pub fn iter(&self, order: TraversalOrder) -> PathIter<'_, T> {
        PathIter::new(self, order, &self.roots)
    }

    /// Lazy traversal of the subtree below `id` (inclusive).
    pub fn iter_from(&self, id: NodeId, order: TraversalOrder) -> DomainResult<PathIter<'_, T>> {
        if !self.contains(id) {
            return Err(DomainError::InvalidHandle(id));
        }
        Ok(PathIter::new(self, order, &[id]))
    }

    /// Visits every root subtree in `order` and concatenates the results.
    #[instrument(level = "debug", skip(self))]
    pub fn path<'a, V: PathView<'a, T>>(&'a self, order: TraversalOrder) -> Vec<V> {
        self.iter(order).map(V::project).collect()
    }

    /// Same as [`Forest::path`], restricted to the subtree below `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn path_from<'a, V: PathView<'a, T>>(
        &'a self,
        id: NodeId,
        order: TraversalOrder,
    ) -> DomainResult<Vec<V>> {
        Ok(self.iter_from(id, order)?.map(V::project).collect())
    }

    /// One path per root, in root order.
    #[instrument(level = "debug", skip(self))]
    pub fn paths_by_root<'a, V: PathView<'a, T>>(&'a self, order: TraversalOrder) -> Vec<Vec<V>> {
        self.roots
            .iter()
            .map(|&root| {
                PathIter::new(self, order, &[root])
                    .map(V::project)
                    .collect()
            })
            .collect()
    }
}
