use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, NodeKind, NodeMut, NodeRef, TreeNode};

/// Ordered collection of independently owned root subtrees.
///
/// Every node lives in one generational arena. Children are owned by exactly
/// one parent entry, roots by the forest itself, and parent links are plain
/// handles that never keep anything alive.
static NEXT_FOREST_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct Forest<T> {
    /// Process-unique id stamped into every handle this forest issues
    pub(crate) id: u64,
    /// Arena storage for all nodes of all roots
    pub(crate) arena: Arena<TreeNode<T>>,
    /// Root handles in insertion order
    pub(crate) roots: Vec<NodeId>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self::with_arena(Arena::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self::with_arena(Arena::with_capacity(n))
    }

    fn with_arena(arena: Arena<TreeNode<T>>) -> Self {
        Self {
            id: NEXT_FOREST_ID.fetch_add(1, Ordering::Relaxed),
            arena,
            roots: Vec::new(),
        }
    }

    /// Appends a new root (kind `Root`, no parent) and returns its handle.
    #[instrument(level = "trace", skip(self, value))]
    pub fn add_root(&mut self, value: T) -> NodeId {
        let root = self.insert(value, NodeKind::Root, None);
        self.roots.push(root);
        trace!(%root, roots = self.roots.len(), "added root");
        root
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    /// Snapshot of the roots in insertion order.
    pub fn roots(&self) -> Vec<NodeRef<'_, T>> {
        self.roots.iter().filter_map(|&r| self.node(r)).collect()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        if id.forest != self.id {
            return None;
        }
        self.arena.get(id.index).map(|node| NodeRef::new(self, id, node))
    }

    pub fn node_mut(&mut self, id: NodeId) -> DomainResult<NodeMut<'_, T>> {
        if !self.contains(id) {
            return Err(DomainError::InvalidHandle(id));
        }
        Ok(NodeMut::new(self, id))
    }

    /// True if `id` was issued by this forest and its node is still alive.
    pub fn contains(&self, id: NodeId) -> bool {
        id.forest == self.id && self.arena.contains(id.index)
    }

    /// Number of live nodes across all roots.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Destroys every root subtree. Handles taken before stay stale afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        let released: usize = roots.into_iter().map(|r| self.release_subtree(r)).sum();
        debug!(released, "cleared forest");
    }

    /// Height of the deepest root subtree, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();

        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(id.index) {
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }

        max_depth
    }

    /// Nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if let Some(node) = self.arena.get(id.index) {
                if node.children.is_empty() {
                    leaves.push(id);
                } else {
                    // Push children in reverse order for left-to-right traversal
                    stack.extend(node.children.iter().rev().copied());
                }
            }
        }

        leaves
    }

    pub(crate) fn insert(&mut self, value: T, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        NodeId {
            forest: self.id,
            index: self.arena.insert(TreeNode::new(value, kind, parent)),
        }
    }

    /// Frees `top` and all its descendants, each exactly once.
    ///
    /// The caller has already unlinked `top` from its owner.
    pub(crate) fn release_subtree(&mut self, top: NodeId) -> usize {
        let mut stack = vec![top];
        let mut released = 0;

        while let Some(id) = stack.pop() {
            if let Some(node) = self.arena.remove(id.index) {
                stack.extend(node.children.iter().copied());
                released += 1;
            }
        }

        released
    }
}
