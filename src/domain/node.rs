use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::Forest;

/// Advisory classification of a node.
///
/// The tag is not reconciled with the actual structure: a `Leaf` node may
/// gain children and an `Internal` node may have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    #[default]
    Internal,
    Leaf,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "root",
            NodeKind::Internal => "internal",
            NodeKind::Leaf => "leaf",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(NodeKind::Root),
            "internal" => Ok(NodeKind::Internal),
            "leaf" => Ok(NodeKind::Leaf),
            _ => Err(DomainError::UnknownKind(s.to_string())),
        }
    }
}

/// Stable handle to a node inside a [`Forest`].
///
/// The handle stays valid while the node is alive. Once the node (or one of
/// its ancestors) is removed, the handle is stale and every lookup with it
/// fails, even if the arena slot gets reused. A handle only resolves in the
/// forest that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// Id of the issuing forest
    pub(crate) forest: u64,
    pub(crate) index: Index,
}

impl NodeId {
    /// Slot and generation of the underlying arena index.
    pub fn into_raw_parts(self) -> (usize, u64) {
        self.index.into_raw_parts()
    }

    /// Id of the forest that issued this handle.
    pub fn forest_id(&self) -> u64 {
        self.forest
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "#{}@{}", slot, generation)
    }
}

/// Node record stored in the forest arena.
#[derive(Debug)]
pub(crate) struct TreeNode<T> {
    pub(crate) data: T,
    pub(crate) kind: NodeKind,
    /// Non-owning back-reference, None for roots
    pub(crate) parent: Option<NodeId>,
    /// Owned children, in traversal order
    pub(crate) children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    pub(crate) fn new(data: T, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            data,
            kind,
            parent,
            children: Vec::new(),
        }
    }
}

/// Read-only view of a live node.
///
/// The view borrows the forest, so no structural mutation can happen while
/// it (or any snapshot taken from it) is alive.
pub struct NodeRef<'a, T> {
    forest: &'a Forest<T>,
    id: NodeId,
    node: &'a TreeNode<T>,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> PartialEq for NodeRef<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

impl<'a, T> Eq for NodeRef<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for NodeRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", &self.node.data)
            .field("kind", &self.node.kind)
            .field("children", &self.node.children.len())
            .finish()
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(forest: &'a Forest<T>, id: NodeId, node: &'a TreeNode<T>) -> Self {
        Self { forest, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a T {
        &self.node.data
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// Parent view, None for a forest root.
    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.node.parent.and_then(|p| self.forest.node(p))
    }

    pub fn child_ids(&self) -> &'a [NodeId] {
        &self.node.children
    }

    /// Snapshot of the current children in order.
    pub fn children(&self) -> Vec<NodeRef<'a, T>> {
        self.node
            .children
            .iter()
            .filter_map(|&c| self.forest.node(c))
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a, T>> {
        self.node
            .children
            .get(index)
            .and_then(|&c| self.forest.node(c))
    }

    /// True iff the node has no children right now.
    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }
}

/// Mutating view of a live node.
pub struct NodeMut<'a, T> {
    forest: &'a mut Forest<T>,
    id: NodeId,
}

impl<'a, T> NodeMut<'a, T> {
    /// Caller guarantees `id` is live in `forest`.
    pub(crate) fn new(forest: &'a mut Forest<T>, id: NodeId) -> Self {
        Self { forest, id }
    }

    // The node cannot be removed through this view, so the slot stays occupied.
    fn entry(&self) -> &TreeNode<T> {
        &self.forest.arena[self.id.index]
    }

    fn entry_mut(&mut self) -> &mut TreeNode<T> {
        &mut self.forest.arena[self.id.index]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &T {
        &self.entry().data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.entry_mut().data
    }

    /// Replaces the payload, returning the previous one.
    pub fn set_data(&mut self, value: T) -> T {
        std::mem::replace(&mut self.entry_mut().data, value)
    }

    pub fn kind(&self) -> NodeKind {
        self.entry().kind
    }

    pub fn set_kind(&mut self, kind: NodeKind) {
        self.entry_mut().kind = kind;
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.entry().parent
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.entry().children
    }

    pub fn is_leaf(&self) -> bool {
        self.entry().children.is_empty()
    }

    /// Appends an `Internal` child and returns its handle.
    pub fn add_child(&mut self, value: T) -> NodeId {
        self.add_child_with_kind(value, NodeKind::Internal)
    }

    #[instrument(level = "trace", skip(self, value))]
    pub fn add_child_with_kind(&mut self, value: T, kind: NodeKind) -> NodeId {
        let parent = self.id;
        let child = self.forest.insert(value, kind, Some(parent));
        self.entry_mut().children.push(child);
        trace!(%parent, %child, "added child");
        child
    }

    /// Detaches `child` and destroys its whole subtree.
    ///
    /// Fails with `NotAChild` if `child` is live but owned elsewhere, and
    /// with `InvalidHandle` if it is stale. Nothing changes on failure.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, child: NodeId) -> DomainResult<()> {
        if !self.forest.contains(child) {
            return Err(DomainError::InvalidHandle(child));
        }
        let parent = self.id;
        let children = &mut self.entry_mut().children;
        let pos = children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomainError::NotAChild { parent, child })?;
        children.remove(pos);
        let released = self.forest.release_subtree(child);
        debug!(%parent, %child, released, "removed child subtree");
        Ok(())
    }

    /// Read-only view of the same node.
    pub fn view(&self) -> NodeRef<'_, T> {
        NodeRef::new(&*self.forest, self.id, self.entry())
    }
}
