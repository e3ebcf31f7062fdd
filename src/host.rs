//! Handle-based access for host processes.
//!
//! A host never sees references into a forest. It holds plain copyable
//! handles, and every accessor re-validates them: a handle to a destroyed
//! forest or a removed node yields `None`, `0` or an error, never a different
//! node.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::{DomainError, DomainResult, Forest, NodeId, Translation};

/// Payload type exposed to hosts.
pub type HostValue = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForestHandle(Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    forest: ForestHandle,
    node: NodeId,
}

impl NodeHandle {
    pub fn forest(&self) -> ForestHandle {
        self.forest
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Owner of all forests created on behalf of a host.
#[derive(Debug)]
pub struct HostRegistry {
    forests: Arena<Forest<HostValue>>,
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HostRegistry {
    pub fn new() -> Self {
        Self {
            forests: Arena::new(),
        }
    }

    /// Number of live forests.
    pub fn len(&self) -> usize {
        self.forests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forests.is_empty()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn create_forest(&mut self) -> ForestHandle {
        let handle = ForestHandle(self.forests.insert(Forest::new()));
        debug!(?handle, "created forest");
        handle
    }

    /// Creates a forest with one root and applies the translation with the
    /// given host code. An unknown code creates nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn start_forest(
        &mut self,
        root_value: HostValue,
        translation_code: i32,
    ) -> DomainResult<ForestHandle> {
        let translation = Translation::from_code(translation_code)?;
        let handle = self.create_forest();
        let forest = self.forest_mut(handle)?;
        forest.add_root(root_value);
        forest.translate(translation);
        Ok(handle)
    }

    pub fn forest(&self, handle: ForestHandle) -> Option<&Forest<HostValue>> {
        self.forests.get(handle.0)
    }

    pub fn forest_mut(&mut self, handle: ForestHandle) -> DomainResult<&mut Forest<HostValue>> {
        self.forests
            .get_mut(handle.0)
            .ok_or(DomainError::InvalidForestHandle)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_root(&mut self, forest: ForestHandle, value: HostValue) -> DomainResult<NodeHandle> {
        let node = self.forest_mut(forest)?.add_root(value);
        Ok(NodeHandle { forest, node })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeHandle, value: HostValue) -> DomainResult<NodeHandle> {
        let node = self
            .forest_mut(parent.forest)?
            .node_mut(parent.node)?
            .add_child(value);
        Ok(NodeHandle {
            forest: parent.forest,
            node,
        })
    }

    pub fn first_root(&self, forest: ForestHandle) -> Option<NodeHandle> {
        let node = *self.forest(forest)?.root_ids().first()?;
        Some(NodeHandle { forest, node })
    }

    /// Child count, 0 for a stale handle.
    pub fn children_count(&self, node: NodeHandle) -> usize {
        self.forest(node.forest)
            .and_then(|f| f.node(node.node))
            .map_or(0, |n| n.child_count())
    }

    pub fn child_at(&self, node: NodeHandle, index: usize) -> Option<NodeHandle> {
        let child = self
            .forest(node.forest)?
            .node(node.node)?
            .child_ids()
            .get(index)
            .copied()?;
        Some(NodeHandle {
            forest: node.forest,
            node: child,
        })
    }

    pub fn value(&self, node: NodeHandle) -> Option<HostValue> {
        self.forest(node.forest)?
            .node(node.node)
            .map(|n| *n.data())
    }

    /// Applies the translation with the given host code to the whole forest.
    #[instrument(level = "debug", skip(self))]
    pub fn translate(&mut self, forest: ForestHandle, translation_code: i32) -> DomainResult<()> {
        let translation = Translation::from_code(translation_code)?;
        self.forest_mut(forest)?.translate(translation);
        Ok(())
    }

    /// Destroys the forest and every node in it. False for a stale handle.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy_forest(&mut self, forest: ForestHandle) -> bool {
        let destroyed = self.forests.remove(forest.0).is_some();
        debug!(?forest, destroyed, "destroy forest");
        destroyed
    }
}
