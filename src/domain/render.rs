/*
Rendering of forests as text trees via termtree.

The termtree values are assembled bottom-up from a post-order walk. The
resulting `termtree::Tree` is a nested value whose drop (and formatting)
recurses once per level, so rendering is meant for trees of moderate height;
very deep chains should go through `Forest::path` instead.
 */
use std::collections::HashMap;
use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::node::NodeId;
use crate::domain::traversal::TraversalOrder;
use crate::domain::Forest;

pub trait TreeRender {
    /// One text tree per root. Nesting depth of the result equals tree height.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<T: fmt::Display> Forest<T> {
    /// Text tree of the subtree below `id`, None for a stale handle.
    pub fn subtree_to_tree_string(&self, id: NodeId) -> Option<Tree<String>> {
        let iter = self.iter_from(id, TraversalOrder::PostOrder).ok()?;
        let mut built: HashMap<NodeId, Tree<String>> = HashMap::new();

        for node in iter {
            let leaves: Vec<Tree<String>> = node
                .child_ids()
                .iter()
                .filter_map(|c| built.remove(c))
                .collect();
            built.insert(node.id(), Tree::new(node.data().to_string()).with_leaves(leaves));
        }

        built.remove(&id)
    }
}

impl<T: fmt::Display> TreeRender for Forest<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        self.root_ids()
            .iter()
            .filter_map(|&root| self.subtree_to_tree_string(root))
            .collect()
    }
}

impl<T: fmt::Display> fmt::Display for Forest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tree in self.to_tree_strings() {
            write!(f, "{}", tree)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_small_forest_when_rendering_then_shows_each_root() {
        let mut forest = Forest::new();
        let root = forest.add_root("root");
        let mut node = forest.node_mut(root).unwrap();
        let child = node.add_child("child1");
        node.add_child("child2");
        forest.node_mut(child).unwrap().add_child("grandchild1");
        forest.add_root("single");

        let trees = forest.to_tree_strings();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].root, "root");
        assert_eq!(trees[0].leaves.len(), 2);
        assert_eq!(trees[0].leaves[0].leaves[0].root, "grandchild1");

        let text = forest.to_string();
        assert!(text.starts_with("root\n"));
        assert!(text.contains("grandchild1"));
        assert!(text.contains("single"));
    }
}
