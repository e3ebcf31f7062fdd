//! In-place reordering of children across whole subtrees.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use generational_arena::Arena;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, TreeNode};
use crate::domain::Forest;

/// Structural transformation applied to every node of a subtree.
///
/// `reverse` is accepted as another spelling of `Mirror`; both reverse the
/// children of every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Translation {
    #[serde(alias = "reverse")]
    Mirror,
    SortAscending,
    SortDescending,
}

impl Translation {
    /// Maps the integer codes used by host callers:
    /// 0 mirror, 1 reverse (same as mirror), 2 ascending, 3 descending.
    pub fn from_code(code: i32) -> DomainResult<Self> {
        match code {
            0 | 1 => Ok(Translation::Mirror),
            2 => Ok(Translation::SortAscending),
            3 => Ok(Translation::SortDescending),
            _ => Err(DomainError::UnknownTranslation(code.to_string())),
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Translation::Mirror => "mirror",
            Translation::SortAscending => "sort-ascending",
            Translation::SortDescending => "sort-descending",
        };
        f.write_str(name)
    }
}

impl FromStr for Translation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "mirror" | "reverse" => Ok(Translation::Mirror),
            "sort-ascending" | "ascending" | "asc" => Ok(Translation::SortAscending),
            "sort-descending" | "descending" | "desc" => Ok(Translation::SortDescending),
            _ => Err(DomainError::UnknownTranslation(s.to_string())),
        }
    }
}

fn payload<T>(arena: &Arena<TreeNode<T>>, id: NodeId) -> Option<&T> {
    arena.get(id.index).map(|node| &node.data)
}

impl<T> Forest<T> {
    /// Reverses the children of every node in the forest.
    #[instrument(level = "debug", skip(self))]
    pub fn mirror(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.reorder_subtree(root, |children, _| children.reverse());
        }
    }

    /// Visits the subtree below `top` in pre-order on an explicit stack and
    /// lets `reorder` rearrange each node's children before descending.
    fn reorder_subtree<F>(&mut self, top: NodeId, mut reorder: F) -> usize
    where
        F: FnMut(&mut Vec<NodeId>, &Arena<TreeNode<T>>),
    {
        let mut stack = vec![top];
        let mut visited = 0;

        while let Some(id) = stack.pop() {
            let Some(node) = self.arena.get_mut(id.index) else {
                continue;
            };
            let mut children = std::mem::take(&mut node.children);
            reorder(&mut children, &self.arena);
            stack.extend(children.iter().rev().copied());
            if let Some(node) = self.arena.get_mut(id.index) {
                node.children = children;
            }
            visited += 1;
        }

        visited
    }
}

impl<T: Ord> Forest<T> {
    /// Applies `translation` to every root subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn translate(&mut self, translation: Translation) {
        let roots = self.roots.clone();
        let visited: usize = roots
            .into_iter()
            .map(|root| self.apply(root, translation))
            .sum();
        debug!(%translation, visited, "translated forest");
    }

    /// Applies `translation` to the subtree below `id` only.
    #[instrument(level = "debug", skip(self))]
    pub fn translate_subtree(&mut self, id: NodeId, translation: Translation) -> DomainResult<()> {
        if !self.contains(id) {
            return Err(DomainError::InvalidHandle(id));
        }
        let visited = self.apply(id, translation);
        debug!(%id, %translation, visited, "translated subtree");
        Ok(())
    }

    fn apply(&mut self, top: NodeId, translation: Translation) -> usize {
        match translation {
            Translation::Mirror => self.reorder_subtree(top, |children, _| children.reverse()),
            Translation::SortAscending => self.reorder_subtree(top, |children, arena| {
                children.sort_by(|a, b| payload(arena, *a).cmp(&payload(arena, *b)))
            }),
            Translation::SortDescending => self.reorder_subtree(top, |children, arena| {
                children.sort_by(|a, b| descending(payload(arena, *a), payload(arena, *b)))
            }),
        }
    }
}

fn descending<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    b.cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Translation::Mirror)]
    #[case(1, Translation::Mirror)]
    #[case(2, Translation::SortAscending)]
    #[case(3, Translation::SortDescending)]
    fn given_host_code_when_mapping_then_returns_translation(
        #[case] code: i32,
        #[case] expected: Translation,
    ) {
        assert_eq!(Translation::from_code(code).unwrap(), expected);
    }

    #[test]
    fn given_unknown_host_code_when_mapping_then_fails() {
        assert!(Translation::from_code(4).is_err());
        assert!(Translation::from_code(-1).is_err());
    }

    #[rstest]
    #[case("reverse", Translation::Mirror)]
    #[case("MIRROR", Translation::Mirror)]
    #[case("sort_ascending", Translation::SortAscending)]
    #[case("desc", Translation::SortDescending)]
    fn given_translation_name_when_parsing_then_returns_translation(
        #[case] input: &str,
        #[case] expected: Translation,
    ) {
        assert_eq!(input.parse::<Translation>().unwrap(), expected);
    }

    #[test]
    fn given_equal_payloads_when_sorting_then_keeps_insertion_order() {
        let mut forest = Forest::new();
        let root = forest.add_root((0, 'r'));
        let mut node = forest.node_mut(root).unwrap();
        let first = node.add_child((1, 'a'));
        let second = node.add_child((1, 'a'));
        node.add_child((0, 'z'));

        forest.translate(Translation::SortAscending);

        let children = forest.node(root).unwrap().child_ids().to_vec();
        assert_eq!(&children[1..], &[first, second]);
    }
}
