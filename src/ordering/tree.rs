//! Tree Builder
//!
//! Groups a flat node collection by parent and sorts each sibling group.
//! Used by moves for the single-level neighbour lookup and by refresh for
//! the whole-tree pass.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::domain::{MenuNode, NodeId};

/// Sibling order: `order` ascending, then `id` ascending
pub fn compare_siblings(a: &MenuNode, b: &MenuNode) -> Ordering {
    a.order.total_cmp(&b.order).then(a.id.cmp(&b.id))
}

/// Non-fatal irregularities found while building a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TreeAnomaly {
    /// `parent` is not part of the collection; the node was placed at root
    OrphanedParent { node: NodeId, parent: NodeId },
    /// Not reachable from any root (parent cycle)
    Unreachable { node: NodeId },
}

/// A node with its nested children, in sibling order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub node: MenuNode,
    pub children: Vec<TreeNode>,
}

/// Parent-grouped, order-sorted view over a flat node collection
///
/// Group keys are parent ids; `None` is the root level.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    nodes: HashMap<NodeId, MenuNode>,
    groups: BTreeMap<Option<NodeId>, Vec<NodeId>>,
    anomalies: Vec<TreeAnomaly>,
}

impl MenuTree {
    /// Build the tree; never fails
    ///
    /// Duplicate ids keep the last occurrence.
    pub fn build(nodes: &[MenuNode]) -> Self {
        let nodes: HashMap<NodeId, MenuNode> =
            nodes.iter().map(|n| (n.id, n.clone())).collect();

        let mut anomalies = Vec::new();
        let mut grouped: BTreeMap<Option<NodeId>, Vec<&MenuNode>> = BTreeMap::new();
        for node in nodes.values() {
            let key = match node.parent_id {
                Some(parent) if !nodes.contains_key(&parent) => {
                    log::warn!(
                        "Menu node {} references missing parent {}; treating it as root",
                        node.id,
                        parent
                    );
                    anomalies.push(TreeAnomaly::OrphanedParent { node: node.id, parent });
                    None
                }
                parent => parent,
            };
            grouped.entry(key).or_default().push(node);
        }

        let groups: BTreeMap<Option<NodeId>, Vec<NodeId>> = grouped
            .into_iter()
            .map(|(key, mut siblings)| {
                siblings.sort_by(|a, b| compare_siblings(a, b));
                (key, siblings.into_iter().map(|n| n.id).collect())
            })
            .collect();

        let mut tree = Self {
            nodes,
            groups,
            anomalies,
        };
        tree.detect_unreachable();
        tree.anomalies.sort_by_key(|a| match a {
            TreeAnomaly::OrphanedParent { node, .. } => (0, *node),
            TreeAnomaly::Unreachable { node } => (1, *node),
        });
        tree
    }

    fn detect_unreachable(&mut self) {
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(self.nodes.len());
        let mut to_visit: Vec<NodeId> = self.children(None).to_vec();
        while let Some(id) = to_visit.pop() {
            if seen.insert(id) {
                to_visit.extend_from_slice(self.children(Some(id)));
            }
        }

        for id in self.nodes.keys() {
            if !seen.contains(id) {
                log::warn!("Menu node {} is not reachable from any root", id);
                self.anomalies.push(TreeAnomaly::Unreachable { node: *id });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(&id)
    }

    /// Sorted child ids of `parent` (root level for `None`)
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        self.groups.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group `id` is sorted under: its parent, or the root level when the
    /// parent is missing. `None` if the node is not in the tree.
    pub fn group_of(&self, id: NodeId) -> Option<Option<NodeId>> {
        let node = self.nodes.get(&id)?;
        Some(match node.parent_id {
            Some(parent) if self.nodes.contains_key(&parent) => Some(parent),
            _ => None,
        })
    }

    /// Nodes of one group in sibling order
    pub fn siblings(&self, parent: Option<NodeId>) -> Vec<MenuNode> {
        self.children(parent)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .cloned()
            .collect()
    }

    /// Every sibling group, root level first
    pub fn groups(&self) -> impl Iterator<Item = (Option<NodeId>, &[NodeId])> + '_ {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn anomalies(&self) -> &[TreeAnomaly] {
        &self.anomalies
    }

    pub fn orphan_count(&self) -> usize {
        self.anomalies
            .iter()
            .filter(|a| matches!(a, TreeAnomaly::OrphanedParent { .. }))
            .count()
    }

    /// Nested tree starting from the root level
    pub fn nested(&self) -> Vec<TreeNode> {
        self.nest(None)
    }

    fn nest(&self, parent: Option<NodeId>) -> Vec<TreeNode> {
        self.children(parent)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| TreeNode {
                node: node.clone(),
                children: self.nest(Some(node.id)),
            })
            .collect()
    }

    /// Depth-first (node, depth) pairs in display order
    pub fn flatten(&self) -> Vec<(MenuNode, usize)> {
        fn collect(tree: &MenuTree, parent: Option<NodeId>, depth: usize, result: &mut Vec<(MenuNode, usize)>) {
            for id in tree.children(parent) {
                if let Some(node) = tree.nodes.get(id) {
                    result.push((node.clone(), depth));
                    collect(tree, Some(*id), depth + 1, result);
                }
            }
        }

        let mut result = Vec::with_capacity(self.nodes.len());
        collect(self, None, 0, &mut result);
        result
    }
}

/// Closest orders around an anchor within its sibling group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbours {
    /// Greatest order strictly below the anchor's
    pub below: Option<f64>,
    /// Smallest order strictly above the anchor's
    pub above: Option<f64>,
}

impl Neighbours {
    /// Scan `siblings` around `anchor`, ignoring the anchor and `exclude`
    pub fn around(siblings: &[MenuNode], anchor: &MenuNode, exclude: NodeId) -> Self {
        let mut below: Option<f64> = None;
        let mut above: Option<f64> = None;

        for sibling in siblings {
            if sibling.id == anchor.id || sibling.id == exclude {
                continue;
            }
            if sibling.order < anchor.order {
                below = Some(below.map_or(sibling.order, |b| b.max(sibling.order)));
            } else if sibling.order > anchor.order {
                above = Some(above.map_or(sibling.order, |a| a.min(sibling.order)));
            }
        }

        Self { below, above }
    }
}
