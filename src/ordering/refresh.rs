//! Order Refresher
//!
//! Renumbers every sibling group of a menu to base, base + 1, ... in current
//! sibling order, removing fractional drift left by moves.

use serde::Serialize;

use crate::config::OrderingConfig;
use crate::domain::{DomainError, DomainResult, MenuId};
use crate::repository::OrderedItemStore;

use super::tree::MenuTree;

/// Outcome of a refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Nodes loaded
    pub examined: usize,
    /// Nodes whose order changed and were saved
    pub rewritten: usize,
    /// Nodes renumbered at root level because their parent is missing
    pub orphans: usize,
}

/// Renumber all nodes of `menu_id`; only changed nodes are written
pub fn refresh<S: OrderedItemStore + ?Sized>(
    store: &mut S,
    config: &OrderingConfig,
    menu_id: MenuId,
) -> DomainResult<RefreshSummary> {
    let nodes = store.all(menu_id)?;
    let tree = MenuTree::build(&nodes);

    let mut summary = RefreshSummary {
        examined: tree.len(),
        rewritten: 0,
        orphans: tree.orphan_count(),
    };

    for (parent, group) in tree.groups() {
        for (index, id) in group.iter().enumerate() {
            let Some(node) = tree.node(*id) else {
                continue;
            };
            let target = i64::try_from(index)
                .ok()
                .and_then(|index| config.refresh_base.checked_add(index))
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "refresh_base {} overflows for a group of {} nodes",
                        config.refresh_base,
                        group.len()
                    ))
                })? as f64;
            if node.order == target {
                continue;
            }
            log::debug!(
                "Refresh menu {} parent {:?}: node {} order {} -> {}",
                menu_id,
                parent,
                node.id,
                node.order,
                target
            );
            let mut updated = node.clone();
            updated.order = target;
            store.save(&updated)?;
            summary.rewritten += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MenuNode;
    use crate::repository::MemoryStore;

    #[test]
    fn test_refresh_renumbers_each_group() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 0.5));
        store.insert(MenuNode::new(2, 1, "Two", 0.25));
        store.insert(MenuNode::new_child(3, 1, "Three", 1, 7.5));
        store.insert(MenuNode::new_child(4, 1, "Four", 1, 3.0));

        let summary = refresh(&mut store, &OrderingConfig::default(), 1).unwrap();

        assert_eq!(store.get(2).unwrap().order, 1.0);
        assert_eq!(store.get(1).unwrap().order, 2.0);
        assert_eq!(store.get(4).unwrap().order, 1.0);
        assert_eq!(store.get(3).unwrap().order, 2.0);
        assert_eq!(summary.examined, 4);
        assert_eq!(summary.rewritten, 4);
        assert_eq!(summary.orphans, 0);
    }

    #[test]
    fn test_refresh_skips_unchanged_nodes() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 1.0));
        store.insert(MenuNode::new(2, 1, "Two", 2.5));
        store.insert(MenuNode::new(3, 1, "Three", 3.0));

        let summary = refresh(&mut store, &OrderingConfig::default(), 1).unwrap();

        assert_eq!(summary.rewritten, 1);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.get(2).unwrap().order, 2.0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 9.0));
        store.insert(MenuNode::new(2, 1, "Two", -3.0));

        refresh(&mut store, &OrderingConfig::default(), 1).unwrap();
        let first: Vec<MenuNode> = store.nodes().cloned().collect();
        let again = refresh(&mut store, &OrderingConfig::default(), 1).unwrap();

        assert_eq!(again.rewritten, 0);
        assert_eq!(store.nodes().cloned().collect::<Vec<_>>(), first);
    }

    #[test]
    fn test_refresh_leaves_other_menus_alone() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 5.0));
        store.insert(MenuNode::new(2, 2, "Other", 5.0));

        refresh(&mut store, &OrderingConfig::default(), 1).unwrap();

        assert_eq!(store.get(1).unwrap().order, 1.0);
        assert_eq!(store.get(2).unwrap().order, 5.0);
    }

    #[test]
    fn test_refresh_places_orphans_at_root() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 2.0));
        store.insert(MenuNode::new_child(2, 1, "Lost", 77, 1.0));

        let summary = refresh(&mut store, &OrderingConfig::default(), 1).unwrap();

        assert_eq!(summary.orphans, 1);
        assert_eq!(store.get(2).unwrap().order, 1.0);
        assert_eq!(store.get(1).unwrap().order, 2.0);
        // The stored parent reference is not touched
        assert_eq!(store.get(2).unwrap().parent_id, Some(77));
    }

    #[test]
    fn test_base_overflow_is_an_error() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 0.1));
        store.insert(MenuNode::new(2, 1, "Two", 0.2));
        let config = OrderingConfig {
            refresh_base: i64::MAX,
            ..OrderingConfig::default()
        };

        let err = refresh(&mut store, &config, 1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_custom_base() {
        let mut store = MemoryStore::new();
        store.insert(MenuNode::new(1, 1, "One", 0.1));
        store.insert(MenuNode::new(2, 1, "Two", 0.2));
        let config = OrderingConfig {
            refresh_base: 0,
            ..OrderingConfig::default()
        };

        refresh(&mut store, &config, 1).unwrap();

        assert_eq!(store.get(1).unwrap().order, 0.0);
        assert_eq!(store.get(2).unwrap().order, 1.0);
    }
}
