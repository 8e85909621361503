//! Ordering Engine
//!
//! Fractional moves and dense renumbering of menu nodes:
//! - tree: parent grouping and sibling sort (TreeBuilder)
//! - fractional: insert before/after without touching siblings
//! - refresh: renumber sibling groups to consecutive integers

mod fractional;
mod refresh;
mod tree;

pub use fractional::{
    apply, move_after, move_before, order_after, order_before, MoveRequest, Placement,
};
pub use refresh::{refresh, RefreshSummary};
pub use tree::{compare_siblings, MenuTree, Neighbours, TreeAnomaly, TreeNode};

use crate::config::OrderingConfig;
use crate::domain::{DomainResult, MenuId, MenuNode, NodeId};
use crate::repository::{in_transaction, TransactionalStore};

/// Transactional entry point over any `TransactionalStore`
///
/// Every operation reads and writes inside one transaction; a failure
/// leaves no order changed.
#[derive(Debug, Clone, Default)]
pub struct OrderingEngine {
    config: OrderingConfig,
}

impl OrderingEngine {
    pub fn new(config: OrderingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    pub fn move_before<S: TransactionalStore>(
        &self,
        store: &mut S,
        moved_id: NodeId,
        anchor_id: NodeId,
    ) -> DomainResult<MenuNode> {
        self.apply(store, &MoveRequest::before(moved_id, anchor_id))
    }

    pub fn move_after<S: TransactionalStore>(
        &self,
        store: &mut S,
        moved_id: NodeId,
        anchor_id: NodeId,
    ) -> DomainResult<MenuNode> {
        self.apply(store, &MoveRequest::after(moved_id, anchor_id))
    }

    pub fn apply<S: TransactionalStore>(
        &self,
        store: &mut S,
        request: &MoveRequest,
    ) -> DomainResult<MenuNode> {
        in_transaction(store, |tx| fractional::apply(tx, &self.config, request))
    }

    pub fn refresh<S: TransactionalStore>(
        &self,
        store: &mut S,
        menu_id: MenuId,
    ) -> DomainResult<RefreshSummary> {
        in_transaction(store, |tx| refresh::refresh(tx, &self.config, menu_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::repository::MemoryStore;

    fn menu(orders: &[(NodeId, &str, f64)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (id, name, order) in orders {
            store.insert(MenuNode::new(*id, 1, *name, *order));
        }
        store
    }

    #[test]
    fn test_move_then_refresh() {
        let mut store = menu(&[(1, "NodeOne", 1.0), (2, "NodeTwo", 2.0), (3, "NodeThree", 3.0)]);
        let engine = OrderingEngine::default();

        let moved = engine.move_after(&mut store, 1, 2).unwrap();
        assert_eq!(moved.order, 2.5);

        engine.refresh(&mut store, 1).unwrap();
        assert_eq!(store.get(2).unwrap().order, 1.0);
        assert_eq!(store.get(1).unwrap().order, 2.0);
        assert_eq!(store.get(3).unwrap().order, 3.0);
    }

    #[test]
    fn test_failed_save_rolls_back_refresh() {
        let mut store = menu(&[(1, "A", 3.0), (2, "B", 1.5), (3, "C", 0.5)]);
        store.fail_saves_after(1);
        let engine = OrderingEngine::default();

        let err = engine.refresh(&mut store, 1).unwrap_err();

        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(store.get(1).unwrap().order, 3.0);
        assert_eq!(store.get(2).unwrap().order, 1.5);
        assert_eq!(store.get(3).unwrap().order, 0.5);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_not_found_commits_nothing() {
        let mut store = menu(&[(1, "A", 1.0)]);
        let engine = OrderingEngine::default();

        let err = engine.move_before(&mut store, 404, 1).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.commit_count(), 0);
        assert_eq!(store.save_count(), 0);
    }
}
