//! Fractional Orderer
//!
//! Places one node directly before or after another by giving it an order
//! value between the anchor and the anchor's neighbour. No other node is
//! written.

use serde::{Deserialize, Serialize};

use crate::config::OrderingConfig;
use crate::domain::{DomainError, DomainResult, MenuId, MenuNode, NodeId};
use crate::repository::OrderedItemStore;

use super::tree::{MenuTree, Neighbours};

/// Which side of the anchor the moved node lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Before => "before",
            Placement::After => "after",
        }
    }
}

/// A single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub moved: NodeId,
    pub anchor: NodeId,
    pub placement: Placement,
    /// When set, both nodes must belong to this menu
    pub menu_id: Option<MenuId>,
}

impl MoveRequest {
    pub fn before(moved: NodeId, anchor: NodeId) -> Self {
        Self {
            moved,
            anchor,
            placement: Placement::Before,
            menu_id: None,
        }
    }

    pub fn after(moved: NodeId, anchor: NodeId) -> Self {
        Self {
            moved,
            anchor,
            placement: Placement::After,
            menu_id: None,
        }
    }

    pub fn in_menu(mut self, menu_id: MenuId) -> Self {
        self.menu_id = Some(menu_id);
        self
    }
}

/// Order strictly between the anchor's predecessor (or the lower bound) and the anchor
pub fn order_before(config: &OrderingConfig, below: Option<f64>, anchor: f64) -> DomainResult<f64> {
    let below = below.unwrap_or(config.lower_bound);
    let order = (below + anchor) / 2.0;
    if order > below && order < anchor {
        Ok(order)
    } else {
        Err(DomainError::GapExhausted { below, above: anchor })
    }
}

/// Order strictly between the anchor and its successor, or one gap past a last anchor
pub fn order_after(config: &OrderingConfig, anchor: f64, above: Option<f64>) -> DomainResult<f64> {
    let (order, above) = match above {
        Some(above) => ((anchor + above) / 2.0, above),
        None => (anchor + config.append_gap, f64::INFINITY),
    };
    if order > anchor && order < above {
        Ok(order)
    } else {
        Err(DomainError::GapExhausted { below: anchor, above })
    }
}

fn load<S: OrderedItemStore + ?Sized>(
    store: &S,
    id: NodeId,
    menu_id: Option<MenuId>,
) -> DomainResult<MenuNode> {
    let node = store.find(id)?;
    match menu_id {
        Some(menu) if node.menu_id != menu => Err(DomainError::NotFound(format!(
            "Node {} not found in menu {}",
            id, menu
        ))),
        _ => Ok(node),
    }
}

/// Apply a move against an open store; returns the moved node as saved
pub fn apply<S: OrderedItemStore + ?Sized>(
    store: &mut S,
    config: &OrderingConfig,
    request: &MoveRequest,
) -> DomainResult<MenuNode> {
    let mut moved = load(store, request.moved, request.menu_id)?;
    let anchor = load(store, request.anchor, request.menu_id)?;

    if moved.id == anchor.id {
        return Ok(moved);
    }

    // Orphans sit at root level, the same as in refresh and tree output
    let tree = MenuTree::build(&store.all(anchor.menu_id)?);
    let group = tree.group_of(anchor.id).unwrap_or(anchor.parent_id);
    if tree.group_of(moved.id) != Some(group) {
        log::warn!(
            "Moving node {} {} node {} which has a different parent; parent is kept",
            moved.id,
            request.placement.as_str(),
            anchor.id
        );
    }

    let siblings = tree.siblings(group);
    let neighbours = Neighbours::around(&siblings, &anchor, moved.id);

    let order = match request.placement {
        Placement::Before => order_before(config, neighbours.below, anchor.order)?,
        Placement::After => order_after(config, anchor.order, neighbours.above)?,
    };

    let (low, high) = match request.placement {
        Placement::Before => (neighbours.below.unwrap_or(config.lower_bound), anchor.order),
        Placement::After => (anchor.order, neighbours.above.unwrap_or(f64::INFINITY)),
    };
    let gap = (order - low).min(high - order);
    if gap < config.refresh_hint_gap {
        log::warn!(
            "Order gap around node {} is down to {:e}; menu {} needs a refresh",
            anchor.id,
            gap,
            anchor.menu_id
        );
    }

    log::debug!(
        "Node {} order {} -> {} ({} node {})",
        moved.id,
        moved.order,
        order,
        request.placement.as_str(),
        anchor.id
    );
    moved.order = order;
    store.save(&moved)?;
    Ok(moved)
}

/// Place `moved_id` directly before `anchor_id`
pub fn move_before<S: OrderedItemStore + ?Sized>(
    store: &mut S,
    config: &OrderingConfig,
    moved_id: NodeId,
    anchor_id: NodeId,
) -> DomainResult<MenuNode> {
    apply(store, config, &MoveRequest::before(moved_id, anchor_id))
}

/// Place `moved_id` directly after `anchor_id`
pub fn move_after<S: OrderedItemStore + ?Sized>(
    store: &mut S,
    config: &OrderingConfig,
    moved_id: NodeId,
    anchor_id: NodeId,
) -> DomainResult<MenuNode> {
    apply(store, config, &MoveRequest::after(moved_id, anchor_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn store_with(orders: &[(NodeId, f64)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (id, order) in orders {
            store.insert(MenuNode::new(*id, 1, format!("Node {}", id), *order));
        }
        store
    }

    #[test]
    fn test_order_before_midpoint() {
        let config = OrderingConfig::default();
        assert_eq!(order_before(&config, Some(1.0), 2.0).unwrap(), 1.5);
        assert_eq!(order_before(&config, None, 1.0).unwrap(), 0.5);
    }

    #[test]
    fn test_order_after_midpoint_and_append() {
        let config = OrderingConfig::default();
        assert_eq!(order_after(&config, 2.0, Some(3.0)).unwrap(), 2.5);
        assert_eq!(order_after(&config, 5.0, None).unwrap(), 6.0);
    }

    #[test]
    fn test_exhausted_gap_is_an_error() {
        let config = OrderingConfig::default();
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        assert_eq!(
            order_before(&config, Some(1.0), next),
            Err(DomainError::GapExhausted { below: 1.0, above: next })
        );
        assert!(order_after(&config, 1.0, Some(next)).is_err());
        // Nothing fits between the lower bound and a non-positive first anchor
        assert!(order_before(&config, None, 0.0).is_err());
    }

    #[test]
    fn test_move_before_first_sibling() {
        let mut store = store_with(&[(1, 1.0), (2, 2.0)]);
        let config = OrderingConfig::default();

        let moved = move_before(&mut store, &config, 2, 1).unwrap();

        assert_eq!(moved.order, 0.5);
        assert_eq!(store.get(2).unwrap().order, 0.5);
        assert_eq!(store.get(1).unwrap().order, 1.0);
    }

    #[test]
    fn test_move_after_middle_sibling() {
        let mut store = store_with(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let config = OrderingConfig::default();

        let moved = move_after(&mut store, &config, 1, 2).unwrap();

        assert_eq!(moved.order, 2.5);
        assert_eq!(store.get(2).unwrap().order, 2.0);
        assert_eq!(store.get(3).unwrap().order, 3.0);
    }

    #[test]
    fn test_move_after_last_sibling_appends() {
        let mut store = store_with(&[(1, 1.0), (2, 5.0)]);
        let config = OrderingConfig::default();

        let moved = move_after(&mut store, &config, 1, 2).unwrap();
        assert_eq!(moved.order, 6.0);
    }

    #[test]
    fn test_moved_node_is_not_its_own_neighbour() {
        // 1, 2(moved), 3: placing 2 before 3 must land between 1 and 3
        let mut store = store_with(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let config = OrderingConfig::default();

        let moved = move_before(&mut store, &config, 2, 3).unwrap();
        assert_eq!(moved.order, 2.0);
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        let mut store = store_with(&[(1, 1.0), (2, 2.0)]);
        let config = OrderingConfig::default();

        let moved = move_after(&mut store, &config, 2, 2).unwrap();

        assert_eq!(moved.order, 2.0);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_missing_nodes_write_nothing() {
        let mut store = store_with(&[(1, 1.0)]);
        let config = OrderingConfig::default();

        let err = move_before(&mut store, &config, 99, 1).unwrap_err();
        assert!(err.is_not_found());
        let err = move_after(&mut store, &config, 1, 99).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_menu_scope_enforced() {
        let mut store = store_with(&[(1, 1.0)]);
        store.insert(MenuNode::new(2, 7, "Elsewhere", 1.0));
        let config = OrderingConfig::default();

        let err = apply(&mut store, &config, &MoveRequest::after(2, 1).in_menu(1)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_siblings_scoped_by_parent() {
        let mut store = store_with(&[(1, 1.0)]);
        store.insert(MenuNode::new_child(2, 1, "Child A", 1, 1.0));
        store.insert(MenuNode::new_child(3, 1, "Child B", 1, 4.0));
        store.insert(MenuNode::new(4, 1, "Root B", 2.0));
        let config = OrderingConfig::default();

        // Root node 4 at 2.0 must not bound a move inside parent 1
        let moved = move_after(&mut store, &config, 3, 2).unwrap();
        assert_eq!(moved.order, 2.0);
        assert_eq!(moved.parent_id, Some(1));
    }

    #[test]
    fn test_orphan_bounds_root_moves() {
        // Orphan 2 (parent 77 missing) sorts at root between 1 and 3
        let mut store = store_with(&[(1, 1.0), (3, 9.0)]);
        store.insert(MenuNode::new_child(2, 1, "Orphan", 77, 5.0));
        let config = OrderingConfig::default();

        let moved = move_after(&mut store, &config, 3, 1).unwrap();
        assert_eq!(moved.order, 3.0);

        let moved = move_before(&mut store, &config, 1, 2).unwrap();
        assert_eq!(moved.order, 4.0);
        assert_eq!(store.get(2).unwrap().parent_id, Some(77));
    }
}
