//! Node Positioning Operations
//!
//! Order value handed to a node appended at the end of its sibling group.

use rusqlite::{params, Connection};

use crate::config::OrderingConfig;
use crate::domain::{DomainResult, MenuId, NodeId};

/// Highest sibling order plus the append gap, or the refresh base for an empty group
pub(crate) fn next_order_in(
    conn: &Connection,
    config: &OrderingConfig,
    menu_id: MenuId,
    parent_id: Option<NodeId>,
) -> DomainResult<f64> {
    let max: Option<f64> = conn.query_row(
        "SELECT MAX(sort_order) FROM menu_nodes WHERE menu_id = ?1 AND parent_id IS ?2",
        params![menu_id, parent_id],
        |row| row.get(0),
    )?;

    Ok(match max {
        Some(max) => max + config.append_gap,
        None => config.refresh_base as f64,
    })
}
