//! Menu Node Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for MenuNode CRUD operations.
//! Order values are only assigned on create; moves and refreshes go
//! through the ordering engine.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::config::OrderingConfig;
use crate::domain::{DomainError, DomainResult, MenuId, MenuNode, NodeId};
use super::super::db::now_millis;
use super::super::traits::Repository;
use super::node_positioning::next_order_in;

pub(crate) const NODE_COLUMNS: &str =
    "id, menu_id, name, url, parent_id, sort_order, created_at, updated_at";

/// Ids of every descendant of node `?1`
const DESCENDANTS: &str = "WITH RECURSIVE descendants AS (
        SELECT id FROM menu_nodes WHERE parent_id = ?1
        UNION
        SELECT n.id FROM menu_nodes n
        JOIN descendants d ON n.parent_id = d.id
    )";

/// SQLite implementation of MenuNode repository
pub struct NodeRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
    pub(super) ordering: OrderingConfig,
}

impl NodeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self::with_config(conn, OrderingConfig::default())
    }

    pub fn with_config(conn: Arc<Mutex<Connection>>, ordering: OrderingConfig) -> Self {
        Self { conn, ordering }
    }

    /// Nodes of one menu, parents first then by sibling order
    pub async fn list_by_menu(&self, menu_id: MenuId) -> DomainResult<Vec<MenuNode>> {
        let conn = self.conn.lock().await;
        list_menu_nodes(&conn, menu_id)
    }
}

pub(crate) fn list_menu_nodes(conn: &Connection, menu_id: MenuId) -> DomainResult<Vec<MenuNode>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM menu_nodes WHERE menu_id = ?1 ORDER BY parent_id NULLS FIRST, sort_order, id",
        NODE_COLUMNS
    ))?;
    let nodes = stmt
        .query_map(params![menu_id], row_to_node)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(nodes)
}

/// Parent must exist in `menu_id` and, for an existing node, must not be
/// the node itself or one of its descendants
fn check_parent(
    conn: &Connection,
    menu_id: MenuId,
    node_id: Option<NodeId>,
    parent_id: NodeId,
) -> DomainResult<()> {
    match find_node(conn, parent_id)? {
        Some(parent) if parent.menu_id == menu_id => {}
        _ => {
            return Err(DomainError::InvalidInput(format!(
                "Parent node {} is not part of menu {}",
                parent_id, menu_id
            )))
        }
    }

    let Some(id) = node_id else {
        return Ok(());
    };
    if parent_id == id {
        return Err(DomainError::InvalidInput(format!(
            "Node {} cannot be its own parent",
            id
        )));
    }
    let cycle: bool = conn.query_row(
        &format!(
            "{} SELECT EXISTS(SELECT 1 FROM descendants WHERE id = ?2)",
            DESCENDANTS
        ),
        params![id, parent_id],
        |row| row.get(0),
    )?;
    if cycle {
        return Err(DomainError::InvalidInput(format!(
            "Node {} cannot be moved under its descendant {}",
            id, parent_id
        )));
    }
    Ok(())
}

pub(crate) fn find_node(conn: &Connection, id: NodeId) -> DomainResult<Option<MenuNode>> {
    let node = conn
        .query_row(
            &format!("SELECT {} FROM menu_nodes WHERE id = ?1", NODE_COLUMNS),
            params![id],
            row_to_node,
        )
        .optional()?;
    Ok(node)
}

#[async_trait]
impl Repository<MenuNode> for NodeRepository {
    /// Insert at the end of the node's sibling group; the given order is ignored
    async fn create(&self, entity: &MenuNode) -> DomainResult<MenuNode> {
        let conn = self.conn.lock().await;

        if let Some(parent_id) = entity.parent_id {
            check_parent(&conn, entity.menu_id, None, parent_id)?;
        }

        let order = next_order_in(&conn, &self.ordering, entity.menu_id, entity.parent_id)?;
        let now = now_millis();
        conn.execute(
            "INSERT INTO menu_nodes (menu_id, name, url, parent_id, sort_order, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![entity.menu_id, entity.name, entity.url, entity.parent_id, order, now],
        )?;

        let rowid = conn.last_insert_rowid();
        let id = NodeId::try_from(rowid)
            .map_err(|_| DomainError::Internal(format!("Node rowid {} out of range", rowid)))?;
        find_node(&conn, id)?
            .ok_or_else(|| DomainError::Internal(format!("Node {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: NodeId) -> DomainResult<Option<MenuNode>> {
        let conn = self.conn.lock().await;
        find_node(&conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<MenuNode>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM menu_nodes ORDER BY menu_id, parent_id NULLS FIRST, sort_order, id",
            NODE_COLUMNS
        ))?;
        let nodes = stmt
            .query_map([], row_to_node)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }

    /// Update name, url and parent; `order` is left to the ordering engine
    async fn update(&self, entity: &MenuNode) -> DomainResult<MenuNode> {
        let conn = self.conn.lock().await;

        let current = find_node(&conn, entity.id)?
            .ok_or_else(|| DomainError::NotFound(format!("Node {} not found", entity.id)))?;
        if let Some(parent_id) = entity.parent_id {
            if current.parent_id != Some(parent_id) {
                check_parent(&conn, current.menu_id, Some(current.id), parent_id)?;
            }
        }

        conn.execute(
            "UPDATE menu_nodes SET name = ?1, url = ?2, parent_id = ?3, updated_at = ?4 WHERE id = ?5",
            params![entity.name, entity.url, entity.parent_id, now_millis(), entity.id],
        )?;

        find_node(&conn, entity.id)?
            .ok_or_else(|| DomainError::NotFound(format!("Node {} not found", entity.id)))
    }

    async fn delete(&self, id: NodeId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        // Manual cascade: delete all descendants first
        tx.execute(
            &format!(
                "DELETE FROM menu_nodes WHERE id IN ({} SELECT id FROM descendants)",
                DESCENDANTS
            ),
            params![id],
        )?;

        // Delete the node itself
        tx.execute("DELETE FROM menu_nodes WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }
}

/// Convert a database row to MenuNode
pub(crate) fn row_to_node(row: &Row) -> rusqlite::Result<MenuNode> {
    Ok(MenuNode {
        id: row.get(0)?,
        menu_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        parent_id: row.get(4)?,
        order: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
