//! Transactional Node Store
//!
//! `OrderedItemStore` bound to one SQLite transaction. Opened with
//! `BEGIN IMMEDIATE` so concurrent writers cannot read stale neighbours
//! between our read and our write.

use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::domain::{DomainError, DomainResult, MenuId, MenuNode, NodeId};
use super::super::db::now_millis;
use super::super::traits::{OrderedItemStore, StoreTransaction, TransactionalStore};
use super::node_repo::{find_node, list_menu_nodes, row_to_node, NODE_COLUMNS};

pub struct SqliteNodeStore<'c> {
    tx: Transaction<'c>,
}

impl<'c> SqliteNodeStore<'c> {
    pub fn begin(conn: &'c mut Connection) -> DomainResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Self { tx })
    }
}

impl OrderedItemStore for SqliteNodeStore<'_> {
    fn find(&self, id: NodeId) -> DomainResult<MenuNode> {
        find_node(&self.tx, id)?.ok_or_else(|| DomainError::NotFound(format!("Node {} not found", id)))
    }

    fn siblings(&self, menu_id: MenuId, parent_id: Option<NodeId>) -> DomainResult<Vec<MenuNode>> {
        let mut stmt = self.tx.prepare(&format!(
            "SELECT {} FROM menu_nodes WHERE menu_id = ?1 AND parent_id IS ?2 ORDER BY sort_order, id",
            NODE_COLUMNS
        ))?;
        let nodes = stmt
            .query_map(params![menu_id, parent_id], row_to_node)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }

    fn all(&self, menu_id: MenuId) -> DomainResult<Vec<MenuNode>> {
        list_menu_nodes(&self.tx, menu_id)
    }

    fn save(&mut self, node: &MenuNode) -> DomainResult<()> {
        let changed = self.tx.execute(
            "UPDATE menu_nodes SET sort_order = ?1, updated_at = ?2 WHERE id = ?3",
            params![node.order, now_millis(), node.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Node {} not found", node.id)));
        }
        Ok(())
    }
}

impl StoreTransaction for SqliteNodeStore<'_> {
    fn commit(self) -> DomainResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl TransactionalStore for Connection {
    type Tx<'a> = SqliteNodeStore<'a>
    where
        Self: 'a;

    fn begin(&mut self) -> DomainResult<Self::Tx<'_>> {
        SqliteNodeStore::begin(self)
    }
}
