//! Menu Repository
//!
//! Handles all menu-related database operations.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Menu, MenuId};
use super::db::now_millis;
use super::traits::Repository;

pub struct MenuRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MenuRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub async fn find_by_handle(&self, handle: &str) -> DomainResult<Option<Menu>> {
        let conn = self.conn.lock().await;
        let menu = conn
            .query_row(
                "SELECT id, name, handle, description FROM menus WHERE handle = ?1",
                params![handle],
                row_to_menu,
            )
            .optional()?;
        Ok(menu)
    }
}

/// Look up a menu on an already locked connection
pub(crate) fn find_menu(conn: &Connection, id: MenuId) -> DomainResult<Option<Menu>> {
    let menu = conn
        .query_row(
            "SELECT id, name, handle, description FROM menus WHERE id = ?1",
            params![id],
            row_to_menu,
        )
        .optional()?;
    Ok(menu)
}

/// Like `find_menu` but missing menus are an error
pub(crate) fn require_menu(conn: &Connection, id: MenuId) -> DomainResult<Menu> {
    find_menu(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Menu {} not found", id)))
}

fn row_to_menu(row: &Row) -> rusqlite::Result<Menu> {
    Ok(Menu {
        id: row.get(0)?,
        name: row.get(1)?,
        handle: row.get(2)?,
        description: row.get(3)?,
    })
}

#[async_trait]
impl Repository<Menu> for MenuRepository {
    async fn create(&self, entity: &Menu) -> DomainResult<Menu> {
        let conn = self.conn.lock().await;

        let now = now_millis();
        conn.execute(
            "INSERT INTO menus (name, handle, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![entity.name, entity.handle, entity.description, now],
        )
        .map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => {
                DomainError::Conflict(format!("Menu handle '{}' is already taken", entity.handle))
            }
            other => other,
        })?;

        let rowid = conn.last_insert_rowid();
        let id = MenuId::try_from(rowid)
            .map_err(|_| DomainError::Internal(format!("Menu rowid {} out of range", rowid)))?;
        require_menu(&conn, id)
    }

    async fn find_by_id(&self, id: MenuId) -> DomainResult<Option<Menu>> {
        let conn = self.conn.lock().await;
        find_menu(&conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Menu>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare("SELECT id, name, handle, description FROM menus ORDER BY name, id")?;
        let menus = stmt
            .query_map([], row_to_menu)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(menus)
    }

    async fn update(&self, entity: &Menu) -> DomainResult<Menu> {
        let conn = self.conn.lock().await;

        let changed = conn.execute(
            "UPDATE menus SET name = ?1, handle = ?2, description = ?3, updated_at = ?4 WHERE id = ?5",
            params![entity.name, entity.handle, entity.description, now_millis(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Menu {} not found", entity.id)));
        }
        require_menu(&conn, entity.id)
    }

    /// Delete the menu and all of its nodes
    async fn delete(&self, id: MenuId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM menu_nodes WHERE menu_id = ?1", params![id])?;
        tx.execute("DELETE FROM menus WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }
}
