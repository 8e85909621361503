//! Menu Node Entity
//!
//! A single entry of a menu tree (single parent). The ordering engine only
//! reads `id`, `menu_id` and `parent_id` and only ever rewrites `order`.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::menu::MenuId;

pub type NodeId = u32;

/// A navigation entry with hierarchical structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Unique identifier
    pub id: NodeId,
    /// Menu this node belongs to
    pub menu_id: MenuId,
    /// Display name
    pub name: String,
    /// Link target
    pub url: Option<String>,
    /// Parent node ID (None = root level)
    pub parent_id: Option<NodeId>,
    /// Position within siblings, ascending
    pub order: f64,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl MenuNode {
    /// Create a new root node
    pub fn new(id: NodeId, menu_id: MenuId, name: impl Into<String>, order: f64) -> Self {
        Self {
            id,
            menu_id,
            name: name.into(),
            url: None,
            parent_id: None,
            order,
            created_at: None,
            updated_at: None,
        }
    }

    /// Create a new node under a parent
    pub fn new_child(
        id: NodeId,
        menu_id: MenuId,
        name: impl Into<String>,
        parent_id: NodeId,
        order: f64,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, menu_id, name, order)
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Check if this is a root node (no parent)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Same menu and same parent
    pub fn is_sibling_of(&self, other: &MenuNode) -> bool {
        self.menu_id == other.menu_id && self.parent_id == other.parent_id
    }
}

impl Entity for MenuNode {
    type Id = NodeId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
