//! Menu Node Commands
//!
//! Node CRUD plus the ordering operations:
//! `POST menus/{menu}/nodes/move/before`, `POST menus/{menu}/nodes/move/after`
//! and `PATCH menus/{menu}/nodes/refresh` map onto `move_node_before`,
//! `move_node_after` and `refresh_nodes`.

use serde::Serialize;

use crate::context::RequestContext;
use crate::domain::{DomainError, DomainResult, MenuId, MenuNode, NodeId};
use crate::ordering::{MenuTree, MoveRequest, RefreshSummary, TreeNode};
use crate::repository::{list_menu_nodes, require_menu, NodeRepository, Repository};
use crate::AppState;

/// A node with its depth in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeEntry {
    pub node: MenuNode,
    pub depth: usize,
}

async fn move_node(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
    request: MoveRequest,
) -> DomainResult<MenuNode> {
    let conn = state.db.connection();
    let mut conn = conn.lock().await;

    let menu = require_menu(&conn, menu_id)?;
    let node = state.engine.apply(&mut *conn, &request.in_menu(menu_id))?;

    log::info!("{}: {}", ctx.label(), menu.ordering_activity());
    Ok(node)
}

/// Place node `move_id` directly before `before_id`
pub async fn move_node_before(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
    move_id: NodeId,
    before_id: NodeId,
) -> DomainResult<MenuNode> {
    move_node(state, ctx, menu_id, MoveRequest::before(move_id, before_id)).await
}

/// Place node `move_id` directly after `after_id`
pub async fn move_node_after(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
    move_id: NodeId,
    after_id: NodeId,
) -> DomainResult<MenuNode> {
    move_node(state, ctx, menu_id, MoveRequest::after(move_id, after_id)).await
}

/// Renumber every sibling group of the menu to consecutive integers
pub async fn refresh_nodes(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
) -> DomainResult<RefreshSummary> {
    let conn = state.db.connection();
    let mut conn = conn.lock().await;

    let menu = require_menu(&conn, menu_id)?;
    let summary = state.engine.refresh(&mut *conn, menu_id)?;

    log::info!(
        "{}: {} ({} of {} nodes renumbered)",
        ctx.label(),
        menu.ordering_activity(),
        summary.rewritten,
        summary.examined
    );
    Ok(summary)
}

/// Create a node at the end of its sibling group
pub async fn create_node(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
    name: String,
    url: Option<String>,
    parent_id: Option<NodeId>,
) -> DomainResult<MenuNode> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("Node name is required".into()));
    }
    {
        let conn = state.db.connection();
        let conn = conn.lock().await;
        require_menu(&conn, menu_id)?;
    }

    let mut node = MenuNode::new(0, menu_id, name, 0.0);
    node.url = url;
    node.parent_id = parent_id;

    let repo = NodeRepository::with_config(state.db.connection(), state.config.ordering.clone());
    let created = repo.create(&node).await?;
    log::info!("{}: Created menu node {} in menu {}", ctx.label(), created.id, menu_id);
    Ok(created)
}

/// Nodes of a menu, depth first in sibling order
pub async fn list_nodes(state: &AppState, menu_id: MenuId) -> DomainResult<Vec<NodeEntry>> {
    let tree = load_tree(state, menu_id).await?;
    Ok(tree
        .flatten()
        .into_iter()
        .map(|(node, depth)| NodeEntry { node, depth })
        .collect())
}

/// Nested node tree of a menu
pub async fn node_tree(state: &AppState, menu_id: MenuId) -> DomainResult<Vec<TreeNode>> {
    Ok(load_tree(state, menu_id).await?.nested())
}

async fn load_tree(state: &AppState, menu_id: MenuId) -> DomainResult<MenuTree> {
    let conn = state.db.connection();
    let conn = conn.lock().await;
    require_menu(&conn, menu_id)?;
    let nodes = list_menu_nodes(&conn, menu_id)?;
    Ok(MenuTree::build(&nodes))
}

/// Delete a node and its descendants
pub async fn delete_node(
    state: &AppState,
    ctx: &RequestContext,
    menu_id: MenuId,
    node_id: NodeId,
) -> DomainResult<()> {
    let repo = NodeRepository::new(state.db.connection());
    match repo.find_by_id(node_id).await? {
        Some(node) if node.menu_id == menu_id => {}
        _ => {
            return Err(DomainError::NotFound(format!(
                "Node {} not found in menu {}",
                node_id, menu_id
            )))
        }
    }

    repo.delete(node_id).await?;
    log::info!("{}: Deleted menu node {} from menu {}", ctx.label(), node_id, menu_id);
    Ok(())
}
