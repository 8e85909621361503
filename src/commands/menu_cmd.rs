//! Menu Commands

use crate::context::RequestContext;
use crate::domain::{DomainError, DomainResult, Menu, MenuId};
use crate::repository::{MenuRepository, Repository};
use crate::AppState;

/// Create a new menu
pub async fn create_menu(
    state: &AppState,
    ctx: &RequestContext,
    name: String,
    handle: String,
    description: Option<String>,
) -> DomainResult<Menu> {
    if name.trim().is_empty() || handle.trim().is_empty() {
        return Err(DomainError::InvalidInput("Menu name and handle are required".into()));
    }

    let repo = MenuRepository::new(state.db.connection());
    let mut menu = Menu::new(0, name, handle);
    menu.description = description;

    let created = repo.create(&menu).await?;
    log::info!("{}: Created menu '{}' ({})", ctx.label(), created.name, created.id);
    Ok(created)
}

/// List all menus by name
pub async fn list_menus(state: &AppState) -> DomainResult<Vec<Menu>> {
    MenuRepository::new(state.db.connection()).list().await
}

pub async fn get_menu(state: &AppState, menu_id: MenuId) -> DomainResult<Menu> {
    MenuRepository::new(state.db.connection())
        .find_by_id(menu_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Menu {} not found", menu_id)))
}

/// Delete a menu and its nodes
pub async fn delete_menu(state: &AppState, ctx: &RequestContext, menu_id: MenuId) -> DomainResult<()> {
    let menu = get_menu(state, menu_id).await?;
    MenuRepository::new(state.db.connection()).delete(menu_id).await?;
    log::info!("{}: Deleted menu '{}' ({})", ctx.label(), menu.name, menu.id);
    Ok(())
}
