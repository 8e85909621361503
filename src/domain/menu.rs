//! Menu Entity
//!
//! A named collection of menu nodes.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

pub type MenuId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
    /// Unique machine name
    pub handle: String,
    pub description: Option<String>,
}

impl Menu {
    pub fn new(id: MenuId, name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            handle: handle.into(),
            description: None,
        }
    }

    /// Lowercase singular form of the name, as used in activity lines
    ///
    /// "Headers" -> "header", "Categories" -> "category".
    pub fn singular_label(&self) -> String {
        let name = self.name.trim().to_lowercase();
        if let Some(stem) = name.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{}y", stem);
            }
        }
        if name.ends_with("ss") || name.ends_with("us") {
            return name;
        }
        match name.strip_suffix('s') {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }

    /// Activity line logged after node ordering changes
    pub fn ordering_activity(&self) -> String {
        format!("Updated {} menu node ordering", self.singular_label())
    }
}

impl Entity for Menu {
    type Id = MenuId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_label() {
        assert_eq!(Menu::new(1, "Headers", "headers").singular_label(), "header");
        assert_eq!(Menu::new(1, "Categories", "cats").singular_label(), "category");
        assert_eq!(Menu::new(1, "Footer", "footer").singular_label(), "footer");
        assert_eq!(Menu::new(1, "Address", "address").singular_label(), "address");
    }

    #[test]
    fn test_ordering_activity() {
        let menu = Menu::new(1, "Header", "header");
        assert_eq!(menu.ordering_activity(), "Updated header menu node ordering");
    }
}
