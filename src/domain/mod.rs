//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde and thiserror).

mod entity;
mod menu;
mod node;

pub use entity::{DomainError, DomainResult, Entity};
pub use menu::{Menu, MenuId};
pub use node::{MenuNode, NodeId};
