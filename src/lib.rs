//! FusionCMS Menus Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - ordering: Fractional node moves and order refresh
//! - repository: Data access abstractions and implementations
//! - commands: Handlers the HTTP layer calls into

use std::path::Path;

pub mod commands;
pub mod config;
pub mod context;
pub mod domain;
pub mod ordering;
pub mod repository;

pub use config::{EngineConfig, OrderingConfig};
pub use context::RequestContext;
pub use domain::{DomainError, DomainResult, Menu, MenuNode};
pub use ordering::OrderingEngine;

use repository::{init_db, DbState};

/// Application state shared across commands
pub struct AppState {
    pub db: DbState,
    pub config: EngineConfig,
    pub engine: OrderingEngine,
}

impl AppState {
    /// Open the database and run migrations
    pub async fn open(config: EngineConfig) -> DomainResult<Self> {
        config.ordering.validate()?;
        let db = init_db(&config.database_path).await?;
        let engine = OrderingEngine::new(config.ordering.clone());
        Ok(Self { db, config, engine })
    }
}

/// Install the process-wide rolling file logger
pub fn init_logging(log_dir: impl AsRef<Path>) -> DomainResult<()> {
    rolling_logger::init_logger(log_dir, "FusionMenus").map_err(DomainError::Internal)
}
