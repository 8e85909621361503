//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod memory;
mod menu_repo;
mod node;
mod traits;


pub use db::{init_db, DbState};
pub use memory::{MemoryStore, MemoryTransaction};
pub use menu_repo::MenuRepository;
pub use node::{NodeRepository, SqliteNodeStore};
pub use traits::{
    in_transaction, OrderedItemStore, Repository, StoreTransaction, TransactionalStore,
};

pub(crate) use menu_repo::require_menu;
pub(crate) use node::list_menu_nodes;
