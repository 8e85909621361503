//! Menu Node Repository Module
//!
//! - node_repo: Core CRUD operations
//! - node_positioning: Append position for new nodes
//! - node_store: Transactional store used by the ordering engine

mod node_positioning;
mod node_repo;
mod node_store;

pub use node_repo::NodeRepository;
pub use node_store::SqliteNodeStore;

pub(crate) use node_repo::list_menu_nodes;
