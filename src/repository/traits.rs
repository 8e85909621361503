//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Entity, MenuId, MenuNode, NodeId};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Node access used by the ordering engine
///
/// Synchronous on purpose: every call happens inside one open transaction.
pub trait OrderedItemStore {
    /// Load a node, `DomainError::NotFound` if absent
    fn find(&self, id: NodeId) -> DomainResult<MenuNode>;

    /// Nodes of `menu_id` sharing `parent_id`, sorted by (order, id)
    fn siblings(&self, menu_id: MenuId, parent_id: Option<NodeId>) -> DomainResult<Vec<MenuNode>>;

    /// Every node of `menu_id`
    fn all(&self, menu_id: MenuId) -> DomainResult<Vec<MenuNode>>;

    /// Persist the node's `order`; other columns are left alone
    fn save(&mut self, node: &MenuNode) -> DomainResult<()>;
}

/// A store bound to one open transaction
///
/// Dropping it without `commit` discards every write.
pub trait StoreTransaction: OrderedItemStore {
    fn commit(self) -> DomainResult<()>;
}

/// A store able to open transactions
pub trait TransactionalStore {
    type Tx<'a>: StoreTransaction
    where
        Self: 'a;

    fn begin(&mut self) -> DomainResult<Self::Tx<'_>>;
}

/// Run `f` inside one transaction, committing only if it succeeds
pub fn in_transaction<'s, S, R, F>(store: &'s mut S, f: F) -> DomainResult<R>
where
    S: TransactionalStore + 's,
    F: FnOnce(&mut S::Tx<'s>) -> DomainResult<R>,
{
    let mut tx = store.begin()?;
    let result = f(&mut tx)?;
    tx.commit()?;
    Ok(result)
}
