//! In-Memory Node Store
//!
//! `OrderedItemStore` over a map, with staged transactions. Used by tests
//! and by embedders that keep menus in memory.

use std::collections::BTreeMap;

use crate::domain::{DomainError, DomainResult, MenuId, MenuNode, NodeId};
use crate::ordering::compare_siblings;

use super::traits::{OrderedItemStore, StoreTransaction, TransactionalStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: BTreeMap<NodeId, MenuNode>,
    saves: usize,
    commits: usize,
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node without counting it as a save
    pub fn insert(&mut self, node: MenuNode) {
        self.nodes.insert(node.id, node);
    }

    pub fn get(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(&id)
    }

    /// All nodes by ascending id
    pub fn nodes(&self) -> impl Iterator<Item = &MenuNode> {
        self.nodes.values()
    }

    /// Saves that reached the store (committed or direct)
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Make every save after the first `limit` ones fail with a storage error
    pub fn fail_saves_after(&mut self, limit: usize) {
        self.fail_after = Some(limit);
    }

    fn check_save(&self, done: usize) -> DomainResult<()> {
        match self.fail_after {
            Some(limit) if done >= limit => Err(DomainError::Storage(
                "simulated write failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn not_found(id: NodeId) -> DomainError {
        DomainError::NotFound(format!("Node {} not found", id))
    }
}

fn sorted(mut nodes: Vec<MenuNode>) -> Vec<MenuNode> {
    nodes.sort_by(compare_siblings);
    nodes
}

impl OrderedItemStore for MemoryStore {
    fn find(&self, id: NodeId) -> DomainResult<MenuNode> {
        self.nodes.get(&id).cloned().ok_or_else(|| Self::not_found(id))
    }

    fn siblings(&self, menu_id: MenuId, parent_id: Option<NodeId>) -> DomainResult<Vec<MenuNode>> {
        Ok(sorted(
            self.nodes
                .values()
                .filter(|n| n.menu_id == menu_id && n.parent_id == parent_id)
                .cloned()
                .collect(),
        ))
    }

    fn all(&self, menu_id: MenuId) -> DomainResult<Vec<MenuNode>> {
        Ok(self
            .nodes
            .values()
            .filter(|n| n.menu_id == menu_id)
            .cloned()
            .collect())
    }

    fn save(&mut self, node: &MenuNode) -> DomainResult<()> {
        self.check_save(self.saves)?;
        let stored = self
            .nodes
            .get_mut(&node.id)
            .ok_or_else(|| Self::not_found(node.id))?;
        stored.order = node.order;
        self.saves += 1;
        Ok(())
    }
}

/// Writes are staged and applied to the store on commit
pub struct MemoryTransaction<'a> {
    store: &'a mut MemoryStore,
    staged: BTreeMap<NodeId, MenuNode>,
    saves: usize,
}

impl MemoryTransaction<'_> {
    /// Nodes of `menu_id` as this transaction sees them
    fn view(&self, menu_id: MenuId) -> Vec<MenuNode> {
        self.store
            .nodes
            .values()
            .map(|n| self.staged.get(&n.id).unwrap_or(n))
            .filter(|n| n.menu_id == menu_id)
            .cloned()
            .collect()
    }
}

impl OrderedItemStore for MemoryTransaction<'_> {
    fn find(&self, id: NodeId) -> DomainResult<MenuNode> {
        self.staged
            .get(&id)
            .or_else(|| self.store.nodes.get(&id))
            .cloned()
            .ok_or_else(|| MemoryStore::not_found(id))
    }

    fn siblings(&self, menu_id: MenuId, parent_id: Option<NodeId>) -> DomainResult<Vec<MenuNode>> {
        let mut nodes = self.view(menu_id);
        nodes.retain(|n| n.parent_id == parent_id);
        Ok(sorted(nodes))
    }

    fn all(&self, menu_id: MenuId) -> DomainResult<Vec<MenuNode>> {
        Ok(self.view(menu_id))
    }

    fn save(&mut self, node: &MenuNode) -> DomainResult<()> {
        self.store.check_save(self.saves)?;
        let mut current = self.find(node.id)?;
        current.order = node.order;
        self.staged.insert(current.id, current);
        self.saves += 1;
        Ok(())
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn commit(self) -> DomainResult<()> {
        for (id, node) in self.staged {
            self.store.nodes.insert(id, node);
        }
        self.store.saves += self.saves;
        self.store.commits += 1;
        Ok(())
    }
}

impl TransactionalStore for MemoryStore {
    type Tx<'a> = MemoryTransaction<'a>;

    fn begin(&mut self) -> DomainResult<Self::Tx<'_>> {
        Ok(MemoryTransaction {
            store: self,
            staged: BTreeMap::new(),
            saves: 0,
        })
    }
}
