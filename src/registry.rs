//! In-memory index of loaded entities keyed by id.
//!
//! Filled when a layer load reply arrives and pruned when a layer is removed
//! or a transaction removing entities commits. Event payloads carry bare ids
//! that are resolved here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::entity::Entity;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Arc<Mutex<HashMap<String, Arc<Entity>>>>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<Arc<Entity>> {
        self.lock().get(id).cloned()
    }

    /// Insert every entity, replacing any previous entry with the same id.
    pub fn insert_all<I>(&self, entities: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut map = self.lock();
        for entity in entities {
            map.insert(entity.id().to_owned(), Arc::new(entity));
        }
    }

    pub fn remove_all<'a, I>(&self, entities: I)
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        self.remove_ids(entities.into_iter().map(Entity::id));
    }

    pub fn remove_ids<'a, I>(&self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = self.lock();
        for id in ids {
            map.remove(id);
        }
    }

    /// Resolve `ids`, skipping any that are not loaded.
    #[must_use]
    pub fn resolve(&self, ids: &[String]) -> (Vec<Arc<Entity>>, Vec<String>) {
        let map = self.lock();
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match map.get(id) {
                Some(entity) => found.push(entity.clone()),
                None => missing.push(id.clone()),
            }
        }
        (found, missing)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Entity>>> {
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
