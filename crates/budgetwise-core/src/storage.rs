use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use budgetwise_domain::BudgetCollection;

use crate::CoreError;

/// Key under which the budget collection snapshot is stored.
pub const COLLECTION_KEY: &str = "budgets";

/// Minimal keyed blob store the budget store writes through to.
pub trait KeyValueStore: Send + Sync {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), CoreError>;
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), CoreError> {
        (**self).save(key, blob)
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        (**self).load(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), CoreError> {
        (**self).save(key, blob)
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        (**self).load(key)
    }
}

/// In-process store, useful for tests and for callers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), CoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

/// Serializes the full collection graph, optional fields included.
pub fn encode_collection(collection: &BudgetCollection) -> Result<Vec<u8>, CoreError> {
    Ok(serde_json::to_vec(collection)?)
}

pub fn decode_collection(blob: &[u8]) -> Result<BudgetCollection, CoreError> {
    Ok(serde_json::from_slice(blob)?)
}
