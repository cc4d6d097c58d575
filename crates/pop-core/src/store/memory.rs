//! In-memory store for tests and ephemeral runs.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use super::{KvStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.data.write().remove(key);
        Ok(())
    }

    fn get_all(&self) -> Result<HashMap<String, Value>, StoreError> {
        Ok(self.data.read().clone())
    }
}
