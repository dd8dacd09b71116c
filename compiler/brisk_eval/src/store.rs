//! The variable store shared with a UI layer.
//!
//! Scripts and the UI thread both read and write named values here. Keys
//! are lowercased on every access; the `DashMap` locks a single shard per
//! operation, so a UI refresh never waits on an unrelated script write.

use std::sync::Arc;

use dashmap::DashMap;

use brisk_value::Value;

/// Shared handle to a [`VariableStore`].
pub type SharedVariableStore = Arc<VariableStore>;

/// Thread-safe, case-insensitive name → value map.
#[derive(Debug, Default)]
pub struct VariableStore {
    values: DashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedVariableStore {
        Arc::new(Self::new())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values
            .get(&name.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    /// Store `value`, returning the previous value if any.
    pub fn set(&self, name: &str, value: Value) -> Option<Value> {
        self.values.insert(name.to_lowercase(), value)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.values
            .remove(&name.to_lowercase())
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    /// Point-in-time copy of every entry, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests;
