//! Uncommitted writes of a running transaction

use std::collections::HashMap;

use super::key::ObjectKey;
use super::state::StateStore;

/// Stack of write layers over committed state
///
/// The bottom layer holds the writes of the whole transaction. Each nested
/// contract call pushes a savepoint layer that is folded into its parent on
/// success and dropped on failure.
pub struct WriteSet {
    layers: Vec<HashMap<ObjectKey, Vec<u8>>>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self {
            layers: vec![HashMap::new()],
        }
    }

    /// Open a savepoint
    pub fn begin(&mut self) {
        self.layers.push(HashMap::new());
    }

    /// Fold the newest savepoint into its parent
    pub fn release(&mut self) {
        if self.layers.len() > 1 {
            if let Some(top) = self.layers.pop() {
                if let Some(parent) = self.layers.last_mut() {
                    parent.extend(top);
                }
            }
        }
    }

    /// Drop the newest savepoint
    pub fn rollback(&mut self) {
        if self.layers.len() > 1 {
            self.layers.pop();
        } else if let Some(base) = self.layers.last_mut() {
            base.clear();
        }
    }

    pub fn get(&self, key: &ObjectKey, committed: &StateStore) -> Option<Vec<u8>> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(key).cloned())
            .or_else(|| committed.get(key))
    }

    pub fn put(&mut self, key: ObjectKey, value: Vec<u8>) {
        if let Some(top) = self.layers.last_mut() {
            top.insert(key, value);
        }
    }

    /// Flatten every layer into the change set to commit
    pub fn into_changes(mut self) -> HashMap<ObjectKey, Vec<u8>> {
        while self.layers.len() > 1 {
            self.release();
        }
        self.layers.pop().unwrap_or_default()
    }
}

impl Default for WriteSet {
    fn default() -> Self {
        Self::new()
    }
}
