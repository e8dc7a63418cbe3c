//! Committed contract state

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::key::ObjectKey;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("key encoding error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Committed objects of every contract
///
/// Reads are served from memory. When a sled tree is attached, commits are
/// written to it as one atomic batch before memory is updated.
pub struct StateStore {
    objects: RwLock<HashMap<ObjectKey, Vec<u8>>>,
    db: Option<sled::Tree>,
}

impl StateStore {
    /// Create a new in-memory store
    pub fn new_memory() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            db: None,
        }
    }

    /// Create a store backed by a sled tree, loading what it holds
    pub fn new_persistent(db: sled::Tree) -> Result<Self, StorageError> {
        let mut objects = HashMap::new();
        for item in db.iter() {
            let (key, value) = item?;
            match ObjectKey::decode(&key) {
                Ok(key) => {
                    objects.insert(key, value.to_vec());
                }
                Err(e) => warn!("Skipping undecodable state key: {}", e),
            }
        }
        debug!("Loaded {} objects from disk", objects.len());

        Ok(Self {
            objects: RwLock::new(objects),
            db: Some(db),
        })
    }

    pub fn get(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        self.objects.read().get(key).cloned()
    }

    /// Number of committed objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Apply the writes of one transaction, all or nothing
    pub fn commit(&self, changes: HashMap<ObjectKey, Vec<u8>>) -> Result<(), StorageError> {
        if changes.is_empty() {
            return Ok(());
        }

        if let Some(ref db) = self.db {
            let mut batch = sled::Batch::default();
            for (key, value) in &changes {
                batch.insert(key.encode()?, value.as_slice());
            }
            db.apply_batch(batch)?;
            db.flush()?;
        }

        let mut objects = self.objects.write();
        debug!("Committing {} objects", changes.len());
        objects.extend(changes);
        Ok(())
    }
}
