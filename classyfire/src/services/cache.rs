//! Classification cache
//!
//! Read-through, write-through cache of classifications keyed by identifier.
//! An in-process map sits in front of an optional persistent [`CacheStore`]:
//! once a value is put it stays cached for the life of the process even if
//! the store write fails. Entries never expire.

use crate::error::{ClassyFireError, Result};
use crate::models::{Classification, Identifier};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Persistent key-value store behind the cache
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Point lookup
    async fn load(&self, identifier: &Identifier) -> Result<Option<Classification>>;

    /// Point upsert
    async fn save(&self, identifier: &Identifier, classification: &Classification) -> Result<()>;
}

/// Classification cache owned by one client
pub struct ClassificationCache {
    memory: RwLock<HashMap<Identifier, Classification>>,
    store: Option<Arc<dyn CacheStore>>,
}

impl ClassificationCache {
    /// Cache persisted through `store`
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store: Some(store),
        }
    }

    /// Process-local cache with no persistence
    pub fn ephemeral() -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Look up a cached classification; never touches the network
    ///
    /// A store read failure is logged and treated as a miss.
    pub async fn get(&self, identifier: &Identifier) -> Option<Classification> {
        if let Some(hit) = self.memory.read().await.get(identifier) {
            return Some(hit.clone());
        }

        let store = self.store.as_ref()?;
        match store.load(identifier).await {
            Ok(Some(classification)) => {
                debug!(identifier = %identifier, "Loaded classification from cache store");
                self.memory
                    .write()
                    .await
                    .insert(identifier.clone(), classification.clone());
                Some(classification)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(identifier = %identifier, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Whether entries outlive the process
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    pub async fn contains(&self, identifier: &Identifier) -> bool {
        self.get(identifier).await.is_some()
    }

    /// Insert or replace an entry, persisting it immediately
    ///
    /// # Errors
    /// `CachePersistence` when the store write fails. The entry is cached in
    /// memory regardless; callers should log and continue.
    pub async fn put(&self, identifier: &Identifier, classification: &Classification) -> Result<()> {
        self.memory
            .write()
            .await
            .insert(identifier.clone(), classification.clone());

        let Some(store) = &self.store else {
            return Ok(());
        };

        store
            .save(identifier, classification)
            .await
            .map_err(|e| ClassyFireError::CachePersistence {
                identifier: identifier.to_string(),
                message: e.to_string(),
            })
    }

    /// Number of entries held in memory
    pub async fn memory_len(&self) -> usize {
        self.memory.read().await.len()
    }
}
