//! Persistent store adapter
//!
//! Maps the six logical collections onto fixed keys of a [`StorageEffects`]
//! namespace and handles JSON encoding. Every write replaces the whole value
//! under its key; there is no partial update, lock or transaction.

use std::sync::Arc;

use aidoc_core::effects::{ApiKeySource, StorageEffects};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::seed::initial_providers;

/// The persisted collections and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `Provider[]`
    Providers,
    /// `DiagnosisResult[]`, newest first
    DiagnosisHistory,
    /// `NutritionResult[]`, newest first
    NutritionHistory,
    /// `User[]`
    Users,
    /// `User` session snapshot
    CurrentUser,
    /// `Provider` session snapshot
    CurrentProvider,
}

impl Collection {
    /// All collections, in seeding order
    pub const ALL: [Collection; 6] = [
        Collection::Providers,
        Collection::DiagnosisHistory,
        Collection::NutritionHistory,
        Collection::Users,
        Collection::CurrentUser,
        Collection::CurrentProvider,
    ];

    /// Storage key
    pub const fn key(self) -> &'static str {
        match self {
            Collection::Providers => "ai_doctor_providers",
            Collection::DiagnosisHistory => "ai_doctor_diagnosis_history",
            Collection::NutritionHistory => "ai_doctor_nutrition_history",
            Collection::Users => "ai_doctor_users",
            Collection::CurrentUser => "ai_doctor_current_user",
            Collection::CurrentProvider => "ai_doctor_current_provider",
        }
    }

    /// Whether this key holds a single session value rather than an array
    pub const fn is_session(self) -> bool {
        matches!(self, Collection::CurrentUser | Collection::CurrentProvider)
    }
}

/// Key of the locally stored inference credential override. Stored as raw
/// text, not JSON.
pub const API_KEY_OVERRIDE: &str = "GEMINI_API_KEY";

/// Typed access to the key-value namespace.
#[derive(Clone)]
pub struct PersistentStore {
    storage: Arc<dyn StorageEffects>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Wrap a storage handler without touching it
    pub fn new(storage: Arc<dyn StorageEffects>) -> Self {
        Self { storage }
    }

    /// Wrap `storage` and seed any missing array collection.
    pub async fn open(storage: Arc<dyn StorageEffects>) -> StoreResult<Self> {
        let store = Self::new(storage);
        store.init().await?;
        Ok(store)
    }

    /// Seed missing array collections: providers with the demo directory,
    /// the others with `[]`. Existing values, including corrupt ones, are
    /// left alone. Sessions are never seeded.
    pub async fn init(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            if collection.is_session() || self.exists(collection).await? {
                continue;
            }
            match collection {
                Collection::Providers => {
                    self.write_collection(collection, &initial_providers())
                        .await?;
                }
                _ => {
                    self.write_collection::<serde_json::Value>(collection, &[])
                        .await?;
                }
            }
            tracing::debug!(key = collection.key(), "seeded collection");
        }
        Ok(())
    }

    async fn exists(&self, collection: Collection) -> StoreResult<bool> {
        let key = collection.key();
        self.storage
            .exists(key)
            .await
            .map_err(|source| StoreError::Storage { key, source })
    }

    async fn read_bytes(&self, key: &'static str) -> StoreResult<Option<Vec<u8>>> {
        self.storage
            .retrieve(key)
            .await
            .map_err(|source| StoreError::Storage { key, source })
    }

    async fn write_bytes(&self, key: &'static str, bytes: Vec<u8>) -> StoreResult<()> {
        self.storage
            .store(key, bytes)
            .await
            .map_err(|source| StoreError::Storage { key, source })
    }

    /// Read an array collection. An absent key reads as empty.
    pub async fn read_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StoreResult<Vec<T>> {
        let key = collection.key();
        match self.read_bytes(key).await? {
            Some(bytes) => decode(key, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Replace an array collection wholesale.
    pub async fn write_collection<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> StoreResult<()> {
        let key = collection.key();
        let bytes = encode(key, &items)?;
        self.write_bytes(key, bytes).await?;
        tracing::trace!(key, len = items.len(), "collection written");
        Ok(())
    }

    /// Read a session snapshot.
    pub async fn read_session<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> StoreResult<Option<T>> {
        let key = collection.key();
        match self.read_bytes(key).await? {
            Some(bytes) => decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite a session snapshot.
    pub async fn write_session<T: Serialize>(
        &self,
        collection: Collection,
        value: &T,
    ) -> StoreResult<()> {
        let key = collection.key();
        let bytes = encode(key, value)?;
        self.write_bytes(key, bytes).await
    }

    /// Remove a session snapshot. Absent is fine.
    pub async fn clear_session(&self, collection: Collection) -> StoreResult<()> {
        let key = collection.key();
        self.storage
            .remove(key)
            .await
            .map(|_| ())
            .map_err(|source| StoreError::Storage { key, source })
    }

    /// Stored inference credential override, if set and non-empty.
    pub async fn stored_api_key(&self) -> StoreResult<Option<String>> {
        let bytes = self.read_bytes(API_KEY_OVERRIDE).await?;
        Ok(bytes
            .map(|b| String::from_utf8_lossy(&b).trim().to_string())
            .filter(|k| !k.is_empty()))
    }

    /// Store (or with `None`, remove) the inference credential override.
    pub async fn set_stored_api_key(&self, key: Option<&str>) -> StoreResult<()> {
        match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(value) => {
                self.write_bytes(API_KEY_OVERRIDE, value.as_bytes().to_vec())
                    .await?;
                tracing::info!("stored inference credential override");
            }
            None => {
                self.storage
                    .remove(API_KEY_OVERRIDE)
                    .await
                    .map_err(|source| StoreError::Storage {
                        key: API_KEY_OVERRIDE,
                        source,
                    })?;
                tracing::info!("cleared inference credential override");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ApiKeySource for PersistentStore {
    async fn api_key(&self) -> Option<String> {
        match self.stored_api_key().await {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored inference credential");
                None
            }
        }
    }
}

fn decode<T: DeserializeOwned>(key: &'static str, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        key,
        reason: e.to_string(),
    })
}

fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StoreError::Encode {
        key,
        reason: e.to_string(),
    })
}
