//! Data access service
//!
//! CRUD and authentication over the persisted collections. Business outcomes
//! (duplicate email, bad credentials, unknown id) are ordinary return values;
//! only storage and decoding failures are errors.
//!
//! Every mutation is read-entire-collection, modify, write-entire-collection.
//! Two overlapping mutations of the same collection can lose one update.

use std::sync::Arc;

use aidoc_core::effects::StorageEffects;
use aidoc_core::{DiagnosisResult, NutritionResult, Provider, ProviderKind, Review, User};

use crate::adapter::{Collection, PersistentStore};
use crate::error::StoreResult;

/// Result of [`DataAccessService::register_user`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Stored and signed in
    Registered,
    /// Email already taken; nothing changed
    Duplicate,
}

impl RegisterOutcome {
    /// `true` for [`RegisterOutcome::Registered`]
    pub fn is_registered(self) -> bool {
        matches!(self, RegisterOutcome::Registered)
    }
}

/// High-level operations over the local store.
#[derive(Debug, Clone)]
pub struct DataAccessService {
    store: PersistentStore,
}

impl DataAccessService {
    /// Open the store behind `storage`, seeding it if needed.
    pub async fn open(storage: Arc<dyn StorageEffects>) -> StoreResult<Self> {
        Ok(Self {
            store: PersistentStore::open(storage).await?,
        })
    }

    /// Wrap an already initialised store
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Underlying adapter
    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    // ===== Providers =====

    /// All providers in insertion order, optionally only those of `kind`.
    pub async fn get_providers(&self, kind: Option<ProviderKind>) -> StoreResult<Vec<Provider>> {
        let providers: Vec<Provider> = self.store.read_collection(Collection::Providers).await?;
        Ok(match kind {
            Some(kind) => providers.into_iter().filter(|p| p.kind == kind).collect(),
            None => providers,
        })
    }

    /// Provider by id
    pub async fn get_provider(&self, id: &str) -> StoreResult<Option<Provider>> {
        let providers: Vec<Provider> = self.store.read_collection(Collection::Providers).await?;
        Ok(providers.into_iter().find(|p| p.id == id))
    }

    /// Append a newly registered provider.
    pub async fn add_provider(&self, provider: Provider) -> StoreResult<()> {
        let mut providers: Vec<Provider> =
            self.store.read_collection(Collection::Providers).await?;
        tracing::info!(provider_id = %provider.id, kind = %provider.kind, "provider registered");
        providers.push(provider);
        self.store
            .write_collection(Collection::Providers, &providers)
            .await
    }

    /// Replace the provider with the same id. Unknown ids are ignored.
    /// Refreshes the provider session when it holds the same id.
    pub async fn update_provider(&self, updated: Provider) -> StoreResult<()> {
        let mut providers: Vec<Provider> =
            self.store.read_collection(Collection::Providers).await?;
        let Some(slot) = providers.iter_mut().find(|p| p.id == updated.id) else {
            tracing::debug!(provider_id = %updated.id, "update for unknown provider ignored");
            return Ok(());
        };
        *slot = updated.clone();
        self.store
            .write_collection(Collection::Providers, &providers)
            .await?;
        self.refresh_provider_session(&updated).await
    }

    /// Prepend `review` to the provider's reviews and recompute its mean
    /// rating. Returns the updated provider, or `None` for an unknown id.
    pub async fn add_review(
        &self,
        provider_id: &str,
        review: Review,
    ) -> StoreResult<Option<Provider>> {
        let mut providers: Vec<Provider> =
            self.store.read_collection(Collection::Providers).await?;
        let Some(provider) = providers.iter_mut().find(|p| p.id == provider_id) else {
            tracing::debug!(provider_id, "review for unknown provider ignored");
            return Ok(None);
        };
        provider.push_review(review);
        let updated = provider.clone();

        self.store
            .write_collection(Collection::Providers, &providers)
            .await?;
        tracing::info!(
            provider_id,
            rating = updated.rating,
            reviews = updated.reviews.len(),
            "review added"
        );
        self.refresh_provider_session(&updated).await?;
        Ok(Some(updated))
    }

    /// Provider with exactly matching email and password; sets the session.
    pub async fn login_provider(&self, email: &str, password: &str) -> StoreResult<Option<Provider>> {
        let providers: Vec<Provider> = self.store.read_collection(Collection::Providers).await?;
        let Some(provider) = providers
            .into_iter()
            .find(|p| p.matches_credentials(email, password))
        else {
            tracing::info!("provider login rejected");
            return Ok(None);
        };
        self.store
            .write_session(Collection::CurrentProvider, &provider)
            .await?;
        tracing::info!(provider_id = %provider.id, "provider signed in");
        Ok(Some(provider))
    }

    /// Overwrite the provider session
    pub async fn set_current_provider(&self, provider: &Provider) -> StoreResult<()> {
        self.store
            .write_session(Collection::CurrentProvider, provider)
            .await
    }

    /// Provider session snapshot
    pub async fn current_provider(&self) -> StoreResult<Option<Provider>> {
        self.store.read_session(Collection::CurrentProvider).await
    }

    /// Clear the provider session
    pub async fn logout_provider(&self) -> StoreResult<()> {
        self.store.clear_session(Collection::CurrentProvider).await
    }

    async fn refresh_provider_session(&self, updated: &Provider) -> StoreResult<()> {
        if let Some(current) = self.current_provider().await? {
            if current.id == updated.id {
                self.set_current_provider(updated).await?;
            }
        }
        Ok(())
    }

    // ===== History =====

    /// Prepend a diagnosis to the shared history.
    pub async fn save_diagnosis(&self, record: DiagnosisResult) -> StoreResult<()> {
        let mut history: Vec<DiagnosisResult> = self
            .store
            .read_collection(Collection::DiagnosisHistory)
            .await?;
        history.insert(0, record);
        self.store
            .write_collection(Collection::DiagnosisHistory, &history)
            .await
    }

    /// Diagnoses owned by `user_id`, newest first. Unowned records never match.
    pub async fn diagnosis_history(&self, user_id: &str) -> StoreResult<Vec<DiagnosisResult>> {
        let history: Vec<DiagnosisResult> = self
            .store
            .read_collection(Collection::DiagnosisHistory)
            .await?;
        Ok(history.into_iter().filter(|d| d.belongs_to(user_id)).collect())
    }

    /// Prepend a nutrition analysis to the history.
    pub async fn save_nutrition(&self, record: NutritionResult) -> StoreResult<()> {
        let mut history: Vec<NutritionResult> = self
            .store
            .read_collection(Collection::NutritionHistory)
            .await?;
        history.insert(0, record);
        self.store
            .write_collection(Collection::NutritionHistory, &history)
            .await
    }

    /// All nutrition analyses, newest first
    pub async fn nutrition_history(&self) -> StoreResult<Vec<NutritionResult>> {
        self.store
            .read_collection(Collection::NutritionHistory)
            .await
    }

    // ===== Users =====

    /// Store a new user unless the email is taken; on success the user
    /// becomes the session user.
    pub async fn register_user(&self, user: User) -> StoreResult<RegisterOutcome> {
        let mut users: Vec<User> = self.store.read_collection(Collection::Users).await?;
        if users.iter().any(|u| u.email == user.email) {
            tracing::info!("registration rejected: email already registered");
            return Ok(RegisterOutcome::Duplicate);
        }
        users.push(user.clone());
        self.store.write_collection(Collection::Users, &users).await?;
        self.set_current_user(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(RegisterOutcome::Registered)
    }

    /// User with exactly matching email and password; sets the session.
    /// Unknown email and wrong password are indistinguishable.
    pub async fn login_user(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let users: Vec<User> = self.store.read_collection(Collection::Users).await?;
        let Some(user) = users
            .into_iter()
            .find(|u| u.matches_credentials(email, password))
        else {
            tracing::info!("user login rejected");
            return Ok(None);
        };
        self.set_current_user(&user).await?;
        tracing::info!(user_id = %user.id, "user signed in");
        Ok(Some(user))
    }

    /// Replace the user with the same id. Unknown ids are ignored.
    /// Refreshes the user session when it holds the same id.
    pub async fn update_user(&self, updated: User) -> StoreResult<()> {
        let mut users: Vec<User> = self.store.read_collection(Collection::Users).await?;
        let Some(slot) = users.iter_mut().find(|u| u.id == updated.id) else {
            tracing::debug!(user_id = %updated.id, "update for unknown user ignored");
            return Ok(());
        };
        *slot = updated.clone();
        self.store.write_collection(Collection::Users, &users).await?;

        if let Some(current) = self.current_user().await? {
            if current.id == updated.id {
                self.set_current_user(&updated).await?;
            }
        }
        Ok(())
    }

    /// Overwrite the user session
    pub async fn set_current_user(&self, user: &User) -> StoreResult<()> {
        self.store.write_session(Collection::CurrentUser, user).await
    }

    /// User session snapshot
    pub async fn current_user(&self) -> StoreResult<Option<User>> {
        self.store.read_session(Collection::CurrentUser).await
    }

    /// Clear the user session
    pub async fn logout_user(&self) -> StoreResult<()> {
        self.store.clear_session(Collection::CurrentUser).await
    }

    // ===== Settings =====

    /// Stored inference credential override
    pub async fn stored_api_key(&self) -> StoreResult<Option<String>> {
        self.store.stored_api_key().await
    }

    /// Set or clear the inference credential override
    pub async fn set_stored_api_key(&self, key: Option<&str>) -> StoreResult<()> {
        self.store.set_stored_api_key(key).await
    }
}
