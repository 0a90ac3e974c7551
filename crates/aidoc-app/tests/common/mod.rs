#![allow(dead_code)]

use std::sync::Arc;

use aidoc_app::{AppCore, AppEffects, SharedApp};
use aidoc_core::effects::{InferenceEffects, StorageEffects, TimeEffects};
use aidoc_effects::AidocConfig;
use aidoc_testkit::TestEffects;
use tokio::sync::RwLock;

pub fn app_effects(effects: &TestEffects) -> AppEffects {
    let storage: Arc<dyn StorageEffects> = effects.storage.clone();
    let time: Arc<dyn TimeEffects> = effects.time.clone();
    let inference: Arc<dyn InferenceEffects> = effects.inference.clone();
    AppEffects {
        storage,
        time,
        inference: Some(inference),
    }
}

pub async fn boot(effects: &TestEffects) -> SharedApp {
    let core = AppCore::bootstrap(AidocConfig::default(), app_effects(effects))
        .await
        .unwrap();
    Arc::new(RwLock::new(core))
}
