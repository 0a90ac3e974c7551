//! Data access service behaviour against in-memory storage.

use std::sync::Arc;

use aidoc_core::{DiagnosisResult, NutritionResult, ProviderKind, UserProfilePatch};
use aidoc_store::{DataAccessService, RegisterOutcome, StoreError};
use aidoc_testkit::{review, MemoryStorageHandler, ProviderBuilder, UserBuilder};

async fn service() -> (Arc<MemoryStorageHandler>, DataAccessService) {
    let storage = Arc::new(MemoryStorageHandler::new());
    let service = DataAccessService::open(storage.clone()).await.unwrap();
    (storage, service)
}

fn diagnosis(id: &str, user_id: Option<&str>) -> DiagnosisResult {
    DiagnosisResult {
        id: id.to_string(),
        user_id: user_id.map(str::to_string),
        date: "1/15/2024".to_string(),
        symptoms: "headache".to_string(),
        ai_analysis: "## Possible Condition\nTension headache".to_string(),
        image: None,
    }
}

// ===== Registration and login =====

#[tokio::test]
async fn duplicate_registration_keeps_single_entry() {
    let (storage, service) = service().await;
    let first = UserBuilder::new("1").email("ada@example.com").build();
    let second = UserBuilder::new("2").email("ada@example.com").build();

    assert_eq!(
        service.register_user(first).await.unwrap(),
        RegisterOutcome::Registered
    );
    assert_eq!(
        service.register_user(second).await.unwrap(),
        RegisterOutcome::Duplicate
    );

    let raw = storage.raw_string("ai_doctor_users").await.unwrap();
    let users: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], "1");
}

#[tokio::test]
async fn registration_signs_the_user_in() {
    let (_storage, service) = service().await;
    let user = UserBuilder::new("7").build();
    service.register_user(user.clone()).await.unwrap();
    assert_eq!(service.current_user().await.unwrap(), Some(user));
}

#[tokio::test]
async fn login_requires_exact_match_and_is_ambiguous_on_failure() {
    let (_storage, service) = service().await;
    let user = UserBuilder::new("1")
        .email("ada@example.com")
        .password("pw")
        .build();
    service.register_user(user.clone()).await.unwrap();
    service.logout_user().await.unwrap();

    assert_eq!(service.login_user("ada@example.com", "PW").await.unwrap(), None);
    assert_eq!(service.login_user("nobody@example.com", "pw").await.unwrap(), None);
    assert_eq!(service.current_user().await.unwrap(), None);

    let logged_in = service.login_user("ada@example.com", "pw").await.unwrap();
    assert_eq!(logged_in, Some(user.clone()));
    assert_eq!(service.current_user().await.unwrap(), Some(user));
}

#[tokio::test]
async fn logout_is_unconditional() {
    let (_storage, service) = service().await;
    service.logout_user().await.unwrap();
    service.logout_provider().await.unwrap();
    assert_eq!(service.current_user().await.unwrap(), None);
    assert_eq!(service.current_provider().await.unwrap(), None);
}

// ===== Session refresh =====

#[tokio::test]
async fn updating_session_user_refreshes_snapshot() {
    let (_storage, service) = service().await;
    let user = UserBuilder::new("1").build();
    service.register_user(user.clone()).await.unwrap();

    let patch = UserProfilePatch {
        name: Some("Renamed".to_string()),
        age: Some("34".to_string()),
        ..UserProfilePatch::default()
    };
    service.update_user(patch.apply(&user)).await.unwrap();

    let current = service.current_user().await.unwrap().unwrap();
    assert_eq!(current.name, "Renamed");
    assert_eq!(current.age.as_deref(), Some("34"));
}

#[tokio::test]
async fn updating_other_user_leaves_session_alone() {
    let (_storage, service) = service().await;
    let alice = UserBuilder::new("a").build();
    let bob = UserBuilder::new("b").build();
    service.register_user(bob.clone()).await.unwrap();
    service.register_user(alice.clone()).await.unwrap();

    let renamed = UserBuilder::new("b").name("Robert").build();
    service.update_user(renamed).await.unwrap();
    assert_eq!(service.current_user().await.unwrap(), Some(alice));
}

#[tokio::test]
async fn update_of_unknown_id_is_silent() {
    let (storage, service) = service().await;
    let writes = storage.write_count();
    service
        .update_user(UserBuilder::new("ghost").build())
        .await
        .unwrap();
    service
        .update_provider(ProviderBuilder::new("ghost", ProviderKind::Doctor).build())
        .await
        .unwrap();
    assert_eq!(storage.write_count(), writes);
}

#[tokio::test]
async fn provider_update_refreshes_provider_session() {
    let (_storage, service) = service().await;
    let provider = service
        .login_provider("hospital@city.com", "admin")
        .await
        .unwrap()
        .unwrap();

    let mut edited = provider.clone();
    edited.phone = "+1-555-9999".to_string();
    service.update_provider(edited).await.unwrap();

    let session = service.current_provider().await.unwrap().unwrap();
    assert_eq!(session.phone, "+1-555-9999");
    assert_eq!(
        service.get_provider("h1").await.unwrap().unwrap().phone,
        "+1-555-9999"
    );
}

// ===== Providers and reviews =====

#[tokio::test]
async fn seeded_directory_and_kind_filter() {
    let (_storage, service) = service().await;
    let all = service.get_providers(None).await.unwrap();
    assert_eq!(
        all.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["h1", "p1"]
    );

    let pharmacies = service
        .get_providers(Some(ProviderKind::Pharmacy))
        .await
        .unwrap();
    assert_eq!(pharmacies.len(), 1);
    assert_eq!(pharmacies[0].name, "MediCare Plus Pharmacy");
    assert!(service
        .get_providers(Some(ProviderKind::Doctor))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn add_provider_appends_in_order() {
    let (_storage, service) = service().await;
    service
        .add_provider(ProviderBuilder::new("d1", ProviderKind::Doctor).build())
        .await
        .unwrap();
    let ids: Vec<String> = service
        .get_providers(None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["h1", "p1", "d1"]);
}

#[tokio::test]
async fn add_review_prepends_and_recomputes_unrounded_mean() {
    let (_storage, service) = service().await;
    // h1 seeds with ratings 5 and 4
    let updated = service
        .add_review("h1", review("r9", 4))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.reviews[0].id, "r9");
    assert_eq!(updated.reviews.len(), 3);
    assert_eq!(updated.rating, 13.0 / 3.0);

    let stored = service.get_provider("h1").await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn add_review_for_unknown_provider_is_noop() {
    let (_storage, service) = service().await;
    let before = service.get_providers(None).await.unwrap();
    assert_eq!(
        service.add_review("missing", review("r", 1)).await.unwrap(),
        None
    );
    assert_eq!(service.get_providers(None).await.unwrap(), before);
}

#[tokio::test]
async fn provider_login_uses_credentials() {
    let (_storage, service) = service().await;
    assert!(service
        .login_provider("hospital@city.com", "wrong")
        .await
        .unwrap()
        .is_none());
    let provider = service
        .login_provider("pharmacy@medicare.com", "admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(provider.id, "p1");
    assert_eq!(
        service.current_provider().await.unwrap().map(|p| p.id),
        Some("p1".to_string())
    );
}

// ===== History =====

#[tokio::test]
async fn diagnosis_history_filters_exact_owner_newest_first() {
    let (_storage, service) = service().await;
    service.save_diagnosis(diagnosis("1", Some("u1"))).await.unwrap();
    service.save_diagnosis(diagnosis("2", None)).await.unwrap();
    service.save_diagnosis(diagnosis("3", Some("u2"))).await.unwrap();
    service.save_diagnosis(diagnosis("4", Some("u1"))).await.unwrap();

    let ids: Vec<String> = service
        .diagnosis_history("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec!["4", "1"]);
    assert!(service.diagnosis_history("").await.unwrap().is_empty());
}

#[tokio::test]
async fn nutrition_history_is_newest_first() {
    let (_storage, service) = service().await;
    for id in ["1", "2"] {
        service
            .save_nutrition(NutritionResult {
                id: id.to_string(),
                date: "1/15/2024".to_string(),
                food_item: "Apple".to_string(),
                calories: "95".to_string(),
                macros: "{}".to_string(),
                recipe: String::new(),
            })
            .await
            .unwrap();
    }
    let ids: Vec<String> = service
        .nutrition_history()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec!["2", "1"]);
}

// ===== Failures =====

#[tokio::test]
async fn storage_failures_propagate() {
    let (storage, service) = service().await;
    storage.set_fail_writes(true);
    let err = service
        .register_user(UserBuilder::new("1").build())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Storage { key: "ai_doctor_users", .. }));
}

#[tokio::test]
async fn corrupt_collection_propagates() {
    let (storage, service) = service().await;
    storage.put_raw("ai_doctor_providers", "[{]").await;
    assert!(matches!(
        service.get_providers(None).await,
        Err(StoreError::Corrupt { .. })
    ));
}
