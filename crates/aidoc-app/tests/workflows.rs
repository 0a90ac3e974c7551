//! End-to-end workflows against the deterministic effect handlers.

mod common;

use aidoc_app::workflows::registration::{
    ProviderRegistration, UserRegistration, DUPLICATE_EMAIL, MISSING_FIELDS, PROVIDER_REGISTERED,
};
use aidoc_app::workflows::{
    auth, diagnosis, diagnosis::DiagnosisRequest, emergency, nutrition, pharmacy, profile,
    registration, trip,
};
use aidoc_app::{AppError, ErrorCategory, NoticeLevel, Screen};
use aidoc_core::effects::InferenceError;
use aidoc_core::types::{ProviderProfilePatch, UserProfilePatch};
use aidoc_core::{MediaPart, ProviderKind};
use aidoc_testkit::time::settle;
use aidoc_store::DataAccessService;
use aidoc_testkit::{InferenceCall, ProviderBuilder, TestEffects, UserBuilder, TEST_EPOCH_MS};
use aidoc_trip::TripOutcome;

fn ada() -> UserRegistration {
    UserRegistration {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "pw".into(),
        age: "36".into(),
        gender: String::new(),
    }
}

// ===== Accounts =====

#[tokio::test]
async fn registration_signs_the_patient_in() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    app.write().await.navigate(Screen::UserRegister);

    let user = registration::register_user(&app, ada()).await.unwrap();

    assert_eq!(user.id, TEST_EPOCH_MS.to_string());
    assert_eq!(user.age.as_deref(), Some("36"));
    assert_eq!(user.gender, None);
    let core = app.read().await;
    assert_eq!(core.current_user(), Some(&user));
    assert_eq!(core.screen(), Screen::Home);
}

#[tokio::test]
async fn registration_rejects_missing_fields_and_duplicates() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let blank = UserRegistration {
        password: String::new(),
        ..ada()
    };
    let err = registration::register_user(&app, blank).await.unwrap_err();
    assert_eq!(err.to_string(), MISSING_FIELDS);
    assert!(app.read().await.current_user().is_none());

    registration::register_user(&app, ada()).await.unwrap();
    let err = registration::register_user(&app, ada()).await.unwrap_err();
    assert_eq!(err.to_string(), DUPLICATE_EMAIL);
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[tokio::test]
async fn failed_logins_keep_sessions_empty() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    registration::register_user(&app, ada()).await.unwrap();
    auth::logout(&app).await.unwrap();

    let err = auth::login_user(&app, "ada@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");

    let err = auth::login_provider(&app, "hospital@city.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid provider credentials.");

    let core = app.read().await;
    assert!(core.current_user().is_none());
    assert!(core.current_provider().is_none());
}

#[tokio::test]
async fn registered_provider_appears_in_listings() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let form = ProviderRegistration {
        kind: ProviderKind::Pharmacy,
        name: "Corner Drugs".into(),
        lat: "not a number".into(),
        lng: "-122.5".into(),
        services: "Delivery, ,24/7".into(),
        email: "corner@drugs.com".into(),
        password: "pw".into(),
        ..ProviderRegistration::default()
    };
    let provider = registration::register_provider(&app, form).await.unwrap();
    assert_eq!(provider.location.lat, registration::FALLBACK_LAT);
    assert_eq!(provider.location.lng, -122.5);
    assert_eq!(provider.services, vec!["Delivery", "24/7"]);

    let listed = pharmacy::pharmacies(&app).await.unwrap();
    assert_eq!(listed.last().map(|p| p.id.as_str()), Some(provider.id.as_str()));

    let mut core = app.write().await;
    assert!(core.current_provider().is_none());
    let notices = core.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, PROVIDER_REGISTERED);
}

// ===== Diagnosis =====

#[tokio::test]
async fn diagnosis_requires_input() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let err = diagnosis::diagnose(&app, DiagnosisRequest::symptoms("   "))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), diagnosis::NOTHING_TO_ANALYZE);
    assert!(effects.inference.calls().is_empty());
}

#[tokio::test]
async fn diagnosis_is_saved_for_the_signed_in_patient() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    let user = registration::register_user(&app, ada()).await.unwrap();
    effects.time.advance(5_000);

    let request = DiagnosisRequest::symptoms("sore throat")
        .with_media(MediaPart::new("image/png", vec![1, 2, 3]));
    let record = diagnosis::diagnose(&app, request).await.unwrap();

    assert_eq!(record.id, (TEST_EPOCH_MS + 5_000).to_string());
    assert_eq!(record.user_id.as_deref(), Some(user.id.as_str()));
    assert_eq!(record.image.as_deref(), Some("data:image/png;base64,AQID"));
    assert_eq!(
        effects.inference.calls(),
        vec![InferenceCall::Diagnose {
            media_type: Some("image/png".into()),
            symptom_text: "sore throat".into(),
        }]
    );

    let history = profile::user_history(&app).await.unwrap();
    assert_eq!(history, vec![record]);
}

#[tokio::test]
async fn failed_diagnosis_saves_nothing() {
    let effects = TestEffects::new();
    effects
        .inference
        .set_failure(Some(InferenceError::MissingCredential));
    let app = common::boot(&effects).await;
    registration::register_user(&app, ada()).await.unwrap();

    let err = diagnosis::diagnose(&app, DiagnosisRequest::symptoms("fever"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), diagnosis::ANALYSIS_FAILED);
    assert_eq!(err.category(), ErrorCategory::Config);
    assert!(profile::user_history(&app).await.unwrap().is_empty());
}

#[tokio::test]
async fn specialists_list_hospitals_before_doctors() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    let data = app.read().await.data().clone();
    data.add_provider(ProviderBuilder::new("d9", ProviderKind::Doctor).build())
        .await
        .unwrap();

    let kinds: Vec<_> = diagnosis::specialists(&app)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.kind)
        .collect();
    let first_doctor = kinds
        .iter()
        .position(|k| *k == ProviderKind::Doctor)
        .unwrap();
    assert!(kinds[..first_doctor]
        .iter()
        .all(|k| *k == ProviderKind::Hospital));
    assert!(kinds[first_doctor..]
        .iter()
        .all(|k| *k == ProviderKind::Doctor));
    assert!(emergency::hospitals(&app)
        .await
        .unwrap()
        .iter()
        .all(|p| p.kind == ProviderKind::Hospital));
}

// ===== Nutrition and pharmacy =====

#[tokio::test]
async fn nutrition_analysis_is_recorded() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let analysis = nutrition::analyze_food(&app, MediaPart::new("image/jpeg", vec![7]))
        .await
        .unwrap();
    assert_eq!(analysis.food_name, "Greek Salad");

    let history = nutrition::history(&app).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].food_item, "Greek Salad");
    assert_eq!(history[0].calories, "320 kcal");
    let macros: serde_json::Value = serde_json::from_str(&history[0].macros).unwrap();
    assert_eq!(macros["protein"], "9g");
    assert_eq!(macros["fats"], "26g");
}

#[tokio::test]
async fn nutrition_failure_uses_its_own_notice() {
    let effects = TestEffects::new();
    effects.inference.set_failure(Some(InferenceError::EmptyResponse));
    let app = common::boot(&effects).await;

    let err = nutrition::analyze_food(&app, MediaPart::new("image/jpeg", vec![7]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), nutrition::NUTRITION_FAILED);
    assert!(nutrition::history(&app).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_pharmacy_request_does_nothing() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    assert_eq!(pharmacy::recommend(&app, "").await.unwrap(), None);
    assert!(effects.inference.calls().is_empty());

    let text = pharmacy::recommend(&app, "headache").await.unwrap();
    assert!(text.unwrap().contains("Paracetamol"));

    effects.inference.set_failure(Some(InferenceError::EmptyResponse));
    let err = pharmacy::recommend(&app, "headache").await.unwrap_err();
    assert_eq!(err.to_string(), pharmacy::RECOMMENDATION_FAILED);
}

// ===== Profiles =====

#[tokio::test]
async fn profile_update_refreshes_the_session() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let err = profile::update_user_profile(&app, UserProfilePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    registration::register_user(&app, ada()).await.unwrap();
    let patch = UserProfilePatch {
        address: Some("1 Main St".into()),
        ..UserProfilePatch::default()
    };
    let updated = profile::update_user_profile(&app, patch).await.unwrap();
    assert_eq!(updated.address.as_deref(), Some("1 Main St"));
    assert_eq!(updated.name, "Ada");

    let data = app.read().await.data().clone();
    assert_eq!(data.current_user().await.unwrap(), Some(updated.clone()));
    let mut core = app.write().await;
    assert_eq!(core.current_user(), Some(&updated));
    assert_eq!(core.take_notices()[0].message, profile::PROFILE_UPDATED);
}

#[tokio::test]
async fn profile_update_for_unlisted_session_user_is_not_found() {
    let effects = TestEffects::new();
    let data = DataAccessService::open(effects.storage.clone()).await.unwrap();
    let ghost = UserBuilder::new("ghost").build();
    data.set_current_user(&ghost).await.unwrap();
    let app = common::boot(&effects).await;

    let patch = UserProfilePatch {
        address: Some("1 Main St".into()),
        ..UserProfilePatch::default()
    };
    let err = profile::update_user_profile(&app, patch).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert_eq!(data.current_user().await.unwrap(), Some(ghost.clone()));
    let mut core = app.write().await;
    assert_eq!(core.current_user(), Some(&ghost));
    assert!(core.take_notices().is_empty());
}

#[tokio::test]
async fn provider_update_for_unlisted_session_provider_is_not_found() {
    let effects = TestEffects::new();
    let data = DataAccessService::open(effects.storage.clone()).await.unwrap();
    let ghost = ProviderBuilder::new("ghost", ProviderKind::Doctor).build();
    data.set_current_provider(&ghost).await.unwrap();
    let app = common::boot(&effects).await;

    let patch = ProviderProfilePatch {
        phone: Some("555-0100".into()),
        ..ProviderProfilePatch::default()
    };
    let err = profile::update_provider_profile(&app, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert_eq!(data.current_provider().await.unwrap(), Some(ghost.clone()));
    let mut core = app.write().await;
    assert_eq!(core.current_provider(), Some(&ghost));
    assert!(core.take_notices().is_empty());
}

#[tokio::test]
async fn provider_dashboard_reflects_the_session() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    assert!(profile::provider_dashboard(&app).await.is_none());

    auth::login_provider(&app, "hospital@city.com", "admin")
        .await
        .unwrap();
    let dashboard = profile::provider_dashboard(&app).await.unwrap();
    assert_eq!(dashboard.summary.id, "h1");
    assert_eq!(dashboard.summary.kind, ProviderKind::Hospital);
}

// ===== Trip =====

#[tokio::test]
async fn trip_review_is_filed_and_shell_returns_home() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;
    registration::register_user(&app, ada()).await.unwrap();
    let before = app
        .read()
        .await
        .data()
        .get_provider("p1")
        .await
        .unwrap()
        .unwrap()
        .reviews
        .len();

    let controller = trip::start_trip_to(&app, "p1").await.unwrap();
    settle().await;
    effects.time.advance_and_settle(3_000).await;
    controller.skip().unwrap();
    controller.set_rating(4).unwrap();
    controller.set_comment("Quick ride").unwrap();

    let outcome = trip::submit_review(&app).await.unwrap();
    let TripOutcome::Submitted(review) = outcome else {
        panic!("expected a filed review");
    };
    assert_eq!(review.user_name, "Ada");
    assert_eq!(review.comment, "Quick ride");

    let stored = app
        .read()
        .await
        .data()
        .get_provider("p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.reviews.len(), before + 1);
    assert_eq!(stored.reviews.first(), Some(&review));

    let mut core = app.write().await;
    assert_eq!(core.screen(), Screen::Home);
    assert!(core.trip().is_none());
    let notices = core.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "Review Submitted! Thank you.");
}

#[tokio::test]
async fn guest_trip_review_asks_for_login() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let controller = trip::start_trip_to(&app, "h1").await.unwrap();
    settle().await;
    effects.time.advance_and_settle(3_000).await;
    controller.skip().unwrap();

    let outcome = trip::submit_review(&app).await.unwrap();
    assert_eq!(outcome, TripOutcome::LoginRequired);

    let mut core = app.write().await;
    assert_eq!(core.screen(), Screen::Home);
    let notices = core.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].message, "Please login to submit a review.");
}

#[tokio::test]
async fn unknown_trip_destination_is_not_found() {
    let effects = TestEffects::new();
    let app = common::boot(&effects).await;

    let err = trip::start_trip_to(&app, "nope").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(app.read().await.screen(), Screen::Home);
}
