//! Patient and provider sign-up.

use aidoc_core::{Location, Provider, ProviderKind, User};
use aidoc_store::RegisterOutcome;
use serde::{Deserialize, Serialize};

use super::{now, SharedApp};
use crate::core::Screen;
use crate::errors::AppError;
use crate::views::notice::Notice;

/// Shown when a required patient field is blank
pub const MISSING_FIELDS: &str = "Please fill in all required fields.";

/// Shown when the email is already registered
pub const DUPLICATE_EMAIL: &str = "Email already registered. Please login.";

/// Shown after a provider registers
pub const PROVIDER_REGISTERED: &str = "Registration Successful! Please Login.";

/// Latitude used when the form value is missing or unparsable
pub const FALLBACK_LAT: f64 = 37.77;

/// Longitude used when the form value is missing or unparsable
pub const FALLBACK_LNG: f64 = -122.41;

// ===== Patients =====

/// Patient sign-up form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistration {
    /// Display name (required)
    pub name: String,
    /// Login email (required)
    pub email: String,
    /// Password (required)
    pub password: String,
    /// Free-form age
    pub age: String,
    /// Free-form gender
    pub gender: String,
}

impl UserRegistration {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::input(MISSING_FIELDS));
        }
        Ok(())
    }

    /// Build the user record stored for this form
    pub fn into_user(self, id: String) -> User {
        let mut user = User::new(id, self.name, self.email, self.password);
        user.age = non_empty(self.age);
        user.gender = non_empty(self.gender);
        user
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Register a patient, sign them in and return home.
pub async fn register_user(
    app_core: &SharedApp,
    form: UserRegistration,
) -> Result<User, AppError> {
    form.validate()?;
    let id = now(app_core).await?.id_string();
    let user = form.into_user(id);

    let data = app_core.read().await.data().clone();
    match data.register_user(user.clone()).await? {
        RegisterOutcome::Duplicate => Err(AppError::input(DUPLICATE_EMAIL)),
        RegisterOutcome::Registered => {
            let mut core = app_core.write().await;
            core.set_user(Some(user.clone()));
            core.set_screen(Screen::Home);
            Ok(user)
        }
    }
}

// ===== Providers =====

/// Provider sign-up form. Coordinates and services are raw text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRegistration {
    /// Provider category
    pub kind: ProviderKind,
    /// Facility or doctor name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Street address
    pub address: String,
    /// Latitude as typed
    pub lat: String,
    /// Longitude as typed
    pub lng: String,
    /// Comma-separated services
    pub services: String,
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Medical licence, kept for doctors only
    pub license_number: String,
}

impl Default for ProviderRegistration {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Hospital,
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            lat: String::new(),
            lng: String::new(),
            services: String::new(),
            email: String::new(),
            password: String::new(),
            license_number: String::new(),
        }
    }
}

impl ProviderRegistration {
    /// Build a new provider: zero rating, no reviews.
    pub fn into_provider(self, id: String) -> Provider {
        let license_number = (self.kind == ProviderKind::Doctor).then_some(self.license_number);
        Provider {
            id,
            kind: self.kind,
            name: self.name,
            phone: self.phone,
            location: Location {
                lat: parse_coordinate(&self.lat, FALLBACK_LAT),
                lng: parse_coordinate(&self.lng, FALLBACK_LNG),
                address: Some(self.address),
            },
            services: split_services(&self.services),
            email: Some(self.email),
            password: Some(self.password),
            rating: 0.0,
            reviews: Vec::new(),
            license_number,
        }
    }
}

/// Parse a typed coordinate; blank, unparsable, non-finite or zero values
/// fall back.
pub fn parse_coordinate(raw: &str, fallback: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => fallback,
    }
}

/// Split on commas and trim; empty entries are dropped.
pub fn split_services(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Register a provider. The provider is not signed in.
pub async fn register_provider(
    app_core: &SharedApp,
    form: ProviderRegistration,
) -> Result<Provider, AppError> {
    let id = now(app_core).await?.id_string();
    let provider = form.into_provider(id);

    let data = app_core.read().await.data().clone();
    data.add_provider(provider.clone()).await?;

    app_core
        .write()
        .await
        .push_notice(Notice::success(PROVIDER_REGISTERED));
    Ok(provider)
}
