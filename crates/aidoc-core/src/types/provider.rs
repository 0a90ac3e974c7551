//! Healthcare providers and their reviews

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::Location;

// =============================================================================
// Provider Kind
// =============================================================================

/// Category of a registered provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderKind {
    /// Hospital or clinic
    Hospital,
    /// Pharmacy
    Pharmacy,
    /// Individual doctor or specialist
    Doctor,
}

impl ProviderKind {
    /// Wire label (`HOSPITAL`, `PHARMACY`, `DOCTOR`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "HOSPITAL",
            Self::Pharmacy => "PHARMACY",
            Self::Doctor => "DOCTOR",
        }
    }

    /// Parse a wire label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HOSPITAL" => Some(Self::Hospital),
            "PHARMACY" => Some(Self::Pharmacy),
            "DOCTOR" => Some(Self::Doctor),
            _ => None,
        }
    }

    /// Human label used in dashboards
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Hospital => "Hospital / Clinic",
            Self::Pharmacy => "Pharmacy",
            Self::Doctor => "Doctor / Specialist",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Review
// =============================================================================

/// Integer star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReviewRating(u8);

impl ReviewRating {
    /// Lowest allowed rating
    pub const MIN: u8 = 1;
    /// Highest allowed rating
    pub const MAX: u8 = 5;

    /// Validate a star count
    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    /// Five stars
    pub const fn max() -> Self {
        Self(Self::MAX)
    }

    /// Star count
    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ReviewRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} outside 1..=5"))
    }
}

impl From<ReviewRating> for u8 {
    fn from(rating: ReviewRating) -> Self {
        rating.0
    }
}

/// A patient review attached to a provider. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Record id (submission timestamp)
    pub id: String,
    /// Reviewer display name
    pub user_name: String,
    /// Star rating
    pub rating: ReviewRating,
    /// Free-text comment
    pub comment: String,
    /// Locale date string of submission
    pub date: String,
}

// =============================================================================
// Provider
// =============================================================================

/// A hospital, pharmacy or doctor discoverable by patients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Record id
    pub id: String,
    /// Provider category
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    /// Facility or doctor name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Registered location
    pub location: Location,
    /// Offered services, e.g. "Cardiology", "24/7"
    #[serde(default)]
    pub services: Vec<String>,
    /// Login email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Plain-text login password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Mean of `reviews[].rating`, unrounded
    pub rating: f64,
    /// Reviews, newest first
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Medical license (doctors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl Provider {
    /// Exact email and password match.
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email.as_deref() == Some(email) && self.password.as_deref() == Some(password)
    }

    /// Prepend `review` and recompute the mean rating.
    pub fn push_review(&mut self, review: Review) {
        self.reviews.insert(0, review);
        self.rating = mean_rating(&self.reviews);
    }
}

/// Arithmetic mean of review ratings; `0.0` with no reviews.
pub fn mean_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating.stars())).sum();
    f64::from(total) / reviews.len() as f64
}

/// Editable provider fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfilePatch {
    /// New name
    pub name: Option<String>,
    /// New phone
    pub phone: Option<String>,
    /// New address (coordinates are kept)
    pub address: Option<String>,
    /// Replacement service list
    pub services: Option<Vec<String>>,
}

impl ProviderProfilePatch {
    /// Overlay this patch onto `provider`, returning the merged record.
    pub fn apply(&self, provider: &Provider) -> Provider {
        let mut merged = provider.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            merged.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            merged.location.address = Some(address.clone());
        }
        if let Some(services) = &self.services {
            merged.services = services.clone();
        }
        merged
    }
}
