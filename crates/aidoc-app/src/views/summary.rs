//! Provider listing and dashboard summaries

use aidoc_core::{Provider, ProviderKind};
use serde::Serialize;

/// Number of stars in a rating display
pub const MAX_STARS: u8 = 5;

/// Provider card shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    /// Provider id
    pub id: String,
    /// Display name
    pub name: String,
    /// Provider category
    pub kind: ProviderKind,
    /// Street address, if registered
    pub address: Option<String>,
    /// Rating with one decimal, e.g. `"4.5"`
    pub rating_label: String,
    /// Filled stars out of [`MAX_STARS`]
    pub filled_stars: u8,
    /// Number of reviews
    pub review_count: usize,
}

impl ProviderSummary {
    /// Summarize `provider`
    pub fn of(provider: &Provider) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            kind: provider.kind,
            address: provider.location.address.clone(),
            rating_label: rating_label(provider.rating),
            filled_stars: filled_stars(provider.rating),
            review_count: provider.reviews.len(),
        }
    }
}

/// Rating rounded half up to one decimal, judged on the exact stored value.
///
/// `87.0 / 20.0` is stored just below 4.35 and labels as `4.3`.
pub fn rating_label(rating: f64) -> String {
    let rating = if rating.is_finite() { rating.max(0.0) } else { 0.0 };
    // Decimal expansion far past the digits that decide the rounding.
    let exact = format!("{rating:.20}");
    let (whole, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let digit = |i: usize| {
        frac.as_bytes()
            .get(i)
            .map_or(0, |b| u64::from(b.saturating_sub(b'0')))
    };
    let whole: u64 = whole.parse().unwrap_or(0);
    let tenths = whole * 10 + digit(0) + u64::from(digit(1) >= 5);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// `round(rating)` clamped to the star range.
pub fn filled_stars(rating: f64) -> u8 {
    // Clamped to 0..=5 first, so the cast cannot truncate.
    rating.round().clamp(0.0, f64::from(MAX_STARS)) as u8
}

/// Provider dashboard: the signed-in provider and its stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDashboard {
    /// Full provider record
    pub provider: Provider,
    /// Human label for the provider category
    pub kind_label: &'static str,
    /// Rating and review stats
    pub summary: ProviderSummary,
}

impl ProviderDashboard {
    /// Build the dashboard for `provider`
    pub fn of(provider: Provider) -> Self {
        Self {
            kind_label: provider.kind.display_label(),
            summary: ProviderSummary::of(&provider),
            provider,
        }
    }
}
