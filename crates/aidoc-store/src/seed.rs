//! Demo directory written on first launch.

use aidoc_core::{Location, Provider, ProviderKind, Review, ReviewRating};

fn seed_review(id: &str, user_name: &str, stars: ReviewRating, comment: &str, date: &str) -> Review {
    Review {
        id: id.to_string(),
        user_name: user_name.to_string(),
        rating: stars,
        comment: comment.to_string(),
        date: date.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// One hospital and one pharmacy in San Francisco.
///
/// Ratings are the published figures, not recomputed from the sample
/// reviews; the first `add_review` brings them back in line.
pub fn initial_providers() -> Vec<Provider> {
    let five = ReviewRating::max();
    let four = ReviewRating::new(4).unwrap_or(five);

    vec![
        Provider {
            id: "h1".to_string(),
            kind: ProviderKind::Hospital,
            name: "City General Hospital".to_string(),
            phone: "+1-555-0123".to_string(),
            location: Location {
                lat: 37.7749,
                lng: -122.4194,
                address: Some("123 Health St, San Francisco".to_string()),
            },
            services: strings(&["Emergency", "Cardiology", "Pediatrics"]),
            email: Some("hospital@city.com".to_string()),
            password: Some("admin".to_string()),
            rating: 4.5,
            reviews: vec![
                seed_review("r1", "John Doe", five, "Excellent emergency care.", "2023-10-01"),
                seed_review("r2", "Jane Smith", four, "Wait time was a bit long.", "2023-09-15"),
            ],
            license_number: None,
        },
        Provider {
            id: "p1".to_string(),
            kind: ProviderKind::Pharmacy,
            name: "MediCare Plus Pharmacy".to_string(),
            phone: "+1-555-0987".to_string(),
            location: Location {
                lat: 37.7849,
                lng: -122.4094,
                address: Some("456 Wellness Blvd, San Francisco".to_string()),
            },
            services: strings(&["24/7", "Home Delivery"]),
            email: Some("pharmacy@medicare.com".to_string()),
            password: Some("admin".to_string()),
            rating: 4.8,
            reviews: vec![seed_review(
                "r3",
                "Alice Brown",
                five,
                "Always stocked up.",
                "2023-10-05",
            )],
            license_number: None,
        },
    ]
}
