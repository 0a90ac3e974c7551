//! Record builders
//!
//! Fluent constructors for users, providers and reviews with sensible
//! defaults, so tests only spell out the fields they care about.

use aidoc_core::types::ProviderKind;
use aidoc_core::{Location, Provider, Review, ReviewRating, User};

/// Review with the given star count. Panics outside `1..=5`.
pub fn review(id: &str, stars: u8) -> Review {
    Review {
        id: id.to_string(),
        user_name: "Test Reviewer".to_string(),
        rating: ReviewRating::new(stars).expect("stars in 1..=5"),
        comment: format!("{stars} stars"),
        date: "1/15/2024".to_string(),
    }
}

/// Builder for [`User`]
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// User `id` with derived name/email and password `secret`
    pub fn new(id: &str) -> Self {
        Self {
            user: User::new(id, format!("User {id}"), format!("{id}@example.com"), "secret"),
        }
    }

    /// Set the display name
    pub fn name(mut self, name: &str) -> Self {
        self.user.name = name.to_string();
        self
    }

    /// Set the login email
    pub fn email(mut self, email: &str) -> Self {
        self.user.email = email.to_string();
        self
    }

    /// Set the password
    pub fn password(mut self, password: &str) -> Self {
        self.user.password = Some(password.to_string());
        self
    }

    /// Set the address
    pub fn address(mut self, address: &str) -> Self {
        self.user.address = Some(address.to_string());
        self
    }

    /// Finish
    pub fn build(self) -> User {
        self.user
    }
}

/// Builder for [`Provider`]
#[derive(Debug, Clone)]
pub struct ProviderBuilder {
    provider: Provider,
}

impl ProviderBuilder {
    /// Provider `id` of `kind` in downtown San Francisco, no reviews
    pub fn new(id: &str, kind: ProviderKind) -> Self {
        Self {
            provider: Provider {
                id: id.to_string(),
                kind,
                name: format!("Provider {id}"),
                phone: "+1-555-0100".to_string(),
                location: Location {
                    lat: 37.7749,
                    lng: -122.4194,
                    address: Some("1 Market St, San Francisco".to_string()),
                },
                services: vec!["General".to_string()],
                email: Some(format!("{id}@provider.test")),
                password: Some("admin".to_string()),
                rating: 0.0,
                reviews: Vec::new(),
                license_number: None,
            },
        }
    }

    /// Set the name
    pub fn name(mut self, name: &str) -> Self {
        self.provider.name = name.to_string();
        self
    }

    /// Set coordinates
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.provider.location.lat = lat;
        self.provider.location.lng = lng;
        self
    }

    /// Set login credentials
    pub fn credentials(mut self, email: &str, password: &str) -> Self {
        self.provider.email = Some(email.to_string());
        self.provider.password = Some(password.to_string());
        self
    }

    /// Attach reviews (given newest first) and set the matching mean rating
    pub fn reviews(mut self, reviews: Vec<Review>) -> Self {
        self.provider.rating = aidoc_core::types::mean_rating(&reviews);
        self.provider.reviews = reviews;
        self
    }

    /// Set the license number
    pub fn license(mut self, license: &str) -> Self {
        self.provider.license_number = Some(license.to_string());
        self
    }

    /// Finish
    pub fn build(self) -> Provider {
        self.provider
    }
}
