//! Patient accounts

use serde::{Deserialize, Serialize};

/// Discriminator persisted with every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountType {
    /// Patient account
    #[default]
    #[serde(rename = "USER")]
    User,
}

/// A registered patient.
///
/// Passwords are stored and compared in plain text. This is a local demo
/// store, not an authentication system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Record id (registration timestamp)
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, unique across users
    pub email: String,
    /// Plain-text password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Free-form age
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    /// Free-form gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Home address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Profile photo as a base64 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Record discriminator
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl User {
    /// Create a user with only the required fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            password: Some(password.into()),
            age: None,
            gender: None,
            address: None,
            photo: None,
            account_type: AccountType::User,
        }
    }

    /// Exact email and password match.
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.as_deref() == Some(password)
    }
}

/// Editable profile fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatch {
    /// New display name
    pub name: Option<String>,
    /// New age
    pub age: Option<String>,
    /// New gender
    pub gender: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New photo data URL
    pub photo: Option<String>,
}

impl UserProfilePatch {
    /// Overlay this patch onto `user`, returning the merged record.
    pub fn apply(&self, user: &User) -> User {
        let mut merged = user.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(age) = &self.age {
            merged.age = Some(age.clone());
        }
        if let Some(gender) = &self.gender {
            merged.gender = Some(gender.clone());
        }
        if let Some(address) = &self.address {
            merged.address = Some(address.clone());
        }
        if let Some(photo) = &self.photo {
            merged.photo = Some(photo.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let user = User::new("1", "Ada", "ada@example.com", "pw");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["type"], "USER");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("photo").is_none());
    }

    #[test]
    fn credentials_require_both_fields() {
        let user = User::new("1", "Ada", "ada@example.com", "pw");
        assert!(user.matches_credentials("ada@example.com", "pw"));
        assert!(!user.matches_credentials("ada@example.com", "PW"));
        assert!(!user.matches_credentials("bob@example.com", "pw"));
    }

    #[test]
    fn patch_keeps_identity() {
        let user = User::new("1", "Ada", "ada@example.com", "pw");
        let patch = UserProfilePatch {
            name: Some("Ada L.".to_string()),
            address: Some("12 Analytical Way".to_string()),
            ..UserProfilePatch::default()
        };
        let merged = patch.apply(&user);
        assert_eq!(merged.id, "1");
        assert_eq!(merged.email, user.email);
        assert_eq!(merged.name, "Ada L.");
        assert_eq!(merged.address.as_deref(), Some("12 Analytical Way"));
    }
}
