//! Screens and role-based navigation

use serde::{Deserialize, Serialize};

/// Every screen the shell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    /// Landing page
    Home,
    /// Symptom and media diagnosis
    Diagnosis,
    /// Medicine recommendations and pharmacy listing
    Pharmacy,
    /// Hospital listing
    Emergency,
    /// Meal analysis
    Nutrition,
    /// Provider sign-up form
    ProviderRegister,
    /// Provider sign-in
    ProviderLogin,
    /// Signed-in provider's dashboard
    ProviderDashboard,
    /// Patient sign-in
    UserLogin,
    /// Patient sign-up
    UserRegister,
    /// Patient profile and diagnosis history
    UserProfile,
    /// Trip simulation
    Trip,
}

impl Screen {
    /// Screens reachable without any session.
    pub const PUBLIC: [Screen; 5] = [
        Screen::Home,
        Screen::UserLogin,
        Screen::UserRegister,
        Screen::ProviderLogin,
        Screen::ProviderRegister,
    ];

    /// Whether the screen is reachable without a session
    pub fn is_public(self) -> bool {
        Self::PUBLIC.contains(&self)
    }
}

/// Which kind of session is active, for navigation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Nobody signed in
    Guest,
    /// Patient signed in
    User,
    /// Provider signed in (takes precedence over a patient)
    Provider,
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Target screen
    pub screen: Screen,
    /// Entry label
    pub label: &'static str,
}

const fn item(screen: Screen, label: &'static str) -> NavItem {
    NavItem { screen, label }
}

const PROVIDER_NAV: [NavItem; 2] = [
    item(Screen::ProviderDashboard, "Dashboard"),
    item(Screen::Emergency, "Live Map"),
];

const PATIENT_NAV: [NavItem; 4] = [
    item(Screen::Home, "Home"),
    item(Screen::Diagnosis, "Diagnosis"),
    item(Screen::Pharmacy, "Pharmacy"),
    item(Screen::Emergency, "Emergency"),
];

/// Sidebar entries for `role`.
pub fn nav_items(role: Role) -> &'static [NavItem] {
    match role {
        Role::Provider => &PROVIDER_NAV,
        Role::User | Role::Guest => &PATIENT_NAV,
    }
}

/// Header title for `role`.
pub fn title(role: Role) -> &'static str {
    match role {
        Role::Provider => "Provider Portal",
        Role::User | Role::Guest => "AI Doctor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_screens() {
        assert!(Screen::Home.is_public());
        assert!(Screen::ProviderRegister.is_public());
        assert!(!Screen::Diagnosis.is_public());
        assert!(!Screen::Trip.is_public());
        assert!(!Screen::Nutrition.is_public());
    }

    #[test]
    fn provider_nav_is_dashboard_and_map() {
        let labels: Vec<_> = nav_items(Role::Provider).iter().map(|i| i.label).collect();
        assert_eq!(labels, ["Dashboard", "Live Map"]);
        assert_eq!(nav_items(Role::Guest), nav_items(Role::User));
        assert_eq!(title(Role::Provider), "Provider Portal");
    }
}
