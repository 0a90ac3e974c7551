//! Application core
//!
//! [`AppCore`] owns the process-scoped session state: the active screen, the
//! signed-in user and provider, the running trip, and queued notices. It is
//! bootstrapped from storage once and afterwards changed only by workflows,
//! which persist through the [`DataAccessService`] first and then update
//! the in-memory copy.
//!
//! Frontends share the core as `Arc<RwLock<AppCore>>`. Workflows take the
//! lock briefly to clone the handles they need and never hold it across an
//! effect call.

pub mod screen;

use std::sync::Arc;

use aidoc_core::effects::{ApiKeySource, InferenceEffects, StorageEffects, TimeEffects};
use aidoc_core::{Provider, User};
use aidoc_effects::{AidocConfig, FilesystemStorageHandler, GeminiInferenceHandler, RealTimeHandler};
use aidoc_store::DataAccessService;
use aidoc_trip::{TripController, TripTiming};

use crate::errors::AppError;
use crate::views::notice::Notice;
pub use screen::{nav_items, NavItem, Role, Screen};

/// Effect handlers the core runs on.
#[derive(Clone)]
pub struct AppEffects {
    /// Durable key-value namespace
    pub storage: Arc<dyn StorageEffects>,
    /// Clock
    pub time: Arc<dyn TimeEffects>,
    /// Remote model. `None` selects the Gemini handler with the stored key
    /// override as credential fallback.
    pub inference: Option<Arc<dyn InferenceEffects>>,
}

impl AppEffects {
    /// Filesystem storage under `config.data_dir`, the tokio clock and the
    /// Gemini handler.
    pub fn production(config: &AidocConfig) -> Self {
        Self {
            storage: Arc::new(FilesystemStorageHandler::new(config.data_dir.clone())),
            time: Arc::new(RealTimeHandler::new()),
            inference: None,
        }
    }
}

impl std::fmt::Debug for AppEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEffects")
            .field("custom_inference", &self.inference.is_some())
            .finish_non_exhaustive()
    }
}

/// Headless application state.
pub struct AppCore {
    config: AidocConfig,
    data: DataAccessService,
    time: Arc<dyn TimeEffects>,
    inference: Arc<dyn InferenceEffects>,
    screen: Screen,
    user: Option<User>,
    provider: Option<Provider>,
    trip: Option<ActiveTrip>,
    notices: Vec<Notice>,
}

struct ActiveTrip {
    provider: Provider,
    controller: Arc<TripController>,
}

impl std::fmt::Debug for AppCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCore")
            .field("screen", &self.screen)
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .field("provider", &self.provider.as_ref().map(|p| &p.id))
            .field("trip", &self.trip.as_ref().map(|t| &t.provider.id))
            .finish_non_exhaustive()
    }
}

impl AppCore {
    /// Open the store, seed it if needed, and restore both sessions.
    ///
    /// A stored provider session opens the provider dashboard; otherwise
    /// the shell starts at home.
    pub async fn bootstrap(config: AidocConfig, effects: AppEffects) -> Result<Self, AppError> {
        let data = DataAccessService::open(effects.storage).await?;
        let inference = match effects.inference {
            Some(inference) => inference,
            None => {
                let fallback: Arc<dyn ApiKeySource> = Arc::new(data.store().clone());
                Arc::new(GeminiInferenceHandler::new(
                    config.inference.clone(),
                    Some(fallback),
                ))
            }
        };

        let user = data.current_user().await?;
        let provider = data.current_provider().await?;
        let screen = if provider.is_some() {
            Screen::ProviderDashboard
        } else {
            Screen::Home
        };
        tracing::info!(
            user_session = user.is_some(),
            provider_session = provider.is_some(),
            ?screen,
            "app core bootstrapped"
        );

        Ok(Self {
            config,
            data,
            time: effects.time,
            inference,
            screen,
            user,
            provider,
            trip: None,
            notices: Vec::new(),
        })
    }

    // ===== Handles =====

    /// Loaded configuration
    pub fn config(&self) -> &AidocConfig {
        &self.config
    }

    /// Data access service
    pub fn data(&self) -> &DataAccessService {
        &self.data
    }

    /// Clock handle
    pub fn time(&self) -> Arc<dyn TimeEffects> {
        self.time.clone()
    }

    /// Inference handle
    pub fn inference(&self) -> Arc<dyn InferenceEffects> {
        self.inference.clone()
    }

    // ===== Sessions =====

    /// Signed-in patient
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Signed-in provider
    pub fn current_provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    /// Active role; a provider session wins over a patient session.
    pub fn role(&self) -> Role {
        if self.provider.is_some() {
            Role::Provider
        } else if self.user.is_some() {
            Role::User
        } else {
            Role::Guest
        }
    }

    pub(crate) fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    pub(crate) fn set_provider(&mut self, provider: Option<Provider>) {
        self.provider = provider;
    }

    // ===== Navigation =====

    /// Screen last navigated to
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Go to `target`. Protected screens redirect to the user login while
    /// nobody is signed in. Returns the screen actually selected.
    pub fn navigate(&mut self, target: Screen) -> Screen {
        let next = if target.is_public() || self.user.is_some() || self.provider.is_some() {
            target
        } else {
            Screen::UserLogin
        };
        if next != target {
            tracing::debug!(?target, "protected screen redirected to login");
        }
        self.screen = next;
        next
    }

    /// Screen to draw for the current state, applying fallbacks for screens
    /// whose backing session or trip is missing.
    pub fn render_target(&self) -> Screen {
        match self.screen {
            Screen::Trip if self.trip.is_none() => Screen::Home,
            Screen::UserProfile if self.user.is_none() => Screen::UserLogin,
            Screen::ProviderDashboard if self.provider.is_none() => Screen::ProviderLogin,
            screen => screen,
        }
    }

    /// Sidebar entries for the active role
    pub fn nav_items(&self) -> &'static [NavItem] {
        screen::nav_items(self.role())
    }

    /// Header title for the active role
    pub fn title(&self) -> &'static str {
        screen::title(self.role())
    }

    pub(crate) fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    // ===== Trip =====

    /// Start a trip to `provider` and show the trip screen. Any previous
    /// trip is torn down.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_trip(&mut self, provider: Provider) -> Arc<TripController> {
        self.end_trip();
        let timing = TripTiming::from(&self.config.trip);
        let controller = Arc::new(TripController::start(&provider, timing, self.time.clone()));
        self.trip = Some(ActiveTrip {
            provider,
            controller: controller.clone(),
        });
        self.screen = Screen::Trip;
        controller
    }

    /// Provider of the running trip
    pub fn trip_provider(&self) -> Option<&Provider> {
        self.trip.as_ref().map(|t| &t.provider)
    }

    /// Controller of the running trip
    pub fn trip(&self) -> Option<Arc<TripController>> {
        self.trip.as_ref().map(|t| t.controller.clone())
    }

    /// Drop the trip and return home.
    pub fn trip_complete(&mut self) {
        self.end_trip();
        self.screen = Screen::Home;
    }

    fn end_trip(&mut self) {
        if let Some(trip) = self.trip.take() {
            trip.controller.teardown();
            tracing::debug!(provider_id = %trip.provider.id, "trip closed");
        }
    }

    // ===== Notices =====

    /// Queue a notice
    pub fn push_notice(&mut self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "notice");
        self.notices.push(notice);
    }

    /// Queue a notice for a failed workflow
    pub fn report(&mut self, err: &AppError) {
        if err.category().is_user_correctable() {
            tracing::info!(category = %err.category(), error = ?err, "workflow rejected input");
        } else {
            tracing::warn!(category = %err.category(), error = ?err, "workflow failed");
        }
        self.push_notice(Notice::new(err.notice_level(), err.to_string()));
    }

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
