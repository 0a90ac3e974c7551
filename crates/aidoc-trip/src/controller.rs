//! Trip animation controller
//!
//! Drives a [`TripSimulation`] in a background task: one dwell sleep, then a
//! frame ticker that interpolates the vehicle until it arrives. Sleeps are
//! deadline based so the schedule does not drift with handler latency.
//!
//! The ticker owns a cancellation token and checks it on every frame. Skip,
//! teardown and drop all cancel it; arrival ends the loop on its own.
//!
//! # Blocking Lock Usage
//!
//! The simulation sits behind a `parking_lot::Mutex`. Every lock scope is a
//! short synchronous state update and is released before the next `.await`.

use std::sync::Arc;

use aidoc_core::effects::{CancellationToken, TimeEffects, TimeError};
use aidoc_core::{Provider, Review, User};
use aidoc_effects::{CancellationSource, TaskRegistry};
use aidoc_store::DataAccessService;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::TripError;
use crate::machine::{TripPhase, TripSimulation, TripSnapshot, TripTiming};

/// Notice shown after a successful review submission
pub const NOTICE_REVIEW_SUBMITTED: &str = "Review Submitted! Thank you.";

/// Notice shown when a review is submitted without a signed-in user
pub const NOTICE_LOGIN_REQUIRED: &str = "Please login to submit a review.";

/// How the review step ended. Either way the trip is complete.
#[derive(Debug, Clone, PartialEq)]
pub enum TripOutcome {
    /// Review stored against the trip provider
    Submitted(Review),
    /// No user session; nothing was stored
    LoginRequired,
}

impl TripOutcome {
    /// Text for the user-facing notice
    pub fn notice(&self) -> &'static str {
        match self {
            TripOutcome::Submitted(_) => NOTICE_REVIEW_SUBMITTED,
            TripOutcome::LoginRequired => NOTICE_LOGIN_REQUIRED,
        }
    }
}

/// Owner of one running trip.
pub struct TripController {
    provider_id: String,
    state: Arc<Mutex<TripSimulation>>,
    updates: Arc<watch::Sender<TripSnapshot>>,
    cancel: CancellationSource,
    tasks: TaskRegistry,
    time: Arc<dyn TimeEffects>,
}

impl std::fmt::Debug for TripController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripController")
            .field("provider_id", &self.provider_id)
            .field("phase", &self.state.lock().phase())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl TripController {
    /// Start a trip towards `provider` and spawn its animation task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(provider: &Provider, timing: TripTiming, time: Arc<dyn TimeEffects>) -> Self {
        let simulation = TripSimulation::new(provider.location.point(), timing);
        let (tx, _rx) = watch::channel(simulation.snapshot());

        let controller = Self {
            provider_id: provider.id.clone(),
            state: Arc::new(Mutex::new(simulation)),
            updates: Arc::new(tx),
            cancel: CancellationSource::new(),
            tasks: TaskRegistry::new(),
            time,
        };

        let started_ms = controller.time.monotonic_ms();
        let token = controller.cancel.token();
        let ticker = run_ticker(
            controller.state.clone(),
            controller.updates.clone(),
            controller.time.clone(),
            token.clone(),
            timing,
            started_ms,
        );
        controller.tasks.spawn_cancellable(ticker, token);

        tracing::info!(provider_id = %provider.id, ?timing, "trip started");
        controller
    }

    /// Provider the trip is heading to
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Latest published frame
    pub fn snapshot(&self) -> TripSnapshot {
        self.updates.borrow().clone()
    }

    /// Receiver notified on every published frame
    pub fn subscribe(&self) -> watch::Receiver<TripSnapshot> {
        self.updates.subscribe()
    }

    /// Read the live simulation state.
    pub fn with_state<R>(&self, f: impl FnOnce(&TripSimulation) -> R) -> R {
        f(&self.state.lock())
    }

    /// Current phase
    pub fn phase(&self) -> TripPhase {
        self.state.lock().phase()
    }

    /// Whether the review step has finished
    pub fn is_complete(&self) -> bool {
        self.state.lock().is_completed()
    }

    /// Whether the animation task is still running
    pub fn is_animating(&self) -> bool {
        self.tasks.active_count() > 0
    }

    /// Skip the ride and go straight to the review.
    pub fn skip(&self) -> Result<(), TripError> {
        self.update(TripSimulation::skip)?;
        self.cancel.cancel();
        tracing::info!(provider_id = %self.provider_id, "trip skipped");
        Ok(())
    }

    /// Leave `ARRIVED` for the review.
    pub fn complete_and_rate(&self) -> Result<(), TripError> {
        self.update(TripSimulation::complete_and_rate)
    }

    /// Select a star rating.
    pub fn set_rating(&self, stars: u8) -> Result<(), TripError> {
        self.update(|sim| sim.set_rating(stars))
    }

    /// Replace the review comment.
    pub fn set_comment(&self, comment: impl Into<String>) -> Result<(), TripError> {
        let comment = comment.into();
        self.update(move |sim| sim.set_comment(comment))
    }

    /// Submit the review for `user` and complete the trip.
    ///
    /// Without a user nothing is stored but the trip still completes with
    /// [`TripOutcome::LoginRequired`].
    pub async fn submit_review(
        &self,
        data: &DataAccessService,
        user: Option<&User>,
    ) -> Result<TripOutcome, TripError> {
        self.with_state(|sim| match sim.phase() {
            TripPhase::Review if !sim.is_completed() => Ok(()),
            from => Err(TripError::IllegalTransition {
                from,
                action: "submit a review",
            }),
        })?;

        let Some(user) = user else {
            tracing::info!(provider_id = %self.provider_id, "review rejected: no user session");
            self.update(TripSimulation::mark_completed)?;
            return Ok(TripOutcome::LoginRequired);
        };

        let now = self.time.physical_time().await?;
        let review = self.with_state(|sim| {
            sim.build_review(now.id_string(), &user.name, now.locale_date_string())
        });
        data.add_review(&self.provider_id, review.clone()).await?;
        self.update(TripSimulation::mark_completed)?;

        tracing::info!(
            provider_id = %self.provider_id,
            review_id = %review.id,
            stars = review.rating.stars(),
            "trip review submitted"
        );
        Ok(TripOutcome::Submitted(review))
    }

    /// Stop the animation. The state is left as it is.
    pub fn teardown(&self) {
        self.cancel.cancel();
        self.tasks.shutdown();
    }

    fn update(
        &self,
        f: impl FnOnce(&mut TripSimulation) -> Result<(), TripError>,
    ) -> Result<(), TripError> {
        let mut sim = self.state.lock();
        f(&mut sim)?;
        self.updates.send_replace(sim.snapshot());
        Ok(())
    }
}

impl Drop for TripController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn sleep_until(time: &dyn TimeEffects, deadline_ms: u64) -> Result<(), TimeError> {
    let now = time.monotonic_ms();
    time.sleep_ms(deadline_ms.saturating_sub(now)).await
}

async fn run_ticker(
    state: Arc<Mutex<TripSimulation>>,
    updates: Arc<watch::Sender<TripSnapshot>>,
    time: Arc<dyn TimeEffects>,
    token: Arc<dyn CancellationToken>,
    timing: TripTiming,
    started_ms: u64,
) {
    let travel_start = started_ms.saturating_add(timing.dwell_ms);
    if let Err(err) = sleep_until(time.as_ref(), travel_start).await {
        tracing::warn!(error = %err, "trip dwell interrupted");
        return;
    }
    if token.is_cancelled() {
        return;
    }
    {
        let mut sim = state.lock();
        if let Err(err) = sim.finish_dwell() {
            tracing::debug!(error = %err, "ticker stopped before travel");
            return;
        }
        updates.send_replace(sim.snapshot());
    }
    tracing::debug!("driver found, travelling");

    loop {
        if token.is_cancelled() {
            tracing::debug!("trip ticker cancelled");
            return;
        }
        let now = time.monotonic_ms();
        let phase = {
            let mut sim = state.lock();
            match sim.advance(now.saturating_sub(travel_start)) {
                Ok(phase) => {
                    updates.send_replace(sim.snapshot());
                    phase
                }
                // Skipped between frames
                Err(_) => return,
            }
        };
        if phase == TripPhase::Arrived {
            tracing::info!("driver arrived");
            return;
        }
        if let Err(err) = sleep_until(time.as_ref(), now.saturating_add(timing.frame_ms)).await {
            tracing::warn!(error = %err, "trip ticker interrupted");
            return;
        }
    }
}
