//! AI Doctor Trip Simulation
//!
//! A simulated ambulance ride to a provider: the pure phase machine
//! ([`machine`]) and the async controller that animates it and files the
//! patient's review ([`controller`]).
//!
//! ```rust,ignore
//! let trip = TripController::start(&provider, TripTiming::default(), time);
//! let mut frames = trip.subscribe();
//! frames.wait_for(|f| f.phase == TripPhase::Arrived).await?;
//! trip.complete_and_rate()?;
//! trip.set_rating(4)?;
//! let outcome = trip.submit_review(&data, current_user.as_ref()).await?;
//! ```

#![forbid(unsafe_code)]

/// Async driver and review submission
pub mod controller;

/// Trip errors
pub mod error;

/// Pure phase machine
pub mod machine;

pub use controller::{TripController, TripOutcome, NOTICE_LOGIN_REQUIRED, NOTICE_REVIEW_SUBMITTED};
pub use error::TripError;
pub use machine::{
    eta_minutes, travel_fraction, DriverProfile, TripPhase, TripSimulation, TripSnapshot,
    TripTiming, DEFAULT_COMMENT, ETA_START_MINUTES, ORIGIN,
};
