//! Trip state machine
//!
//! ```text
//! SEARCHING --dwell--> ON_THE_WAY --fraction = 1--> ARRIVED --complete & rate--> REVIEW
//!                          |                                                      ^
//!                          +------------------------skip-----------------------------+
//! ```
//!
//! Pure and clock-free: callers feed elapsed travel time into
//! [`TripSimulation::advance`]. The async driver lives in
//! [`crate::controller`].

use std::fmt;

use aidoc_core::{GeoPoint, Review, ReviewRating};
use serde::{Deserialize, Serialize};

use crate::error::TripError;

/// Fixed pickup point every trip starts from.
pub const ORIGIN: GeoPoint = GeoPoint::new(37.7649, -122.4294);

/// ETA shown when the vehicle sets off, in minutes.
pub const ETA_START_MINUTES: u32 = 12;

/// Comment used when the reviewer leaves the field blank.
pub const DEFAULT_COMMENT: &str = "No comment provided.";

/// Banner shown while travelling
pub const BANNER_EN_ROUTE: &str = "EN ROUTE TO DESTINATION";

/// Banner shown on arrival
pub const BANNER_ARRIVED: &str = "DRIVER HAS ARRIVED";

// =============================================================================
// Phase and timing
// =============================================================================

/// Trip lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripPhase {
    /// Waiting for a driver to accept
    Searching,
    /// Vehicle travelling towards the destination
    OnTheWay,
    /// Vehicle at the destination
    Arrived,
    /// Collecting the patient's review
    Review,
}

impl fmt::Display for TripPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripPhase::Searching => "SEARCHING",
            TripPhase::OnTheWay => "ON_THE_WAY",
            TripPhase::Arrived => "ARRIVED",
            TripPhase::Review => "REVIEW",
        })
    }
}

/// Animation timing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripTiming {
    /// Time spent in `SEARCHING`
    pub dwell_ms: u64,
    /// Travel time from origin to destination
    pub duration_ms: u64,
    /// Interval between position updates
    pub frame_ms: u64,
}

impl Default for TripTiming {
    fn default() -> Self {
        Self {
            dwell_ms: 3_000,
            duration_ms: 15_000,
            frame_ms: 16,
        }
    }
}

impl From<&aidoc_effects::TripConfig> for TripTiming {
    fn from(config: &aidoc_effects::TripConfig) -> Self {
        Self {
            dwell_ms: config.dwell_ms,
            duration_ms: config.duration_ms,
            frame_ms: config.frame_ms.max(1),
        }
    }
}

/// Share of the journey completed after `elapsed_ms`, in `[0, 1]`.
pub fn travel_fraction(elapsed_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / duration_ms as f64).min(1.0)
}

/// Whole minutes remaining at `fraction`: `ceil(12 * (1 - fraction))`.
pub fn eta_minutes(fraction: f64) -> u32 {
    let remaining = 1.0 - fraction.clamp(0.0, 1.0);
    // Bounded by ETA_START_MINUTES, so the cast cannot truncate.
    (f64::from(ETA_START_MINUTES) * remaining).ceil() as u32
}

// =============================================================================
// Driver
// =============================================================================

/// Who is driving. Static for every trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    /// Driver name
    pub name: String,
    /// Vehicle description
    pub vehicle: String,
    /// Licence plate
    pub plate: String,
    /// Contact number
    pub phone: String,
    /// Driver rating
    pub rating: f64,
}

impl Default for DriverProfile {
    fn default() -> Self {
        Self {
            name: "Rajesh Kumar".to_string(),
            vehicle: "Toyota Innova (Ambulance)".to_string(),
            plate: "KA-05-MR-5555".to_string(),
            phone: "+91-9876543210".to_string(),
            rating: 4.8,
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything a view needs to draw one frame of the trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSnapshot {
    /// Current phase
    pub phase: TripPhase,
    /// Vehicle position
    pub position: GeoPoint,
    /// Journey fraction for the progress bar
    pub progress: f64,
    /// Minutes to arrival
    pub eta_minutes: u32,
    /// Map follow target (travelling only)
    pub camera_target: Option<GeoPoint>,
    /// Status banner text
    pub banner: Option<&'static str>,
    /// Review submitted or abandoned; nothing more will happen
    pub completed: bool,
}

// =============================================================================
// Simulation
// =============================================================================

/// State of one simulated trip.
#[derive(Debug, Clone)]
pub struct TripSimulation {
    destination: GeoPoint,
    timing: TripTiming,
    phase: TripPhase,
    position: GeoPoint,
    progress: f64,
    eta_minutes: u32,
    rating: Option<ReviewRating>,
    comment: String,
    completed: bool,
    driver: DriverProfile,
}

impl TripSimulation {
    /// New trip in `SEARCHING`, parked at [`ORIGIN`].
    pub fn new(destination: GeoPoint, timing: TripTiming) -> Self {
        Self {
            destination,
            timing,
            phase: TripPhase::Searching,
            position: ORIGIN,
            progress: 0.0,
            eta_minutes: ETA_START_MINUTES,
            rating: None,
            comment: String::new(),
            completed: false,
            driver: DriverProfile::default(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    /// Vehicle position
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Journey fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Minutes to arrival
    pub fn eta_minutes(&self) -> u32 {
        self.eta_minutes
    }

    /// Trip destination
    pub fn destination(&self) -> GeoPoint {
        self.destination
    }

    /// Timing this trip runs with
    pub fn timing(&self) -> TripTiming {
        self.timing
    }

    /// Driver details
    pub fn driver(&self) -> &DriverProfile {
        &self.driver
    }

    /// Selected rating, if any
    pub fn rating(&self) -> Option<ReviewRating> {
        self.rating
    }

    /// Entered comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether the review step has finished
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn require(&self, phase: TripPhase, action: &'static str) -> Result<(), TripError> {
        if self.phase == phase && !self.completed {
            Ok(())
        } else {
            Err(TripError::IllegalTransition {
                from: self.phase,
                action,
            })
        }
    }

    /// `SEARCHING` → `ON_THE_WAY`, once the dwell has elapsed.
    pub fn finish_dwell(&mut self) -> Result<(), TripError> {
        self.require(TripPhase::Searching, "finish searching")?;
        self.phase = TripPhase::OnTheWay;
        self.position = ORIGIN;
        self.progress = 0.0;
        self.eta_minutes = ETA_START_MINUTES;
        Ok(())
    }

    /// Move the vehicle to where it is `elapsed_ms` into the journey.
    ///
    /// Reaching the destination switches to `ARRIVED` with a zero ETA.
    /// Returns the phase after the update.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<TripPhase, TripError> {
        self.require(TripPhase::OnTheWay, "advance")?;
        let fraction = travel_fraction(elapsed_ms, self.timing.duration_ms);
        self.position = ORIGIN.lerp(self.destination, fraction);
        self.progress = fraction;
        self.eta_minutes = eta_minutes(fraction);
        if fraction >= 1.0 {
            self.phase = TripPhase::Arrived;
            self.eta_minutes = 0;
        }
        Ok(self.phase)
    }

    /// Skip the rest of the ride: `ON_THE_WAY` → `REVIEW`.
    pub fn skip(&mut self) -> Result<(), TripError> {
        self.require(TripPhase::OnTheWay, "skip")?;
        self.phase = TripPhase::Review;
        self.eta_minutes = 0;
        Ok(())
    }

    /// `ARRIVED` → `REVIEW`.
    pub fn complete_and_rate(&mut self) -> Result<(), TripError> {
        self.require(TripPhase::Arrived, "complete the trip")?;
        self.phase = TripPhase::Review;
        Ok(())
    }

    /// Select a star rating.
    pub fn set_rating(&mut self, stars: u8) -> Result<(), TripError> {
        self.require(TripPhase::Review, "rate")?;
        self.rating = Some(ReviewRating::new(stars).ok_or(TripError::InvalidRating(stars))?);
        Ok(())
    }

    /// Replace the review comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), TripError> {
        self.require(TripPhase::Review, "comment")?;
        self.comment = comment.into();
        Ok(())
    }

    /// Review from the current inputs, defaulting to five stars and
    /// [`DEFAULT_COMMENT`].
    pub fn build_review(&self, id: String, user_name: &str, date: String) -> Review {
        let comment = if self.comment.trim().is_empty() {
            DEFAULT_COMMENT.to_string()
        } else {
            self.comment.clone()
        };
        Review {
            id,
            user_name: user_name.to_string(),
            rating: self.rating.unwrap_or_else(ReviewRating::max),
            comment,
            date,
        }
    }

    /// Close the review step. Further actions are rejected.
    pub fn mark_completed(&mut self) -> Result<(), TripError> {
        self.require(TripPhase::Review, "finish the review")?;
        self.completed = true;
        Ok(())
    }

    /// Map follow target: the vehicle while travelling, otherwise none.
    pub fn camera_target(&self) -> Option<GeoPoint> {
        (self.phase == TripPhase::OnTheWay).then_some(self.position)
    }

    /// Planned route `[origin, destination]`, hidden while searching.
    pub fn planned_route(&self) -> Option<[GeoPoint; 2]> {
        (self.phase != TripPhase::Searching).then_some([ORIGIN, self.destination])
    }

    /// Travelled route `[origin, position]`, hidden while searching.
    pub fn travelled_route(&self) -> Option<[GeoPoint; 2]> {
        (self.phase != TripPhase::Searching).then_some([ORIGIN, self.position])
    }

    /// Driver panel banner
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            TripPhase::OnTheWay => Some(BANNER_EN_ROUTE),
            TripPhase::Arrived => Some(BANNER_ARRIVED),
            TripPhase::Searching | TripPhase::Review => None,
        }
    }

    /// Frame for observers
    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            phase: self.phase,
            position: self.position,
            progress: self.progress,
            eta_minutes: self.eta_minutes,
            camera_target: self.camera_target(),
            banner: self.banner(),
            completed: self.completed,
        }
    }
}
