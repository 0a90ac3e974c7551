//! Trip errors

use aidoc_core::effects::TimeError;
use aidoc_store::StoreError;

use crate::machine::TripPhase;

/// Errors raised by the trip machine and controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TripError {
    /// The action is not valid in the current phase
    #[error("cannot {action} while {from}")]
    IllegalTransition {
        /// Phase at the time of the attempt
        from: TripPhase,
        /// Attempted action
        action: &'static str,
    },
    /// Star rating outside `1..=5`
    #[error("rating {0} outside 1..=5")]
    InvalidRating(u8),
    /// Review persistence failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Clock failure while stamping the review
    #[error(transparent)]
    Time(#[from] TimeError),
}
