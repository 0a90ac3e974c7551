//! Categorized application errors
//!
//! Every workflow failure ends up as a notice on a stable screen. The
//! category decides the notice level; the error's `Display` is the text the
//! user sees.

use std::fmt;

use aidoc_core::effects::{InferenceError, TimeError};
use aidoc_effects::ConfigError;
use aidoc_store::StoreError;
use aidoc_trip::TripError;

use crate::views::notice::NoticeLevel;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors, including a missing inference key
    Config,
    /// Resource not found errors
    NotFound,
    /// Remote inference failures
    Network,
    /// General operation failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Whether the user can fix this by changing input or settings.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Config)
    }

    /// Notice level used to show errors of this category.
    #[must_use]
    pub fn notice_level(&self) -> NoticeLevel {
        match self {
            Self::Input => NoticeLevel::Info,
            Self::Config | Self::NotFound | Self::Network => NoticeLevel::Warning,
            Self::Operation => NoticeLevel::Error,
        }
    }

    /// Short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Application Error
// ============================================================================

/// Errors returned by workflows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Form input rejected before any effect ran
    #[error("{message}")]
    Input {
        /// Text shown to the user
        message: String,
    },
    /// A record the workflow needs does not exist
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing record
        what: String,
    },
    /// Remote inference failed; `notice` is the workflow's user-facing text
    #[error("{notice}")]
    Inference {
        /// Text shown to the user
        notice: &'static str,
        /// Underlying failure
        #[source]
        source: InferenceError,
    },
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Persistence failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Trip action rejected or failed
    #[error(transparent)]
    Trip(#[from] TripError),
    /// Clock failure
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl AppError {
    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Wrap an inference failure with the notice for the calling workflow
    pub fn inference(notice: &'static str, source: InferenceError) -> Self {
        Self::Inference { notice, source }
    }

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Input { .. } => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Inference {
                source: InferenceError::MissingCredential,
                ..
            }
            | Self::Config(_) => ErrorCategory::Config,
            Self::Inference { .. } => ErrorCategory::Network,
            Self::Trip(TripError::IllegalTransition { .. } | TripError::InvalidRating(_)) => {
                ErrorCategory::Input
            }
            Self::Store(_) | Self::Trip(_) | Self::Time(_) => ErrorCategory::Operation,
        }
    }

    /// Notice level for this error
    pub fn notice_level(&self) -> NoticeLevel {
        self.category().notice_level()
    }
}
