//! Store errors

use aidoc_core::effects::StorageError;

/// Failure reading or writing a persisted collection.
///
/// "Not found" is never an error at this layer; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The storage handler failed
    #[error("storage failure on '{key}': {source}")]
    Storage {
        /// Collection key
        key: &'static str,
        /// Handler error
        #[source]
        source: StorageError,
    },
    /// Persisted bytes are not valid JSON for the collection
    #[error("corrupt value under '{key}': {reason}")]
    Corrupt {
        /// Collection key
        key: &'static str,
        /// Decoder message
        reason: String,
    },
    /// A record could not be encoded
    #[error("failed to encode value for '{key}': {reason}")]
    Encode {
        /// Collection key
        key: &'static str,
        /// Encoder message
        reason: String,
    },
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
