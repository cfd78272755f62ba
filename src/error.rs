//! Error types for derived stores.

use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The operation is not part of the store's contract.
    ///
    /// Returned by every `set_state` call on a derived store: its value is
    /// only ever produced by the combine function.
    #[error("{operation} is not available in derived store")]
    UnsupportedOperation { operation: &'static str },
}

/// Result type alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
