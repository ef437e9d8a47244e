//! Domain error model.

use thiserror::Error;

/// Result type used across the exchange domain.
pub type SwapResult<T> = Result<T, SwapError>;

/// Errors raised by exchange operations.
///
/// Every variant except `Storage` is recoverable: the front end reports
/// it and returns control to the menu. `Storage` wraps I/O failures from
/// the backing store and terminates the run.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Registration attempted with a member ID that is already taken.
    #[error("member ID '{0}' already exists")]
    DuplicateMember(String),

    /// Unknown member ID or password mismatch at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Requested clothing kind is neither Topwear nor Bottomwear.
    #[error("invalid clothing type '{0}'")]
    InvalidVariant(String),

    /// Borrow requested for an ID not present in the catalog.
    #[error("item '{0}' is not available")]
    ItemNotFound(String),

    /// Return requested while the member's borrowed list is empty.
    #[error("no borrowed items")]
    NoBorrowedItems,

    /// Selection outside the displayed range.
    #[error("invalid selection")]
    InvalidSelection,

    /// A persisted record could not be interpreted.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Underlying store failure. Fatal to the run.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
