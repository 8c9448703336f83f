//! Error kinds surfaced by cache operations.

use thiserror::Error;

/// What can go wrong when talking to the store.
///
/// Anything that keeps a request from completing against the store,
/// from a refused connection to a backend task that went away, is
/// reported as [`Error::StoreUnavailable`] with the cause attached.
#[derive(Debug, Error)]
pub enum Error {
    /// The value kind is not one of the four the store understands.
    #[error("unsupported value kind: {0}")]
    UnsupportedType(String),

    /// The key-value store could not be reached or stopped answering.
    #[error("key-value store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}

impl Error {
    pub(crate) fn unavailable(cause: impl Into<anyhow::Error>) -> Self {
        Error::StoreUnavailable(cause.into())
    }
}
