//! Error types returned from the public interface of the library.
//!
//! Internally the crate uses `anyhow` with `.context(...)`. At the boundary closest to the cause,
//! errors are converted into an [`Error`] that carries an [`ErrorType`] so that callers can tell
//! a rejected transaction apart from a failed write without matching on message text.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The result type returned by public functions in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The result type used internally before errors have been categorized.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The broad category of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The input was rejected before any state was changed, e.g. a future-dated transaction.
    Validation,
    /// A referenced row does not exist, e.g. a delete position out of range.
    NotFound,
    /// Reading or writing the ledger file or its backups failed.
    Storage,
    /// The configuration file or home directory is missing or invalid.
    Config,
    /// The request itself was malformed, e.g. an inverted date range.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error with an [`ErrorType`] attached.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Create an error from a message.
    pub fn msg<M>(error_type: ErrorType, message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::new(error_type, anyhow::Error::msg(message))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain.
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into a public [`Result`] with the given [`ErrorType`].
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
