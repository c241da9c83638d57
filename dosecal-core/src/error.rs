//! Error types for reminder runs.

use thiserror::Error;

/// Errors that can occur while expanding schedules or talking to the
/// calendar service.
///
/// Failures of individual operations inside a successfully submitted batch
/// are not errors; they are reported as [`crate::batch::ItemOutcome`]s and
/// never abort a run.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// A frequency token did not parse as a non-negative number.
    #[error("Invalid frequency code '{code}': bad token '{token}'")]
    InvalidFrequencyFormat { code: String, token: String },

    /// The duration text did not start with a positive integer day count.
    #[error("Invalid duration '{0}': expected \"<days> days\"")]
    InvalidDurationFormat(String),

    /// The authenticator could not produce a usable credential.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A batch round trip failed outright. Already-submitted batches stand;
    /// operations not yet flushed are lost for this run.
    #[error("Batch submission failed: {0}")]
    BatchTransport(String),

    /// A non-batch gateway call (e.g. the deletion listing query) failed.
    #[error("Calendar query failed: {0}")]
    Gateway(String),
}

/// Result type alias for reminder operations.
pub type ReminderResult<T> = Result<T, ReminderError>;
