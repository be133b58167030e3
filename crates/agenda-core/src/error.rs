//! Error types for Agenda

use thiserror::Error;

/// Result type alias using Agenda's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Agenda error types
///
/// Validation errors are terminal for the request that produced them;
/// only [`Error::Database`] is worth retrying (see [`Error::is_transient`]).
#[derive(Error, Debug)]
pub enum Error {
    // Booking errors
    #[error("Referenced {0} not found")]
    ReferenceNotFound(&'static str),

    #[error("User '{0}' is not a practitioner")]
    InvalidPractitioner(uuid::Uuid),

    #[error("Appointment start time is required")]
    MissingStartTime,

    #[error("Time slot is already taken for this practitioner")]
    SlotUnavailable,

    #[error("Appointment '{0}' not found")]
    AppointmentNotFound(uuid::Uuid),

    #[error("Unknown appointment status '{0}'")]
    InvalidStatus(String),

    // Access errors
    #[error("Operation not permitted for this role")]
    Forbidden,

    #[error("Not authorized to act on this appointment")]
    NotAuthorized,

    #[error("Caller is not authenticated")]
    NotAuthenticated,

    // Input errors
    #[error("Unrecognized date '{0}'")]
    InvalidDate(String),

    #[error("Email '{0}' is already in use")]
    EmailTaken(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    // Store errors (transient; callers may retry with backoff)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a caller may retry the whole operation.
    ///
    /// Everything except a store failure means the input itself is wrong
    /// and retrying verbatim will fail the same way.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
