//! Errors of the SDK itself.

use thiserror::Error;

/// Error outputs from `PhoneKit`
///
/// These are failures of the SDK itself. Failures reported by the verification
/// backend are not errors at this level: they are decoded into an
/// [`crate::ApiFailure`] and shown to the user through the status region.
#[derive(Debug, Error)]
pub enum PhoneKitError {
    /// The widget configuration could not be parsed or is inconsistent
    #[error("invalid_config: {0}")]
    InvalidConfig(String),
    /// The requested action is not available in the current step of the flow
    #[error("invalid_transition: cannot {action} while in {step}")]
    InvalidTransition {
        /// The action that was attempted.
        action: &'static str,
        /// The step the flow was in.
        step: crate::Step,
    },
    /// Another operation on the same flow is still in flight
    #[error("busy")]
    Busy,
    /// Unexpected error serializing information
    #[error("serialization_error: {error}")]
    SerializationError {
        /// Error description.
        error: String,
    },
    /// Network connection error with details
    #[error("network_error: {url} (status: {status:?}): {error}")]
    NetworkError {
        /// The URL that was requested.
        url: String,
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Error description.
        error: String,
    },
}
