//! Platform event and error types crossing the host boundary.

use thiserror::Error;

// =============================================================================
// Events delivered by the host glue
// =============================================================================

/// Terminal status of a listening session, delivered by the platform's
/// "message matched" broadcast.
///
/// The platform emits exactly one terminal status per listening session. The
/// host glue decodes the raw broadcast and forwards it via
/// [`SmsRetriever::handle_consent_status`](crate::SmsRetriever::handle_consent_status).
///
/// `P` is the host's opaque consent-prompt launch descriptor
/// ([`ConsentHost::Prompt`](crate::ConsentHost::Prompt)).
#[derive(Debug)]
pub enum ConsentStatus<P> {
    /// A message matching the session's filter arrived; the carried descriptor
    /// launches the consent prompt.
    MessageMatched(P),
    /// The listening window elapsed without a matching message.
    TimedOut,
    /// Any other status code. Unrecognized codes are ignored rather than
    /// treated as errors, so newer platform versions stay compatible.
    Other(i32),
}

/// Outcome of the consent prompt, reported by the host activity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// The user approved sharing the message. The platform normally delivers
    /// the body alongside approval; `None` is guarded, not assumed impossible.
    Approved {
        /// Raw message text, if the platform delivered one.
        message: Option<String>,
    },
    /// The user declined or dismissed the prompt.
    Denied,
}

// =============================================================================
// Host operation errors
// =============================================================================

/// Error from registering or unregistering the platform event receiver.
///
/// `AlreadyRegistered` and `NotRegistered` are tolerated by the session (a
/// stale registration from a superseded session, or a repeated release);
/// `Platform` is surfaced as
/// [`ConsentError::ReceiverFault`](crate::ConsentError::ReceiverFault).
#[derive(Debug, Clone, Error)]
pub enum ReceiverError {
    /// A receiver for this session's filter is already registered.
    #[error("receiver already registered: {0}")]
    AlreadyRegistered(String),
    /// No receiver is currently registered.
    #[error("receiver is not registered")]
    NotRegistered,
    /// The platform rejected the operation for another reason.
    #[error("platform receiver operation failed: {0}")]
    Platform(String),
}

/// Error from starting the platform listening session.
#[derive(Debug, Clone, Error)]
#[error("platform rejected the listening request: {message}")]
pub struct ListenError {
    /// Reason reported by the platform.
    pub message: String,
}

impl ListenError {
    /// Create a new ListenError with the given reason.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error from presenting the consent prompt: the host has no component capable
/// of showing it.
#[derive(Debug, Clone, Error)]
#[error("no component can present the consent prompt: {message}")]
pub struct PromptError {
    /// Reason reported by the host.
    pub message: String,
}

impl PromptError {
    /// Create a new PromptError with the given reason.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
