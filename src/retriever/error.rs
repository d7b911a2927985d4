//! Consent retrieval error taxonomy.

use crate::errors::RetryableError;
use thiserror::Error;

/// Terminal errors of a consent retrieval request.
///
/// Every variant ends the current request; nothing is retried internally.
/// Re-listening after, say, a [`RegexMismatch`](Self::RegexMismatch) is caller
/// policy; see [`RetryableRetriever`](crate::RetryableRetriever).
///
/// Each variant carries a stable machine-readable code ([`code`](Self::code))
/// for callers that dispatch on strings across a bridge boundary, alongside
/// the human-readable `Display` message.
#[derive(Debug, Clone, Error)]
pub enum ConsentError {
    /// The consent listening window elapsed with no matching message.
    #[error("timeout, no message received")]
    Timeout,

    /// The user declined or dismissed the consent prompt.
    #[error("consent denied by user")]
    Denied,

    /// The host has no component capable of presenting the consent prompt.
    #[error("unable to present the consent prompt: {message}")]
    ActivityNotFound {
        /// Reason reported by the host.
        message: String,
    },

    /// The delivered message contains no digit run of the requested length.
    #[error("the message received doesn't include a run of exactly {expected} digits")]
    RegexMismatch {
        /// The requested code length.
        expected: u32,
    },

    /// The delivered message body was absent or empty where one was required.
    #[error("the sms body is null")]
    NullMessage,

    /// Registering or unregistering the platform event receiver (or starting
    /// the listening session) failed unexpectedly.
    #[error("platform receiver failure: {reason}")]
    ReceiverFault {
        /// Reason reported by the platform.
        reason: String,
    },

    /// The requested code length is not a positive number of digits.
    #[error("otp length must be positive, got {requested}")]
    InvalidOtpLength {
        /// The rejected length.
        requested: u32,
    },

    /// The request was replaced by a newer retrieval request before it
    /// settled.
    #[error("request superseded by a newer retrieval request")]
    Superseded,
}

impl ConsentError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "TIMEOUT",
            Self::Denied => "DENIED",
            Self::ActivityNotFound { .. } => "ACTIVITY_NOT_FOUND",
            Self::RegexMismatch { .. } => "REGEX_MISMATCH",
            Self::NullMessage => "NULL_SMS",
            Self::ReceiverFault { .. } => "RECEIVER_ERROR",
            Self::InvalidOtpLength { .. } => "INVALID_OTP_LENGTH",
            Self::Superseded => "SUPERSEDED",
        }
    }
}

impl RetryableError for ConsentError {
    fn is_retryable(&self) -> bool {
        // Every settlement is terminal for its session.
        false
    }

    fn should_retry_operation(&self) -> bool {
        match self {
            // A fresh listening session may catch the next message.
            Self::Timeout
            | Self::RegexMismatch { .. }
            | Self::NullMessage
            | Self::ReceiverFault { .. } => true,
            // The user said no, the device cannot show the prompt, or the
            // request itself was malformed or abandoned.
            Self::Denied
            | Self::ActivityNotFound { .. }
            | Self::InvalidOtpLength { .. }
            | Self::Superseded => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ConsentError::Timeout.code(), "TIMEOUT");
        assert_eq!(ConsentError::Denied.code(), "DENIED");
        assert_eq!(
            ConsentError::ActivityNotFound {
                message: "x".into()
            }
            .code(),
            "ACTIVITY_NOT_FOUND"
        );
        assert_eq!(
            ConsentError::RegexMismatch { expected: 6 }.code(),
            "REGEX_MISMATCH"
        );
        assert_eq!(ConsentError::NullMessage.code(), "NULL_SMS");
        assert_eq!(
            ConsentError::ReceiverFault { reason: "x".into() }.code(),
            "RECEIVER_ERROR"
        );
        assert_eq!(
            ConsentError::InvalidOtpLength { requested: 0 }.code(),
            "INVALID_OTP_LENGTH"
        );
        assert_eq!(ConsentError::Superseded.code(), "SUPERSEDED");
    }

    #[test]
    fn test_nothing_retries_within_a_session() {
        for err in [
            ConsentError::Timeout,
            ConsentError::Denied,
            ConsentError::NullMessage,
            ConsentError::Superseded,
        ] {
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_fresh_session_retryability() {
        assert!(ConsentError::Timeout.should_retry_operation());
        assert!(ConsentError::RegexMismatch { expected: 4 }.should_retry_operation());
        assert!(ConsentError::NullMessage.should_retry_operation());
        assert!(ConsentError::ReceiverFault { reason: "x".into() }.should_retry_operation());

        assert!(!ConsentError::Denied.should_retry_operation());
        assert!(
            !ConsentError::ActivityNotFound {
                message: "x".into()
            }
            .should_retry_operation()
        );
        assert!(!ConsentError::InvalidOtpLength { requested: 0 }.should_retry_operation());
        assert!(!ConsentError::Superseded.should_retry_operation());
    }
}
