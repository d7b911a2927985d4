//! Per-request consent session state and receiver lifecycle.

use super::error::ConsentError;
use crate::platform::events::ReceiverError;
use crate::platform::traits::ConsentHost;
use crate::types::{CorrelationToken, OtpLength};
use crate::utils::extract::first_exact_digit_run;
use tokio::sync::oneshot;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Outcome delivered through the settlement channel.
pub(crate) type Settlement = Result<String, ConsentError>;

/// What the caller asked the consent flow to produce.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PendingRequest {
    /// Extract a run of exactly `length` digits from the message.
    Otp { length: OtpLength },
    /// Return the full message body verbatim.
    FullMessage,
}

impl PendingRequest {
    /// Turn the platform-delivered message body into this request's outcome.
    pub(crate) fn extract(&self, message: Option<String>) -> Settlement {
        let Some(text) = message else {
            return Err(ConsentError::NullMessage);
        };
        match self {
            Self::Otp { length } => first_exact_digit_run(&text, *length)
                .map(str::to_owned)
                .ok_or(ConsentError::RegexMismatch {
                    expected: length.get(),
                }),
            Self::FullMessage => {
                if text.is_empty() {
                    Err(ConsentError::NullMessage)
                } else {
                    Ok(text)
                }
            }
        }
    }
}

/// Where a session is in its lifecycle.
///
/// `Listening → PromptShown → Settled`, with `Listening → Settled` on
/// timeout, receiver fault, presentation failure, or supersession. Settled is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// Waiting for the platform's "message matched" broadcast.
    Listening,
    /// Consent prompt launched; waiting for the user's decision.
    PromptShown,
    /// Outcome delivered. No transitions out.
    Settled,
}

/// RAII handle for the platform broadcast receiver registration.
///
/// Registered at most once per session, released at most once: `release` is
/// idempotent and `Drop` covers abandonment, so an OS-level registration is
/// never leaked across requests. `NotRegistered` on release and
/// `AlreadyRegistered` on acquire (a leftover from a superseded session being
/// replaced in place) are tolerated.
pub(crate) struct ReceiverRegistration<H: ConsentHost> {
    host: H,
    released: bool,
}

impl<H: ConsentHost> ReceiverRegistration<H> {
    /// Register the receiver, honoring the host's version gate.
    pub(crate) fn acquire(host: &H) -> Result<Self, ReceiverError> {
        if !host.needs_receiver_registration() {
            return Ok(Self {
                host: host.clone(),
                released: true,
            });
        }
        match host.register_receiver() {
            Ok(()) => {}
            Err(ReceiverError::AlreadyRegistered(_reason)) => {
                #[cfg(feature = "tracing")]
                debug!(reason = %_reason, "receiver already registered, reusing");
            }
            Err(e) => return Err(e),
        }
        Ok(Self {
            host: host.clone(),
            released: false,
        })
    }

    /// Unregister the receiver. Repeated calls are no-ops.
    pub(crate) fn release(&mut self) -> Result<(), ReceiverError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        match self.host.unregister_receiver() {
            Ok(()) | Err(ReceiverError::NotRegistered) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl<H: ConsentHost> Drop for ReceiverRegistration<H> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(_e) = self.host.unregister_receiver() {
                #[cfg(feature = "tracing")]
                warn!(error = %_e, "failed to unregister receiver on drop");
            }
        }
    }
}

/// One in-flight retrieval request, from listening to settlement.
pub(crate) struct Session<H: ConsentHost> {
    pub(crate) token: CorrelationToken,
    pub(crate) request: PendingRequest,
    pub(crate) state: SessionState,
    sink: Option<oneshot::Sender<Settlement>>,
    receiver: ReceiverRegistration<H>,
}

impl<H: ConsentHost> Session<H> {
    pub(crate) fn new(
        token: CorrelationToken,
        request: PendingRequest,
        sink: oneshot::Sender<Settlement>,
        receiver: ReceiverRegistration<H>,
    ) -> Self {
        Self {
            token,
            request,
            state: SessionState::Listening,
            sink: Some(sink),
            receiver,
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.state == SessionState::Settled
    }

    /// Deliver the outcome exactly once and release the receiver.
    ///
    /// The receiver is released before the outcome goes out; a release fault
    /// at this point is logged but never masks the outcome that was already
    /// determined.
    pub(crate) fn settle(&mut self, outcome: Settlement) {
        if self.is_settled() {
            #[cfg(feature = "tracing")]
            debug!(token = %self.token, "ignoring settlement of an already-settled session");
            return;
        }
        self.state = SessionState::Settled;

        if let Err(_e) = self.receiver.release() {
            #[cfg(feature = "tracing")]
            warn!(token = %self.token, error = %_e, "failed to unregister receiver on settlement");
        }

        if let Some(sink) = self.sink.take() {
            if sink.send(outcome).is_err() {
                #[cfg(feature = "tracing")]
                debug!(token = %self.token, "caller abandoned the request before settlement");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn otp(len: u32) -> PendingRequest {
        PendingRequest::Otp {
            length: OtpLength::new(len).unwrap(),
        }
    }

    #[test]
    fn test_otp_extraction_success() {
        let outcome = otp(6).extract(Some("Your code is 123456 exp 5m".into()));
        assert_eq!(outcome.unwrap(), "123456");
    }

    #[test]
    fn test_otp_extraction_mismatch() {
        let outcome = otp(4).extract(Some("Your code is 123456".into()));
        assert!(matches!(
            outcome,
            Err(ConsentError::RegexMismatch { expected: 4 })
        ));
    }

    #[test]
    fn test_otp_extraction_null_body() {
        assert!(matches!(otp(6).extract(None), Err(ConsentError::NullMessage)));
    }

    #[test]
    fn test_otp_extraction_empty_body_is_a_mismatch() {
        assert!(matches!(
            otp(6).extract(Some(String::new())),
            Err(ConsentError::RegexMismatch { expected: 6 })
        ));
    }

    #[test]
    fn test_full_message_is_verbatim() {
        let outcome = PendingRequest::FullMessage.extract(Some("Hello world".into()));
        assert_eq!(outcome.unwrap(), "Hello world");
    }

    #[test]
    fn test_full_message_null_or_empty() {
        assert!(matches!(
            PendingRequest::FullMessage.extract(None),
            Err(ConsentError::NullMessage)
        ));
        assert!(matches!(
            PendingRequest::FullMessage.extract(Some(String::new())),
            Err(ConsentError::NullMessage)
        ));
    }
}
