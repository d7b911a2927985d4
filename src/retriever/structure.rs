//! Main retriever implementation.

use super::error::ConsentError;
use super::session::{PendingRequest, ReceiverRegistration, Session, SessionState, Settlement};
use super::traits::SmsRetrieverTrait;
use crate::platform::events::{ConsentStatus, PromptResult};
use crate::platform::traits::ConsentHost;
use crate::types::{CorrelationToken, OtpCode, OtpLength, SenderFilter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// Consent-based SMS retriever.
///
/// Owns at most one in-flight retrieval request at a time and mediates
/// between the caller's future and the two platform callback channels: the
/// "message matched" broadcast ([`handle_consent_status`](Self::handle_consent_status))
/// and the consent-prompt result
/// ([`handle_prompt_result`](Self::handle_prompt_result)). The broadcast
/// always precedes the prompt result for a given session; the platform
/// enforces that order and this code does not re-validate it.
///
/// Cloning is cheap and all clones share the same request slot; the host glue
/// typically keeps one clone for the callback path while callers await on
/// another.
///
/// # Type Parameters
///
/// - `H`: The host platform implementation
///
/// # Example
///
/// ```rust,ignore
/// use sms_user_consent::{SmsRetriever, SmsRetrieverTrait};
///
/// let retriever = SmsRetriever::new(host);
///
/// // Caller side: one-shot async result.
/// let code = retriever.retrieve_otp(6, None).await?;
/// println!("Got code: {}", code);
///
/// // Host glue side: forward platform callbacks.
/// retriever.handle_consent_status(status);
/// retriever.handle_prompt_result(token, result);
/// ```
pub struct SmsRetriever<H: ConsentHost> {
    shared: Arc<Shared<H>>,
}

impl<H: ConsentHost> Clone for SmsRetriever<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<H: ConsentHost> {
    host: H,
    session: Mutex<Option<Session<H>>>,
    next_token: AtomicU32,
}

impl<H: ConsentHost> SmsRetriever<H> {
    /// Create a new retriever backed by the given host.
    pub fn new(host: H) -> Self {
        Self {
            shared: Arc::new(Shared {
                host,
                session: Mutex::new(None),
                next_token: AtomicU32::new(1),
            }),
        }
    }

    /// Get reference to the underlying host.
    pub fn host(&self) -> &H {
        &self.shared.host
    }

    /// Whether a retrieval request is currently awaiting settlement.
    pub fn has_pending_request(&self) -> bool {
        self.lock_session().is_some()
    }

    /// Handle the platform's terminal listening-session status.
    ///
    /// Called by the host glue from its broadcast receiver. `MessageMatched`
    /// launches the consent prompt through the host, correlated by the
    /// session's token; `TimedOut` settles the request with
    /// [`ConsentError::Timeout`]; unrecognized codes are ignored. Events
    /// arriving with no pending session are inert.
    pub fn handle_consent_status(&self, status: ConsentStatus<H::Prompt>) {
        let mut slot = self.lock_session();
        let Some(session) = slot.as_mut() else {
            #[cfg(feature = "tracing")]
            debug!("consent status delivered with no pending request");
            return;
        };
        match status {
            ConsentStatus::MessageMatched(prompt) => {
                if session.state != SessionState::Listening {
                    #[cfg(feature = "tracing")]
                    debug!(token = %session.token, "duplicate match signal, prompt already shown");
                    return;
                }
                let token = session.token;
                match self.shared.host.present_prompt(prompt, token) {
                    Ok(()) => {
                        session.state = SessionState::PromptShown;
                        #[cfg(feature = "tracing")]
                        info!(token = %token, "consent prompt presented");
                    }
                    Err(e) => session.settle(Err(ConsentError::ActivityNotFound {
                        message: e.message,
                    })),
                }
            }
            ConsentStatus::TimedOut => session.settle(Err(ConsentError::Timeout)),
            ConsentStatus::Other(_code) => {
                #[cfg(feature = "tracing")]
                debug!(status = _code, "ignoring unrecognized consent status code");
            }
        }
        clear_if_settled(&mut slot);
    }

    /// Handle the user's consent-prompt decision.
    ///
    /// Called by the host glue from its activity-result callback. Results
    /// whose token does not match the pending session (a superseded or
    /// already-settled request) are ignored.
    pub fn handle_prompt_result(&self, token: CorrelationToken, result: PromptResult) {
        let mut slot = self.lock_session();
        let Some(session) = slot.as_mut() else {
            #[cfg(feature = "tracing")]
            debug!(token = %token, "prompt result delivered with no pending request");
            return;
        };
        if session.token != token {
            #[cfg(feature = "tracing")]
            debug!(
                token = %token,
                pending = %session.token,
                "ignoring prompt result for a stale session"
            );
            return;
        }
        if session.state != SessionState::PromptShown {
            #[cfg(feature = "tracing")]
            debug!(token = %token, "prompt result arrived before the prompt was shown");
            return;
        }
        match result {
            PromptResult::Approved { message } => {
                let outcome = session.request.extract(message);
                session.settle(outcome);
            }
            PromptResult::Denied => session.settle(Err(ConsentError::Denied)),
        }
        clear_if_settled(&mut slot);
    }

    /// Install a new session in the request slot and start listening.
    ///
    /// A pending request is superseded explicitly: its future settles with
    /// [`ConsentError::Superseded`] and its later platform events fall on a
    /// mismatched token.
    fn begin(
        &self,
        request: PendingRequest,
        sender: Option<&SenderFilter>,
    ) -> oneshot::Receiver<Settlement> {
        let (sink, outcome) = oneshot::channel();
        let mut slot = self.lock_session();

        if let Some(mut previous) = slot.take() {
            if !previous.is_settled() {
                #[cfg(feature = "tracing")]
                warn!(token = %previous.token, "superseding a pending retrieval request");
                previous.settle(Err(ConsentError::Superseded));
            }
        }

        if let Err(e) = self.shared.host.start_listening(sender) {
            let _ = sink.send(Err(ConsentError::ReceiverFault {
                reason: e.to_string(),
            }));
            return outcome;
        }

        let receiver = match ReceiverRegistration::acquire(&self.shared.host) {
            Ok(receiver) => receiver,
            Err(e) => {
                let _ = sink.send(Err(ConsentError::ReceiverFault {
                    reason: e.to_string(),
                }));
                return outcome;
            }
        };

        let token = CorrelationToken::from_raw(self.shared.next_token.fetch_add(1, Ordering::Relaxed));
        #[cfg(feature = "tracing")]
        debug!(token = %token, sender = ?sender.map(SenderFilter::as_str), "listening session started");
        *slot = Some(Session::new(token, request, sink, receiver));
        outcome
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session<H>>> {
        // A panic while the lock was held leaves no torn state worth
        // preserving; continue with whatever the slot contains.
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn await_settlement(
        &self,
        outcome: oneshot::Receiver<Settlement>,
    ) -> Result<String, ConsentError> {
        outcome.await.map_err(|_| ConsentError::ReceiverFault {
            reason: "consent session dropped before settlement".to_string(),
        })?
    }
}

fn clear_if_settled<H: ConsentHost>(slot: &mut MutexGuard<'_, Option<Session<H>>>) {
    if slot.as_ref().is_some_and(Session::is_settled) {
        **slot = None;
    }
}

impl<H: ConsentHost> SmsRetrieverTrait for SmsRetriever<H> {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsRetriever::retrieve_otp",
            skip_all,
            fields(otp_length = otp_length)
        )
    )]
    async fn retrieve_otp(
        &self,
        otp_length: u32,
        sender: Option<SenderFilter>,
    ) -> Result<OtpCode, ConsentError> {
        let length = OtpLength::new(otp_length).map_err(|_| ConsentError::InvalidOtpLength {
            requested: otp_length,
        })?;
        let outcome = self.begin(PendingRequest::Otp { length }, sender.as_ref());
        let text = self.await_settlement(outcome).await?;
        #[cfg(feature = "tracing")]
        info!(otp_length = otp_length, "one-time code retrieved");
        Ok(OtpCode::new(text))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "SmsRetriever::retrieve_message", skip_all)
    )]
    async fn retrieve_message(
        &self,
        sender: Option<SenderFilter>,
    ) -> Result<String, ConsentError> {
        let outcome = self.begin(PendingRequest::FullMessage, sender.as_ref());
        let text = self.await_settlement(outcome).await?;
        #[cfg(feature = "tracing")]
        info!(bytes = text.len(), "full message retrieved");
        Ok(text)
    }
}
