//! ConsentHost trait definition.

use super::events::{ListenError, PromptError, ReceiverError};
use crate::types::{CorrelationToken, SenderFilter};

/// Platform capabilities the retriever needs from its host.
///
/// The host glue (an Android activity plus the SMS user-consent client, in the
/// reference deployment) implements this trait and, in the other direction,
/// feeds platform callbacks into
/// [`SmsRetriever::handle_consent_status`](crate::SmsRetriever::handle_consent_status)
/// and
/// [`SmsRetriever::handle_prompt_result`](crate::SmsRetriever::handle_prompt_result).
///
/// All methods are called while the retriever holds its internal request lock,
/// so implementations must return promptly and must not call back into the
/// retriever from the same call stack.
///
/// # Example
///
/// ```rust,ignore
/// use sms_user_consent::{
///     ConsentHost, CorrelationToken, ListenError, PromptError, ReceiverError, SenderFilter,
/// };
///
/// #[derive(Clone)]
/// struct AndroidHost { /* activity handle, consent client */ }
///
/// impl ConsentHost for AndroidHost {
///     type Prompt = ConsentIntent;
///
///     fn start_listening(&self, sender: Option<&SenderFilter>) -> Result<(), ListenError> {
///         // SmsRetriever.getClient(ctx).startSmsUserConsent(sender)
///     }
///
///     fn register_receiver(&self) -> Result<(), ReceiverError> {
///         // ctx.registerReceiver(...)
///     }
///
///     fn unregister_receiver(&self) -> Result<(), ReceiverError> {
///         // ctx.unregisterReceiver(...)
///     }
///
///     fn present_prompt(
///         &self,
///         prompt: Self::Prompt,
///         token: CorrelationToken,
///     ) -> Result<(), PromptError> {
///         // activity.startActivityForResult(prompt, token.as_raw())
///     }
/// }
/// ```
pub trait ConsentHost: Clone + Send + Sync + 'static {
    /// Opaque descriptor that launches the platform consent prompt (an
    /// `Intent` on Android). The retriever never inspects it, only hands it
    /// back through [`present_prompt`](Self::present_prompt).
    type Prompt: Send + 'static;

    /// Begin a bounded listening window, optionally scoped to a sender.
    ///
    /// The platform enforces the window's duration and reports its terminal
    /// status through the broadcast channel.
    fn start_listening(&self, sender: Option<&SenderFilter>) -> Result<(), ListenError>;

    /// Whether the platform requires explicit dynamic receiver registration.
    ///
    /// Hosts on platform versions with manifest-declared receivers can return
    /// `false`; the session then skips
    /// [`register_receiver`](Self::register_receiver) and
    /// [`unregister_receiver`](Self::unregister_receiver) entirely.
    fn needs_receiver_registration(&self) -> bool {
        true
    }

    /// Register the broadcast receiver for the "message matched" signal.
    fn register_receiver(&self) -> Result<(), ReceiverError>;

    /// Unregister the broadcast receiver.
    ///
    /// Returning [`ReceiverError::NotRegistered`] is a tolerated, non-fatal
    /// condition.
    fn unregister_receiver(&self) -> Result<(), ReceiverError>;

    /// Present the consent prompt to the user, correlated by `token`.
    ///
    /// The host must report the user's decision back through
    /// [`SmsRetriever::handle_prompt_result`](crate::SmsRetriever::handle_prompt_result)
    /// with the same token.
    fn present_prompt(
        &self,
        prompt: Self::Prompt,
        token: CorrelationToken,
    ) -> Result<(), PromptError>;
}
