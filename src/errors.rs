//! Error classification traits for consent retrieval operations.

/// Trait for errors that can be classified as retryable or permanent.
///
/// Consent retrieval has two levels of retryability:
///
/// 1. **Session-level** (`is_retryable`): whether the same listening session
///    could still produce a result. Every settlement of a consent session is
///    terminal, so this is almost always `false`.
///
/// 2. **Operation-level** (`should_retry_operation`): whether starting a fresh
///    listening session might succeed. A timeout or a message that did not
///    carry the expected code are good candidates; a user who explicitly
///    declined the prompt is not.
///
/// # Examples
///
/// ```rust
/// use sms_user_consent::RetryableError;
///
/// enum MyError {
///     WindowElapsed,   // A fresh session might catch the next message
///     UserDeclined,    // Asking again right away would be hostile
/// }
///
/// impl RetryableError for MyError {
///     fn is_retryable(&self) -> bool {
///         false // settlements are terminal for the session
///     }
///
///     fn should_retry_operation(&self) -> bool {
///         match self {
///             MyError::WindowElapsed => true,
///             MyError::UserDeclined => false,
///         }
///     }
/// }
/// ```
pub trait RetryableError {
    /// Returns true if this error represents a transient failure
    /// that might succeed on retry within the same session.
    fn is_retryable(&self) -> bool;

    /// Returns true if a fresh operation (a new listening session) might
    /// succeed.
    ///
    /// Default implementation returns the same as `is_retryable()`.
    fn should_retry_operation(&self) -> bool {
        self.is_retryable()
    }
}
