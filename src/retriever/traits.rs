//! Retriever trait definition.

use super::error::ConsentError;
use crate::types::{OtpCode, SenderFilter};
use std::future::Future;

/// Trait for consent-based SMS retrieval implementations.
///
/// Implemented by [`SmsRetriever`](crate::SmsRetriever) and by wrappers such
/// as [`RetryableRetriever`](crate::RetryableRetriever), so retry policy can
/// be layered without changing call sites.
///
/// Each call owns the module's single request slot until it settles; issuing
/// a new request supersedes a pending one (the superseded caller's future
/// settles with [`ConsentError::Superseded`]).
pub trait SmsRetrieverTrait: Send + Sync {
    /// Retrieve a one-time code of exactly `otp_length` digits.
    ///
    /// Starts a listening session (optionally scoped to `sender`), waits for
    /// the user to approve sharing the matched message, and extracts the
    /// first maximal run of exactly `otp_length` digits from its body.
    ///
    /// # Arguments
    /// * `otp_length` - Number of digits in the expected code; must be positive
    /// * `sender` - Phone number the message must come from, if any
    fn retrieve_otp(
        &self,
        otp_length: u32,
        sender: Option<SenderFilter>,
    ) -> impl Future<Output = Result<OtpCode, ConsentError>> + Send;

    /// Retrieve the full body of the matched message, verbatim.
    ///
    /// # Arguments
    /// * `sender` - Phone number the message must come from, if any
    fn retrieve_message(
        &self,
        sender: Option<SenderFilter>,
    ) -> impl Future<Output = Result<String, ConsentError>> + Send;
}
