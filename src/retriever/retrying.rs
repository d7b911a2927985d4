//! Retrying retriever wrapper.

use super::error::ConsentError;
use super::traits::SmsRetrieverTrait;
use crate::errors::RetryableError;
use crate::types::{OtpCode, SenderFilter};
use crate::utils::retry::RetryConfig;
use backon::Retryable;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Callback type for retry notifications.
///
/// Invoked with the error that caused the retry and the delay until the next
/// attempt.
pub type OnRetryCallback = Arc<dyn Fn(&ConsentError, Duration) + Send + Sync>;

/// Wrapper that re-issues retrieval operations on operation-retryable errors.
///
/// Every consent error is terminal for its session, so each retry is a whole
/// fresh listening session. Attempts are gated on
/// [`RetryableError::should_retry_operation`]: a timeout or a message without
/// the expected code run triggers another session; a user denial does not.
/// This packages the re-listen loop callers would otherwise write by hand.
///
/// # Example
///
/// ```rust,ignore
/// use sms_user_consent::{RetryableRetriever, RetryConfig, SmsRetrieverTrait};
/// use std::time::Duration;
///
/// let retriever = RetryableRetriever::new(base_retriever)
///     .with_on_retry(|error, delay| {
///         println!("Re-listening in {:?} after: {}", delay, error);
///     });
///
/// // Re-listens automatically if the first message carries no 6-digit run.
/// let code = retriever.retrieve_otp(6, None).await?;
/// ```
pub struct RetryableRetriever<R> {
    inner: Arc<R>,
    retry_config: RetryConfig,
    on_retry: Option<OnRetryCallback>,
}

impl<R> Clone for RetryableRetriever<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            retry_config: self.retry_config.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<R: Debug> Debug for RetryableRetriever<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryableRetriever")
            .field("inner", &self.inner)
            .field("retry_config", &self.retry_config)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "..."))
            .finish()
    }
}

impl<R: SmsRetrieverTrait> RetryableRetriever<R> {
    /// Wrap a retriever with default retry logic.
    pub fn new(inner: R) -> Self {
        Self {
            inner: Arc::new(inner),
            retry_config: RetryConfig::default(),
            on_retry: None,
        }
    }

    /// Wrap a retriever with custom retry configuration.
    pub fn with_config(inner: R, retry_config: RetryConfig) -> Self {
        Self {
            inner: Arc::new(inner),
            retry_config,
            on_retry: None,
        }
    }

    /// Set a callback to be invoked on each retry attempt.
    pub fn with_on_retry<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ConsentError, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(callback));
        self
    }

    /// Get reference to the inner retriever.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Get reference to the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }
}

impl<R: SmsRetrieverTrait> SmsRetrieverTrait for RetryableRetriever<R> {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableRetriever::retrieve_otp",
            skip_all,
            fields(otp_length = otp_length)
        )
    )]
    async fn retrieve_otp(
        &self,
        otp_length: u32,
        sender: Option<SenderFilter>,
    ) -> Result<OtpCode, ConsentError> {
        let inner = Arc::clone(&self.inner);
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let sender = sender.clone();
            async move { inner.retrieve_otp(otp_length, sender).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &ConsentError| err.should_retry_operation())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            #[cfg(feature = "tracing")]
            debug!(
                error = %err,
                code = err.code(),
                retry_after_secs = %duration.as_secs_f64(),
                "Re-listening for one-time code"
            );
        })
        .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "RetryableRetriever::retrieve_message", skip_all)
    )]
    async fn retrieve_message(
        &self,
        sender: Option<SenderFilter>,
    ) -> Result<String, ConsentError> {
        let inner = Arc::clone(&self.inner);
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let sender = sender.clone();
            async move { inner.retrieve_message(sender).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &ConsentError| err.should_retry_operation())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            #[cfg(feature = "tracing")]
            debug!(
                error = %err,
                code = err.code(),
                retry_after_secs = %duration.as_secs_f64(),
                "Re-listening for full message"
            );
        })
        .await
    }
}
