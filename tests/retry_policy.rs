//! Tests for the re-listen retry wrapper.

use sms_user_consent::{
    ConsentError, OtpCode, RetryConfig, RetryableRetriever, SenderFilter, SmsRetrieverTrait,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Retriever stub that replays a script of settlements.
#[derive(Clone)]
struct ScriptedRetriever {
    outcomes: Arc<Mutex<VecDeque<Result<String, ConsentError>>>>,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedRetriever {
    fn new(outcomes: Vec<Result<String, ConsentError>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn next(&self) -> Result<String, ConsentError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SmsRetrieverTrait for ScriptedRetriever {
    async fn retrieve_otp(
        &self,
        _otp_length: u32,
        _sender: Option<SenderFilter>,
    ) -> Result<OtpCode, ConsentError> {
        self.next().map(OtpCode::new)
    }

    async fn retrieve_message(
        &self,
        _sender: Option<SenderFilter>,
    ) -> Result<String, ConsentError> {
        self.next()
    }
}

fn fast_config() -> RetryConfig {
    RetryConfig::default()
        .with_min_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(2))
        .with_max_retries(3)
}

#[tokio::test]
async fn timeout_triggers_a_fresh_session() {
    let inner = ScriptedRetriever::new(vec![Err(ConsentError::Timeout), Ok("123456".into())]);
    let retriever = RetryableRetriever::with_config(inner.clone(), fast_config());

    let code = retriever.retrieve_otp(6, None).await.unwrap();
    assert_eq!(code.as_str(), "123456");
    assert_eq!(inner.attempts(), 2);
}

#[tokio::test]
async fn regex_mismatch_triggers_a_fresh_session() {
    let inner = ScriptedRetriever::new(vec![
        Err(ConsentError::RegexMismatch { expected: 6 }),
        Err(ConsentError::NullMessage),
        Ok("654321".into()),
    ]);
    let retriever = RetryableRetriever::with_config(inner.clone(), fast_config());

    let code = retriever.retrieve_otp(6, None).await.unwrap();
    assert_eq!(code.as_str(), "654321");
    assert_eq!(inner.attempts(), 3);
}

#[tokio::test]
async fn denial_is_not_retried() {
    let inner = ScriptedRetriever::new(vec![Err(ConsentError::Denied)]);
    let retriever = RetryableRetriever::with_config(inner.clone(), fast_config());

    let err = retriever.retrieve_otp(6, None).await.unwrap_err();
    assert!(matches!(err, ConsentError::Denied));
    assert_eq!(inner.attempts(), 1);
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let inner = ScriptedRetriever::new(vec![
        Err(ConsentError::Timeout),
        Err(ConsentError::Timeout),
        Err(ConsentError::Timeout),
    ]);
    let config = fast_config().with_max_retries(2);
    let retriever = RetryableRetriever::with_config(inner.clone(), config);

    let err = retriever.retrieve_message(None).await.unwrap_err();
    assert!(matches!(err, ConsentError::Timeout));
    assert_eq!(inner.attempts(), 3);
}

#[tokio::test]
async fn on_retry_callback_observes_each_attempt() {
    let inner = ScriptedRetriever::new(vec![Err(ConsentError::Timeout), Ok("Hello".into())]);
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_callback = Arc::clone(&seen);
    let retriever = RetryableRetriever::with_config(inner, fast_config()).with_on_retry(
        move |error, _delay| {
            assert!(matches!(error, ConsentError::Timeout));
            seen_in_callback.fetch_add(1, Ordering::SeqCst);
        },
    );

    let body = retriever.retrieve_message(None).await.unwrap();
    assert_eq!(body, "Hello");
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}
