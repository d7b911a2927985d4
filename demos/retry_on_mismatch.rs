//! Re-listen on code mismatch.
//!
//! The first consented message carries no run of the requested length, so the
//! request fails with `REGEX_MISMATCH`; the retry wrapper starts a fresh
//! listening session and the second message succeeds. This is the packaged
//! form of the re-listen loop a caller would otherwise write by hand.
//!
//! # Running
//!
//! ```bash
//! cargo run --example retry_on_mismatch
//! ```

use sms_user_consent::{
    ConsentHost, ConsentStatus, CorrelationToken, ListenError, PromptError, PromptResult,
    ReceiverError, RetryConfig, RetryableRetriever, SenderFilter, SmsRetriever,
    SmsRetrieverTrait,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct SimulatedHost {
    last_token: Arc<Mutex<Option<CorrelationToken>>>,
}

impl SimulatedHost {
    fn new() -> Self {
        Self {
            last_token: Arc::new(Mutex::new(None)),
        }
    }

    fn token(&self) -> CorrelationToken {
        self.last_token.lock().unwrap().expect("no prompt shown yet")
    }
}

impl ConsentHost for SimulatedHost {
    type Prompt = String;

    fn start_listening(&self, _sender: Option<&SenderFilter>) -> Result<(), ListenError> {
        println!("[platform] listening session started");
        Ok(())
    }

    fn register_receiver(&self) -> Result<(), ReceiverError> {
        Ok(())
    }

    fn unregister_receiver(&self) -> Result<(), ReceiverError> {
        Ok(())
    }

    fn present_prompt(
        &self,
        _prompt: Self::Prompt,
        token: CorrelationToken,
    ) -> Result<(), PromptError> {
        *self.last_token.lock().unwrap() = Some(token);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = SimulatedHost::new();
    let base = SmsRetriever::new(host.clone());

    // One consented message per listening session.
    let bodies = [
        "Welcome back! Nothing to verify here.",
        "Your verification code is 271828",
    ];
    let platform = base.clone();
    let platform_host = host.clone();
    tokio::spawn(async move {
        for body in bodies {
            while !platform.has_pending_request() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            platform
                .handle_consent_status(ConsentStatus::MessageMatched("consent-intent".to_string()));
            platform.handle_prompt_result(
                platform_host.token(),
                PromptResult::Approved {
                    message: Some(body.to_string()),
                },
            );
        }
    });

    let config = RetryConfig::default().with_min_delay(Duration::from_millis(10));
    let retriever = RetryableRetriever::with_config(base, config)
        .with_on_retry(|error, delay| println!("[caller] {error}; re-listening in {delay:?}"));

    let code = retriever.retrieve_otp(6, None).await?;
    println!("Received code: {code}");

    Ok(())
}
