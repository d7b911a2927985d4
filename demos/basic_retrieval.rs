//! Basic retrieval example.
//!
//! Runs the consent flow against a simulated host: a matching message
//! "arrives", the user "approves" the prompt, and the caller receives the
//! extracted one-time code.
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic_retrieval
//! ```

use sms_user_consent::{
    ConsentHost, ConsentStatus, CorrelationToken, ListenError, PromptError, PromptResult,
    ReceiverError, SenderFilter, SmsRetriever, SmsRetrieverTrait,
};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the platform consent service and activity layer.
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

    fn start_listening(&self, sender: Option<&SenderFilter>) -> Result<(), ListenError> {
        println!("[platform] listening for messages (sender: {:?})", sender);
        Ok(())
    }

    fn register_receiver(&self) -> Result<(), ReceiverError> {
        println!("[platform] receiver registered");
        Ok(())
    }

    fn unregister_receiver(&self) -> Result<(), ReceiverError> {
        println!("[platform] receiver unregistered");
        Ok(())
    }

    fn present_prompt(
        &self,
        prompt: Self::Prompt,
        token: CorrelationToken,
    ) -> Result<(), PromptError> {
        println!("[platform] showing consent prompt {prompt:?} (token {token})");
        *self.last_token.lock().unwrap() = Some(token);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = SimulatedHost::new();
    let retriever = SmsRetriever::new(host.clone());

    // Simulate the platform callbacks: a matching SMS arrives and the user
    // approves sharing it.
    let platform = retriever.clone();
    let platform_host = host.clone();
    tokio::spawn(async move {
        while !platform.has_pending_request() {
            tokio::task::yield_now().await;
        }
        platform.handle_consent_status(ConsentStatus::MessageMatched("consent-intent".to_string()));
        platform.handle_prompt_result(
            platform_host.token(),
            PromptResult::Approved {
                message: Some("Your verification code is 482913, valid for 5 minutes".to_string()),
            },
        );
    });

    println!("Waiting for a 6-digit code...");
    let code = retriever.retrieve_otp(6, None).await?;
    println!("Received code: {code}");

    Ok(())
}
