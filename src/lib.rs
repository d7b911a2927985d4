//! # SMS User Consent
//!
//! One-time SMS code retrieval over the platform's user-consent flow, without
//! blanket SMS-read access.
//!
//! The crate brokers the platform's consent primitive: it starts a bounded
//! listening session (optionally scoped to a sender), reacts to the system's
//! "message matched" broadcast, launches the user-consent prompt, captures
//! the approved message text, and extracts either a fixed-length numeric code
//! or the raw body. Each request is a single-shot async result; platform
//! specifics stay behind the [`ConsentHost`] trait, so the host glue (an
//! Android activity bridge, a test harness) supplies the OS pieces.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_user_consent::{SmsRetriever, SmsRetrieverTrait, SenderFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // `host` implements ConsentHost and forwards platform callbacks into
//!     // handle_consent_status / handle_prompt_result.
//!     let retriever = SmsRetriever::new(host);
//!
//!     // Wait for a 6-digit code from any sender.
//!     let code = retriever.retrieve_otp(6, None).await?;
//!     println!("Got code: {}", code);
//!
//!     // Or the full body, scoped to one sender.
//!     let sender = SenderFilter::new("+15551234567")?;
//!     let body = retriever.retrieve_message(Some(sender)).await?;
//!     println!("Got message: {}", body);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RetryableRetriever<R>   (optional re-listen wrapper)
//!         │
//!         ▼
//!   SmsRetriever<H>       (request controller: one request slot, settlement)
//!         │
//!         ▼
//!    ConsentHost          (trait: listening session, receiver, prompt UI)
//! ```
//!
//! Per request the session moves through
//! `Listening → PromptShown → Settled`, settling early on timeout, receiver
//! fault, or a missing prompt handler. The broadcast receiver registration is
//! released exactly once on every settlement path.
//!
//! ## Errors
//!
//! Every settlement failure is a [`ConsentError`] carrying a stable machine
//! code (`TIMEOUT`, `DENIED`, `REGEX_MISMATCH`, ...). Errors are terminal for
//! the request; re-listening is caller policy, packaged by
//! [`RetryableRetriever`].
//!
//! ## Features
//!
//! - `tracing` - tracing instrumentation (enabled by default)

pub mod errors;
pub mod platform;
pub mod retriever;
pub mod types;
pub mod utils;

// Re-export commonly used types at the crate root
pub use errors::RetryableError;
pub use platform::{ConsentHost, ConsentStatus, ListenError, PromptError, PromptResult, ReceiverError};
pub use retriever::{ConsentError, RetryableRetriever, SmsRetriever, SmsRetrieverTrait};
pub use types::{CorrelationToken, OtpCode, OtpLength, SenderFilter};
pub use utils::retry::RetryConfig;
