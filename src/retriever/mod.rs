//! Consent retrieval core: request controller, session state machine, retry
//! wrapper.

pub(crate) mod error;
pub(crate) mod retrying;
pub(crate) mod session;
pub(crate) mod structure;
pub(crate) mod traits;

pub use error::ConsentError;
pub use retrying::{OnRetryCallback, RetryableRetriever};
pub use structure::SmsRetriever;
pub use traits::SmsRetrieverTrait;
