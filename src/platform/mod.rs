//! Host platform abstraction for the consent flow.

pub(crate) mod events;
pub(crate) mod traits;

pub use events::{ConsentStatus, ListenError, PromptError, PromptResult, ReceiverError};
pub use traits::ConsentHost;
