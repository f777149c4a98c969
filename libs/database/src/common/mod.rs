//! Cross-cutting database utilities.

mod retry;

pub use retry::{retry, retry_with_backoff, RetryConfig};
