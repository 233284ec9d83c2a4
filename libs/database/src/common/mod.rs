pub mod error;
pub mod retry;
pub mod timestamp;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry, retry_with_backoff};
