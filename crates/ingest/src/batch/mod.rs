//! Batched submission with periodic flush and retry.

pub mod batcher;
pub mod retry;

pub use batcher::{BatchReport, BatchSink, BatchSubmitter};
pub use retry::RetryPolicy;
