//! Error types for the timed job queue crate.

use thiserror::Error;

/// Errors that can occur when constructing a queue.
#[derive(Debug, Error)]
pub enum TimedQueueError {
    /// Queue requires a non-zero residency limit.
    #[error("Invalid configuration: max_queue_time must be greater than 0")]
    QueueTimeMustBePositive,

    /// A bounded queue requires room for at least one job.
    #[error("Invalid configuration: max_queue_size must be greater than 0")]
    QueueSizeMustBePositive,
}
