//! A bounded, in-memory FIFO queue for deferred jobs, with per-job residency
//! limits.
//!
//! This crate provides an in-process buffering primitive: callers push
//! callable units ("jobs") and later retrieve them in FIFO order. Two
//! protective limits are enforced, each reported through its own
//! notification channel:
//!
//! - **Residency**: a job left unretrieved for longer than `max_queue_time`
//!   is evicted and broadcast to the age-exceeded subscribers.
//! - **Capacity**: a push while the queue already holds `max_queue_size`
//!   jobs is refused and the job is broadcast to the capacity-exceeded
//!   subscribers instead.
//!
//! The queue never runs a job itself — jobs are only handed back, either to
//! the caller ([`TimedQueue::pull`] / [`TimedQueue::batch`]) or to
//! subscribers. There is no persistence, no worker pool, and no retry logic;
//! disposition of rejected and expired jobs is entirely the embedding
//! application's decision.
//!
//! # Architecture
//!
//! ```text
//!             push ──► ┌───────────────────┐ ──► pull / batch
//!                      │    TimedQueue     │
//!   admission refused ◄┤  (FIFO + timers)  ├► residency elapsed
//!           │          └───────────────────┘         │
//!           ▼                                        ▼
//!   capacity-exceeded                           age-exceeded
//!      subscribers                               subscribers
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use timed_job_queue::{Capacity, Job, TimedQueue};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), timed_job_queue::TimedQueueError> {
//!     let queue: TimedQueue<&'static str> = TimedQueue::builder()
//!         .max_queue_time(Duration::from_secs(30))
//!         .max_queue_size(Capacity::Bounded(128))
//!         .on_capacity_exceeded(|job| println!("rejected: {}", job.call()))
//!         .on_expired(|job| println!("expired: {}", job.call()))
//!         .build()?;
//!
//!     queue.push(Job::new(|| "hello")).await;
//!
//!     if let Some(job) = queue.pull().await {
//!         assert_eq!(job.call(), "hello");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod job;
mod notify;
mod queue;

pub use error::TimedQueueError;
pub use job::Job;
pub use queue::{Capacity, TimedQueue, TimedQueueBuilder};
