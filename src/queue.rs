//! Timed, bounded FIFO queue implementation.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::notify::{broadcast, SubscriberList};
use crate::{Job, TimedQueueError};

/// Maximum number of jobs the queue may hold at once.
///
/// `Bounded(n)` refuses admission once `n` jobs are resident; `Unbounded`
/// never refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many jobs may be queued concurrently. Must be non-zero.
    Bounded(usize),
    /// No capacity limit.
    Unbounded,
}

impl Capacity {
    /// Returns true when this capacity never refuses admission.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Capacity::Unbounded)
    }

    fn admits(&self, len: usize) -> bool {
        match *self {
            Capacity::Unbounded => true,
            Capacity::Bounded(max) => len < max,
        }
    }
}

/// One admitted job plus the timer that will expire it.
struct QueueItem<T> {
    id: u64,
    expiry: JoinHandle<()>,
    job: Job<T>,
}

struct Inner<T> {
    items: VecDeque<QueueItem<T>>,
    next_id: u64,
    on_overflow: SubscriberList<T>,
    on_expired: SubscriberList<T>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        // A pending timer must not outlive the queue that scheduled it.
        for item in &self.items {
            item.expiry.abort();
        }
    }
}

struct Shared<T> {
    max_queue_time: Duration,
    max_queue_size: Capacity,
    inner: Mutex<Inner<T>>,
}

/// A bounded, in-memory FIFO queue that expires jobs left unretrieved for
/// too long.
///
/// Jobs are admitted by [`push`], retrieved in FIFO order by [`pull`] or
/// [`batch`], and are subject to two protective limits fixed at
/// construction:
///
/// - a job resident longer than `max_queue_time` is removed and broadcast on
///   the age-exceeded channel;
/// - a push while `max_queue_size` jobs are resident is refused and the job
///   is broadcast on the capacity-exceeded channel instead.
///
/// The queue never runs a job itself.
///
/// # Cloning
///
/// `Clone` is implemented manually to avoid requiring `T: Clone`.
/// Cloning creates a new handle to the **same** underlying queue.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use timed_job_queue::{Capacity, Job, TimedQueue};
///
/// #[tokio::main]
/// async fn main() -> Result<(), timed_job_queue::TimedQueueError> {
///     let queue: TimedQueue<u32> = TimedQueue::builder()
///         .max_queue_time(Duration::from_secs(30))
///         .max_queue_size(Capacity::Bounded(128))
///         .on_expired(|job| println!("expired before retrieval: {}", job.call()))
///         .build()?;
///
///     queue.push(Job::new(|| 7)).await;
///
///     if let Some(job) = queue.pull().await {
///         assert_eq!(job.call(), 7);
///     }
///     Ok(())
/// }
/// ```
pub struct TimedQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for TimedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: 'static> TimedQueue<T> {
    /// Create a queue with the given residency limit and capacity.
    ///
    /// # Errors
    ///
    /// Returns [`TimedQueueError::QueueTimeMustBePositive`] if
    /// `max_queue_time` is zero, and
    /// [`TimedQueueError::QueueSizeMustBePositive`] if `max_queue_size` is
    /// `Bounded(0)`.
    pub fn new(
        max_queue_time: Duration,
        max_queue_size: Capacity,
    ) -> Result<Self, TimedQueueError> {
        Self::builder()
            .max_queue_time(max_queue_time)
            .max_queue_size(max_queue_size)
            .build()
    }

    /// Start building a queue.
    #[must_use]
    pub fn builder() -> TimedQueueBuilder<T> {
        TimedQueueBuilder::default()
    }

    /// Whether a push issued now would be admitted.
    ///
    /// Pure query; [`push`] performs the same check itself, so consulting
    /// this first is optional.
    ///
    /// [`push`]: TimedQueue::push
    #[must_use = "this returns the admission decision, it doesn't modify the queue"]
    pub async fn admission_allowed(&self) -> bool {
        let inner = self.shared.inner.lock().await;
        self.shared.max_queue_size.admits(inner.items.len())
    }

    /// Admit a job, or reject it when the queue is at capacity.
    ///
    /// On admission the job is appended behind all currently queued jobs and
    /// a one-shot expiry timer for `max_queue_time` starts. On rejection the
    /// job is broadcast to the capacity-exceeded subscribers before this
    /// method returns; it is never queued and no timer is started for it.
    pub async fn push(&self, job: Job<T>) {
        let mut inner = self.shared.inner.lock().await;
        if !self.shared.max_queue_size.admits(inner.items.len()) {
            let subscribers = inner.on_overflow.snapshot();
            drop(inner);
            debug!("queue at capacity, rejecting job");
            broadcast(&subscribers, &job);
            return;
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let expiry = spawn_expiry(&self.shared, id);
        inner.items.push_back(QueueItem { id, expiry, job });
        debug!(id, len = inner.items.len(), "job enqueued");
    }

    /// Remove and return the oldest queued job.
    ///
    /// Returns `None` when the queue is empty. Retrieval cancels the job's
    /// pending expiry timer, so a pulled job can never also be reported as
    /// expired.
    pub async fn pull(&self) -> Option<Job<T>> {
        let mut inner = self.shared.inner.lock().await;
        let item = inner.items.pop_front()?;
        item.expiry.abort();
        debug!(id = item.id, len = inner.items.len(), "job pulled");
        Some(item.job)
    }

    /// Remove and return every queued job, oldest first.
    ///
    /// Returns `None` when the queue was already empty.
    pub async fn batch(&self) -> Option<Vec<Job<T>>> {
        let mut jobs = Vec::new();
        while let Some(job) = self.pull().await {
            jobs.push(job);
        }
        if jobs.is_empty() {
            None
        } else {
            Some(jobs)
        }
    }

    /// Get the number of jobs currently queued.
    #[must_use = "this returns the count, it doesn't modify the queue"]
    pub async fn len(&self) -> usize {
        self.shared.inner.lock().await.items.len()
    }

    /// Check if the queue is empty.
    #[must_use = "this returns a boolean, it doesn't modify the queue"]
    pub async fn is_empty(&self) -> bool {
        self.shared.inner.lock().await.items.is_empty()
    }

    /// Check if at least one job is queued. Always the complement of
    /// [`is_empty`](TimedQueue::is_empty).
    #[must_use = "this returns a boolean, it doesn't modify the queue"]
    pub async fn has_jobs(&self) -> bool {
        !self.is_empty().await
    }

    /// The residency limit fixed at construction.
    #[must_use]
    pub fn max_queue_time(&self) -> Duration {
        self.shared.max_queue_time
    }

    /// The capacity fixed at construction.
    #[must_use]
    pub fn max_queue_size(&self) -> Capacity {
        self.shared.max_queue_size
    }

    /// Subscribe to jobs rejected at admission.
    ///
    /// Subscribers registered through the builder run first, then runtime
    /// registrations in call order.
    pub async fn on_capacity_exceeded<F>(&self, subscriber: F)
    where
        F: Fn(Job<T>) + Send + Sync + 'static,
    {
        let mut inner = self.shared.inner.lock().await;
        inner.on_overflow.subscribe(Arc::new(subscriber));
    }

    /// Subscribe to jobs that expired before retrieval.
    ///
    /// Subscribers registered through the builder run first, then runtime
    /// registrations in call order.
    pub async fn on_expired<F>(&self, subscriber: F)
    where
        F: Fn(Job<T>) + Send + Sync + 'static,
    {
        let mut inner = self.shared.inner.lock().await;
        inner.on_expired.subscribe(Arc::new(subscriber));
    }
}

/// Spawn the one-shot expiry timer for a newly admitted item.
///
/// The task holds only a `Weak` reference to the queue state, so timers never
/// keep a dropped queue alive. The body re-checks presence by id under the
/// lock: if the item was pulled in the meantime the timer is a no-op, even
/// when the abort raced an already-elapsed sleep.
fn spawn_expiry<T: 'static>(shared: &Arc<Shared<T>>, id: u64) -> JoinHandle<()> {
    let deadline = shared.max_queue_time;
    let weak = Arc::downgrade(shared);
    tokio::spawn(async move {
        tokio::time::sleep(deadline).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut inner = shared.inner.lock().await;
        let Some(index) = inner.items.iter().position(|item| item.id == id) else {
            return;
        };
        let Some(item) = inner.items.remove(index) else {
            return;
        };
        let subscribers = inner.on_expired.snapshot();
        drop(inner);
        debug!(id, "job expired before retrieval");
        broadcast(&subscribers, &item.job);
    })
}

/// Builder for [`TimedQueue`].
///
/// `max_queue_time` has no default and must be set to a non-zero duration;
/// `max_queue_size` defaults to [`Capacity::Unbounded`]. Notification
/// subscribers may be registered up front so that no event is missed between
/// construction and a later subscription.
pub struct TimedQueueBuilder<T> {
    max_queue_time: Duration,
    max_queue_size: Capacity,
    on_overflow: SubscriberList<T>,
    on_expired: SubscriberList<T>,
}

impl<T> Default for TimedQueueBuilder<T> {
    fn default() -> Self {
        Self {
            max_queue_time: Duration::ZERO,
            max_queue_size: Capacity::Unbounded,
            on_overflow: SubscriberList::new(),
            on_expired: SubscriberList::new(),
        }
    }
}

impl<T: 'static> TimedQueueBuilder<T> {
    /// How long a job may stay queued before it is expired.
    #[must_use]
    pub fn max_queue_time(mut self, max_queue_time: Duration) -> Self {
        self.max_queue_time = max_queue_time;
        self
    }

    /// How many jobs may be queued concurrently.
    #[must_use]
    pub fn max_queue_size(mut self, max_queue_size: Capacity) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Register a subscriber for jobs rejected at admission.
    #[must_use]
    pub fn on_capacity_exceeded<F>(mut self, subscriber: F) -> Self
    where
        F: Fn(Job<T>) + Send + Sync + 'static,
    {
        self.on_overflow.subscribe(Arc::new(subscriber));
        self
    }

    /// Register a subscriber for jobs that expired before retrieval.
    #[must_use]
    pub fn on_expired<F>(mut self, subscriber: F) -> Self
    where
        F: Fn(Job<T>) + Send + Sync + 'static,
    {
        self.on_expired.subscribe(Arc::new(subscriber));
        self
    }

    /// Validate the configuration and create the queue.
    ///
    /// # Errors
    ///
    /// Returns [`TimedQueueError::QueueTimeMustBePositive`] if
    /// `max_queue_time` was left unset or set to zero, and
    /// [`TimedQueueError::QueueSizeMustBePositive`] for a `Bounded(0)`
    /// capacity.
    pub fn build(self) -> Result<TimedQueue<T>, TimedQueueError> {
        if self.max_queue_time.is_zero() {
            return Err(TimedQueueError::QueueTimeMustBePositive);
        }
        if let Capacity::Bounded(0) = self.max_queue_size {
            return Err(TimedQueueError::QueueSizeMustBePositive);
        }

        Ok(TimedQueue {
            shared: Arc::new(Shared {
                max_queue_time: self.max_queue_time,
                max_queue_size: self.max_queue_size,
                inner: Mutex::new(Inner {
                    items: VecDeque::new(),
                    next_id: 0,
                    on_overflow: self.on_overflow,
                    on_expired: self.on_expired,
                }),
            }),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
