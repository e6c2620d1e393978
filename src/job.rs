//! Job handle stored by the queue.

use std::fmt;
use std::sync::Arc;

/// A deferred unit of work: a callable producing a value of type `T`.
///
/// The queue only buffers jobs — it never invokes them. A job leaves the
/// queue either through [`pull`]/[`batch`] (handed back to the caller) or
/// through one of the notification channels (handed to subscribers), and in
/// every case it is the receiver that decides whether to [`call`] it.
///
/// # Cloning
///
/// `Clone` is implemented manually to avoid requiring `T: Clone`.
/// Cloning is cheap and yields a second handle to the **same** underlying
/// callable, which is how a single job can be broadcast to several
/// subscribers.
///
/// # Example
///
/// ```rust
/// use timed_job_queue::Job;
///
/// let job = Job::new(|| 2 + 2);
/// assert_eq!(job.call(), 4);
/// ```
///
/// [`pull`]: crate::TimedQueue::pull
/// [`batch`]: crate::TimedQueue::batch
/// [`call`]: Job::call
pub struct Job<T> {
    callable: Arc<dyn Fn() -> T + Send + Sync + 'static>,
}

impl<T> Job<T> {
    /// Wrap a callable into a job handle.
    pub fn new<F>(callable: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            callable: Arc::new(callable),
        }
    }

    /// Invoke the underlying callable.
    #[must_use = "calling a job produces its value, it doesn't consume the job"]
    pub fn call(&self) -> T {
        (self.callable)()
    }
}

impl<T> Clone for Job<T> {
    fn clone(&self) -> Self {
        Self {
            callable: Arc::clone(&self.callable),
        }
    }
}

impl<T> fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
