//! Subscriber lists for the queue's outbound notification channels.
//!
//! Each channel owns an ordered list of subscribers. Notifications are
//! broadcast: every subscriber is invoked, in subscription order, with its
//! own handle to the job. The queue never inspects what a subscriber does
//! with it.

use std::sync::Arc;

use crate::Job;

/// A registered notification callback.
pub(crate) type Subscriber<T> = Arc<dyn Fn(Job<T>) + Send + Sync + 'static>;

/// Ordered collection of subscribers for one notification channel.
pub(crate) struct SubscriberList<T> {
    entries: Vec<Subscriber<T>>,
}

impl<T> SubscriberList<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one subscriber. Invocation order follows subscription order.
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber<T>) {
        self.entries.push(subscriber);
    }

    /// Clone out the current subscribers so they can be invoked after the
    /// queue lock has been released.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.entries.clone()
    }
}

/// Invoke every subscriber in order, each with its own handle to the job.
pub(crate) fn broadcast<T>(subscribers: &[Subscriber<T>], job: &Job<T>) {
    for subscriber in subscribers {
        subscriber(job.clone());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn broadcast_runs_subscribers_in_subscription_order() {
        let order: Arc<Mutex<Vec<&str>>> = Arc::new(Mutex::new(Vec::new()));
        let mut list: SubscriberList<u32> = SubscriberList::new();

        let seen = order.clone();
        list.subscribe(Arc::new(move |_| seen.lock().unwrap().push("first")));
        let seen = order.clone();
        list.subscribe(Arc::new(move |_| seen.lock().unwrap().push("second")));

        broadcast(&list.snapshot(), &Job::new(|| 0));

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn broadcast_hands_every_subscriber_the_same_job() {
        let values: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let mut list: SubscriberList<u32> = SubscriberList::new();

        for _ in 0..3 {
            let seen = values.clone();
            list.subscribe(Arc::new(move |job: Job<u32>| {
                seen.lock().unwrap().push(job.call());
            }));
        }

        broadcast(&list.snapshot(), &Job::new(|| 42));

        assert_eq!(*values.lock().unwrap(), vec![42, 42, 42]);
    }

    #[test]
    fn empty_list_broadcasts_to_nobody() {
        let list: SubscriberList<u32> = SubscriberList::new();
        broadcast(&list.snapshot(), &Job::new(|| 0));
    }
}
