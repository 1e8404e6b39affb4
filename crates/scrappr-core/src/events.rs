//! Live snapshot subscriptions.
//!
//! Store subscriptions deliver complete snapshots (the full ordered note
//! list, or the full tag index) over a `tokio::sync::broadcast` channel.
//! Each subscriber gets its own independent stream; slow receivers that
//! fall behind skip straight to the most recent snapshots. Every snapshot
//! is complete state, so missed intermediates carry no information.
//!
//! Teardown is deterministic: dropping or [`Subscription::unsubscribe`]-ing
//! releases the receiver, after which the publisher observes one fewer
//! subscriber and nothing further is delivered.

use std::collections::BTreeSet;

use tokio::sync::broadcast;

use crate::models::Note;

/// A live sequence of snapshots of type `T`.
///
/// The first [`recv`](Subscription::recv) yields the initial snapshot
/// captured at subscribe time; each subsequent `recv` suspends until the
/// next published snapshot. `None` means the publisher side is gone and
/// the sequence has ended; the caller's last snapshot remains its working
/// state.
pub struct Subscription<T> {
    initial: Option<T>,
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Create a subscription delivering `initial` first, then everything
    /// published on `rx`.
    pub fn new(initial: T, rx: broadcast::Receiver<T>) -> Self {
        Self {
            initial: Some(initial),
            rx,
        }
    }

    /// Receive the next snapshot.
    ///
    /// Lagging skips forward to the oldest retained snapshot rather than
    /// failing; `None` only when the publisher has shut down.
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(first) = self.initial.take() {
            return Some(first);
        }
        loop {
            match self.rx.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscription lagged; resuming at latest snapshot");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Tear down the subscription, releasing all listener resources.
    ///
    /// Nothing is delivered after this returns. Dropping the subscription
    /// is equivalent; this form exists so call sites read as an explicit
    /// lifecycle step.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

/// Live ordered note-list snapshots for one owner.
pub type NoteSubscription = Subscription<Vec<Note>>;

/// Live tag-index snapshots for one owner.
pub type TagSubscription = Subscription<BTreeSet<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_snapshot_delivered_first() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(vec![1, 2], rx);
        tx.send(vec![3]).unwrap();

        assert_eq!(sub.recv().await, Some(vec![1, 2]));
        assert_eq!(sub.recv().await, Some(vec![3]));
    }

    #[tokio::test]
    async fn test_recv_returns_none_after_publisher_drops() {
        let (tx, rx) = broadcast::channel::<Vec<i32>>(8);
        let mut sub = Subscription::new(vec![], rx);
        assert_eq!(sub.recv().await, Some(vec![]));

        drop(tx);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_lagged_receiver_skips_to_latest() {
        let (tx, rx) = broadcast::channel(2);
        let mut sub = Subscription::new(0, rx);
        assert_eq!(sub.recv().await, Some(0));

        for i in 1..=5 {
            tx.send(i).unwrap();
        }
        // Buffer holds only the last two; recv resumes there instead of failing.
        assert_eq!(sub.recv().await, Some(4));
        assert_eq!(sub.recv().await, Some(5));
    }

    #[tokio::test]
    async fn test_unsubscribe_releases_receiver() {
        let (tx, rx) = broadcast::channel::<i32>(8);
        let sub = Subscription::new(0, rx);
        assert_eq!(tx.receiver_count(), 1);

        sub.unsubscribe();
        assert_eq!(tx.receiver_count(), 0);
    }
}
