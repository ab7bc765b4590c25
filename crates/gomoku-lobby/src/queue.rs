//! The FIFO waiting queue behind one matchmaking tier.

use std::collections::VecDeque;

use gomoku_protocol::UserId;
use tokio::sync::{Mutex, Notify};

/// An unbounded FIFO of waiting players, with a wakeup for the tier worker.
///
/// The worker parks in [`wait`](Self::wait) while fewer than two players
/// are queued; every [`push`](Self::push) wakes it. `Notify` keeps a
/// permit when nobody is parked, so a push that lands between the worker's
/// length check and its wait is never lost.
pub struct MatchQueue {
    list: Mutex<VecDeque<UserId>>,
    ready: Notify,
}

impl MatchQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            list: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
        }
    }

    /// Number of players currently waiting.
    pub async fn len(&self) -> usize {
        self.list.lock().await.len()
    }

    /// Returns `true` if nobody is waiting.
    pub async fn is_empty(&self) -> bool {
        self.list.lock().await.is_empty()
    }

    /// Appends a player and wakes the tier worker.
    pub async fn push(&self, uid: UserId) {
        self.list.lock().await.push_back(uid);
        self.ready.notify_one();
    }

    /// Removes and returns the oldest waiter, if any.
    pub async fn pop(&self) -> Option<UserId> {
        self.list.lock().await.pop_front()
    }

    /// Removes every occurrence of `uid`. Idempotent if absent.
    pub async fn remove(&self, uid: UserId) {
        self.list.lock().await.retain(|u| *u != uid);
    }

    /// Parks the caller until the next push (or a stored permit).
    pub async fn wait(&self) {
        self.ready.notified().await;
    }
}

impl Default for MatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_pop_is_fifo() {
        let queue = MatchQueue::new();

        queue.push(UserId(1)).await;
        queue.push(UserId(2)).await;
        queue.push(UserId(3)).await;

        assert_eq!(queue.pop().await, Some(UserId(1)));
        assert_eq!(queue.pop().await, Some(UserId(2)));
        assert_eq!(queue.pop().await, Some(UserId(3)));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn test_remove_deletes_from_middle() {
        let queue = MatchQueue::new();
        queue.push(UserId(1)).await;
        queue.push(UserId(2)).await;
        queue.push(UserId(3)).await;

        queue.remove(UserId(2)).await;

        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.pop().await, Some(UserId(1)));
        assert_eq!(queue.pop().await, Some(UserId(3)));
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let queue = MatchQueue::new();
        queue.push(UserId(1)).await;

        queue.remove(UserId(9)).await;

        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn test_push_before_wait_leaves_a_permit() {
        // A push with no parked waiter must not be lost: the next wait
        // returns immediately via the stored permit.
        let queue = MatchQueue::new();
        queue.push(UserId(1)).await;

        tokio::time::timeout(std::time::Duration::from_millis(100), queue.wait())
            .await
            .expect("wait should complete from the stored permit");
    }
}
