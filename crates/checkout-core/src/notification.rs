//! # Notification Queue
//!
//! Transient toast messages ("Added: Fresh Milk 1L") shown over the cart.
//!
//! ```text
//!   push("Added: Tomatoes", t)          newest ─► [#7 Tomatoes]
//!                                                 [#6 Red Apples]
//!   at most NOTIFICATION_CAPACITY kept            [#5 Fresh Milk 1L]
//!   prune(now) drops now - created >= ttl         ...
//! ```
//!
//! A message equal to the newest live toast is not shown twice.
//! The queue never reads a clock; callers pass `now`.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::{DEFAULT_NOTIFICATION_TTL_MS, NOTIFICATION_CAPACITY};

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonically increasing within one queue.
    pub id: u64,
    pub message: String,
    pub created_at: Instant,
}

/// Bounded newest-first toast queue.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    capacity: usize,
    ttl: Duration,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        NotificationQueue {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            ttl,
            next_id: 1,
        }
    }

    /// Adds a toast at the front, evicting the oldest beyond capacity.
    ///
    /// Returns the new notification's id, or `None` when the newest live
    /// toast already shows the same message.
    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> Option<u64> {
        let message = message.into();
        if let Some(newest) = self.entries.front() {
            let live = now.saturating_duration_since(newest.created_at) < self.ttl;
            if live && newest.message == message {
                return None;
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(Notification {
            id,
            message,
            created_at: now,
        });
        self.entries.truncate(self.capacity);
        Some(id)
    }

    /// Drops every toast at least `ttl` old. Returns how many were dropped.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
        before - self.entries.len()
    }

    /// Live toasts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Live toast texts, newest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|n| n.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        NotificationQueue::new(
            NOTIFICATION_CAPACITY,
            Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_newest_first() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        queue.push("Added: A", t0);
        queue.push("Added: B", t0);

        assert_eq!(queue.messages(), vec!["Added: B", "Added: A"]);
    }

    #[test]
    fn test_capacity_keeps_five_most_recent() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        for i in 0..7 {
            queue.push(format!("n{}", i), t0);
        }

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.messages(), vec!["n6", "n5", "n4", "n3", "n2"]);
    }

    #[test]
    fn test_ids_increase() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        let a = queue.push("a", t0).unwrap();
        let b = queue.push("b", t0).unwrap();
        assert!(b > a);

        let ids: Vec<u64> = queue.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_repeat_of_newest_is_skipped() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        assert!(queue.push("Added: Eggs", t0).is_some());
        assert!(queue.push("Added: Eggs", t0 + Duration::from_millis(300)).is_none());
        assert_eq!(queue.messages(), vec!["Added: Eggs"]);

        // only the newest entry is compared
        queue.push("Added: Milk", t0);
        assert!(queue.push("Added: Eggs", t0).is_some());
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_repeat_after_expiry_is_shown() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        queue.push("Added: Eggs", t0);
        // not pruned yet, but already past its ttl
        assert!(queue.push("Added: Eggs", t0 + Duration::from_millis(2000)).is_some());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_prune_drops_expired() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::default();

        queue.push("old", t0);
        queue.push("new", t0 + Duration::from_millis(1500));

        assert_eq!(queue.prune(t0 + Duration::from_millis(1999)), 0);
        // exactly ttl old counts as expired
        assert_eq!(queue.prune(t0 + Duration::from_millis(2000)), 1);
        assert_eq!(queue.messages(), vec!["new"]);

        queue.prune(t0 + Duration::from_millis(3500));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_custom_ttl() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new(2, Duration::from_millis(100));
        queue.push("x", t0);

        queue.prune(t0 + Duration::from_millis(100));

        assert!(queue.is_empty());
        assert_eq!(queue.ttl(), Duration::from_millis(100));
    }
}
