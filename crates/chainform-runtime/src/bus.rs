#![forbid(unsafe_code)]

//! Typed broadcast bus for cross-field hand-off.
//!
//! Every field controller subscribes at construction. A published message is
//! fanned out to all live subscribers in subscription order; receivers decide
//! for themselves whether a message concerns them. Publishing only queues the
//! message, delivery happens when the owner drains the bus, so a publish from
//! inside a handler never re-enters another handler.
//!
//! # Invariants
//!
//! 1. Each drained message is delivered once to every subscriber that was
//!    live at drain time.
//! 2. Unsubscribed ids never receive deliveries.
//! 3. Subscription ids are never reused.

use std::collections::VecDeque;

use chainform_core::FieldId;

/// A unique identifier for a subscription.
pub type SubId = u64;

/// Broadcast when a jump animation finishes: "`successor`, take over".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrossFieldSignal {
    pub successor: FieldId,
}

impl CrossFieldSignal {
    #[inline]
    #[must_use]
    pub const fn new(successor: FieldId) -> Self {
        Self { successor }
    }

    /// Whether this signal names `field`.
    #[inline]
    #[must_use]
    pub fn is_for(&self, field: FieldId) -> bool {
        self.successor == field
    }
}

/// Fan-out publish/subscribe queue.
#[derive(Debug)]
pub struct Broadcast<T> {
    subscribers: Vec<SubId>,
    next_id: SubId,
    pending: VecDeque<T>,
    published: u64,
}

impl<T: Clone> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
            pending: VecDeque::new(),
            published: 0,
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> SubId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(id);
        tracing::trace!(target: "chainform.bus", sub_id = id, "subscribed");
        id
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|&s| s != id);
        let removed = self.subscribers.len() != before;
        if removed {
            tracing::trace!(target: "chainform.bus", sub_id = id, "unsubscribed");
        }
        removed
    }

    /// Queue a message for every subscriber.
    pub fn publish(&mut self, msg: T) {
        self.published += 1;
        self.pending.push_back(msg);
        tracing::trace!(
            target: "chainform.bus",
            pending = self.pending.len(),
            subscribers = self.subscribers.len(),
            "published"
        );
    }

    /// Take all queued messages, fanned out as `(subscriber, message)` pairs.
    ///
    /// Messages keep publish order; within a message, subscribers keep
    /// subscription order.
    pub fn drain(&mut self) -> Vec<(SubId, T)> {
        let mut out = Vec::with_capacity(self.pending.len() * self.subscribers.len());
        while let Some(msg) = self.pending.pop_front() {
            for &sub in &self.subscribers {
                out.push((sub, msg.clone()));
            }
        }
        out
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_subscribed(&self, id: SubId) -> bool {
        self.subscribers.contains(&id)
    }

    /// Messages waiting to be drained.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total messages ever published.
    #[inline]
    pub fn published_total(&self) -> u64 {
        self.published
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}
