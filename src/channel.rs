//! Synchronous 1:N notification channels.
//!
//! A [`Channel`] is an ordered list of callbacks for one event kind. Publishing invokes every
//! callback present at the moment of the publish, on the calling thread, in subscription order.
//!
//! # Publish semantics
//!
//! The subscriber list is snapshotted before the first callback runs:
//! - a subscription removed during a publish still receives that publish
//! - a subscription added during a publish first receives the next one
//! - a callback that publishes on its own channel again is skipped by the nested publish
//!
//! `Channel` is a handle: clones share one subscriber list, so a listener can keep a clone and
//! unsubscribe later, including from inside its own callback.

use std::cell::RefCell;
use std::rc::Rc;

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

/// Handle returned by [`Channel::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

struct Subscribers<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<E>)>,
}

pub struct Channel<E> {
    name: &'static str,
    subscribers: Rc<RefCell<Subscribers<E>>>,
}

impl<E: 'static> Channel<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Appends a callback. Every call creates an independent subscription, so registering
    /// the same logic twice means it runs twice per publish.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let callback: Callback<E> = Rc::new(RefCell::new(callback));
        let mut subscribers = self.subscribers.borrow_mut();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.entries.push((id, callback));
        log::trace!("{}: added {}", self.name, id);
        id
    }

    /// Removes a subscription. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = subscribers.entries.len() != before;
        if removed {
            log::trace!("{}: removed {}", self.name, id);
        }
        removed
    }

    /// Invokes every current subscriber with `event`, in subscription order.
    pub fn publish(&self, event: &E) {
        let snapshot = self.subscribers.borrow().entries.clone();
        for (id, callback) in snapshot {
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(event),
                Err(_) => log::warn!(
                    "{}: skipping {} for re-entrant publish",
                    self.name,
                    id
                ),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .borrow()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }

    pub fn clear(&self) {
        self.subscribers.borrow_mut().entries.clear();
    }
}

impl<E> Clone for Channel<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E> std::fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.borrow().entries.len())
            .finish()
    }
}
