#![forbid(unsafe_code)]

//! In-process publish/subscribe with synchronous fan-out.
//!
//! A [`Broadcast<T>`] keeps an ordered list of listeners. [`publish`] calls
//! each of them, in subscription order, before returning. Subscribing yields a
//! [`Subscription`] guard; dropping the guard removes the listener.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in registration order.
//! 2. A listener removed while a dispatch is in progress is not invoked for
//!    the remainder of that dispatch.
//! 3. A listener that panics does not prevent delivery to later listeners;
//!    the panic is logged and reported in the returned [`Delivery`].
//! 4. No internal borrow is held while a listener runs, so listeners may
//!    subscribe, unsubscribe, or publish re-entrantly.
//!
//! # Architecture
//!
//! `Broadcast<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership,
//! matching the cooperative event-loop model the page runs under. A
//! [`Subscription`] holds only a `Weak` handle, so a guard that outlives its
//! channel is harmless.
//!
//! [`publish`]: Broadcast::publish

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

/// Identifier of one registered listener.
pub type ListenerId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: ListenerId,
    published: u64,
}

impl<T> Inner<T> {
    fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// A synchronous, single-threaded broadcast channel.
pub struct Broadcast<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Broadcast")
            .field("listeners", &inner.listeners.len())
            .field("published", &inner.published)
            .finish()
    }
}

impl<T: 'static> Broadcast<T> {
    /// Create a channel with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                listeners: Vec::new(),
                next_id: 0,
                published: 0,
            })),
        }
    }

    /// Register a listener. It stays registered until the returned guard is
    /// dropped (or [`Subscription::unsubscribe`] is called).
    #[must_use = "dropping the Subscription immediately unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(listener)));
            id
        };
        tracing::trace!(listener = id, "broadcast listener subscribed");

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            id,
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .borrow_mut()
                        .listeners
                        .retain(|(lid, _)| *lid != id);
                    tracing::trace!(listener = id, "broadcast listener released");
                }
            })),
        }
    }

    /// Deliver `message` to every current listener, in subscription order.
    pub fn publish(&self, message: &T) -> Delivery {
        let snapshot: Vec<(ListenerId, Listener<T>)> = {
            let mut inner = self.inner.borrow_mut();
            inner.published += 1;
            inner.listeners.clone()
        };

        let mut delivery = Delivery::default();
        for (id, listener) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| listener(message))) {
                Ok(()) => delivery.delivered += 1,
                Err(payload) => {
                    let failure = ListenerFailure::from_panic(id, payload);
                    tracing::warn!(
                        listener = id,
                        panic = %failure.message,
                        "broadcast listener panicked; continuing delivery"
                    );
                    delivery.failures.push(failure);
                }
            }
        }
        delivery
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of messages published so far.
    pub fn published_count(&self) -> u64 {
        self.inner.borrow().published
    }
}

/// RAII guard for a registered listener.
pub struct Subscription {
    id: ListenerId,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// The listener's id.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// A listener that panicked during a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// The failing listener.
    pub listener: ListenerId,
    /// Message extracted from the panic payload.
    pub message: String,
}

impl ListenerFailure {
    fn from_panic(listener: ListenerId, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { listener, message }
    }
}

/// Outcome of one [`Broadcast::publish`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that returned normally.
    pub delivered: usize,
    /// Listeners that panicked.
    pub failures: Vec<ListenerFailure>,
}

impl Delivery {
    /// True when every listener returned normally.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
