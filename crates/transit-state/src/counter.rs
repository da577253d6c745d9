//! Counter state holder
//!
//! A holder is a cheap handle: clones share the same counter and the same
//! observer list, so the navigation layer can keep one copy in its scoped
//! registry while screens read through another.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

type Observer = Arc<dyn Fn(u64) + Send + Sync>;

/// Handle returned by [`CounterHolder::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

#[derive(Clone)]
pub struct CounterHolder {
    /// Unique identifier of this holder instance
    holder_id: Uuid,
    value: Arc<Mutex<u64>>,
    observers: Arc<RwLock<Observers>>,
}

impl CounterHolder {
    /// Create a holder seeded at `start`
    pub fn initialize(start: u64) -> Self {
        let holder = Self {
            holder_id: Uuid::new_v4(),
            value: Arc::new(Mutex::new(start)),
            observers: Arc::new(RwLock::new(Observers {
                next_id: 0,
                entries: Vec::new(),
            })),
        };

        tracing::trace!(holder_id = %holder.holder_id, start, "Counter holder initialized");

        holder
    }

    pub fn holder_id(&self) -> Uuid {
        self.holder_id
    }

    /// Current counter value
    pub fn value(&self) -> u64 {
        *self.value.lock()
    }

    /// Add exactly one to the counter.
    ///
    /// Observers are called after the lock is released, so an observer may
    /// read the holder (or increment it again) without deadlocking.
    pub fn increment(&self) {
        let new_value = {
            let mut value = self.value.lock();
            *value += 1;
            *value
        };

        tracing::trace!(holder_id = %self.holder_id, count = new_value, "Update count");

        let observers: Vec<Observer> = self
            .observers
            .read()
            .entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(new_value);
        }
    }

    /// Register a change observer. It receives the new value after each increment.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let mut observers = self.observers.write();
        let id = SubscriptionId(observers.next_id);
        observers.next_id += 1;
        observers.entries.push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.entries.len();
        observers.entries.retain(|(existing, _)| *existing != id);
        observers.entries.len() != before
    }

    /// True when both handles point at the same counter
    pub fn same_holder(&self, other: &CounterHolder) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for CounterHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterHolder")
            .field("holder_id", &self.holder_id)
            .field("value", &self.value())
            .finish()
    }
}
