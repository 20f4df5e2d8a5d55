//! Observer registry for presence state changes.
//!
//! Observers run synchronously, in registration order, with no registry lock
//! held, so a callback may subscribe or unsubscribe (itself or others). An
//! observer removed mid-round is not called for the rest of that round.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::error;

use crate::presence::state::PresenceState;

type Callback = Box<dyn Fn(&PresenceState) + Send + Sync>;

/// One registered observer.
struct ObserverSlot {
    callback: Callback,
    /// Revision of the last state delivered to this observer.
    delivered: Mutex<u64>,
    active: AtomicBool,
}

impl ObserverSlot {
    /// Deliver `state` unless a newer revision already reached this observer.
    ///
    /// Deliveries to one observer are serialized, so a subscriber's initial
    /// callback can never overtake a concurrent notification round.
    fn deliver(&self, state: &PresenceState, revision: u64) {
        let mut delivered = self.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.active.load(Ordering::Acquire) || revision <= *delivered {
            return;
        }
        *delivered = revision;

        if catch_unwind(AssertUnwindSafe(|| (self.callback)(state))).is_err() {
            error!(revision, "Presence observer panicked");
        }
    }
}

/// Ordered set of observers keyed by registration id.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: AtomicU64,
    slots: Mutex<BTreeMap<u64, Arc<ObserverSlot>>>,
}

impl ObserverRegistry {
    fn slots(&self) -> MutexGuard<'_, BTreeMap<u64, Arc<ObserverSlot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an observer and deliver `current` to it right away.
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        callback: Callback,
        current: impl FnOnce() -> (PresenceState, u64),
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(ObserverSlot {
            callback,
            delivered: Mutex::new(0),
            active: AtomicBool::new(true),
        });
        self.slots().insert(id, slot.clone());

        let (state, revision) = current();
        slot.deliver(&state, revision);

        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    /// Remove an observer. Returns whether it was still registered.
    pub(crate) fn remove(&self, id: u64) -> bool {
        match self.slots().remove(&id) {
            Some(slot) => {
                slot.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Remove every observer.
    pub(crate) fn clear(&self) {
        let mut slots = self.slots();
        for slot in slots.values() {
            slot.active.store(false, Ordering::Release);
        }
        slots.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.slots().len()
    }

    /// Run one notification round.
    pub(crate) fn notify(&self, state: &PresenceState, revision: u64) {
        let ids: Vec<u64> = self.slots().keys().copied().collect();
        for id in ids {
            let slot = self.slots().get(&id).cloned();
            if let Some(slot) = slot {
                slot.deliver(state, revision);
            }
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle leaves the observer registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[must_use = "the observer stays registered until unsubscribe() is called"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<ObserverRegistry>,
}

impl Subscription {
    /// Stop receiving updates. Calling this more than once has no effect.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
