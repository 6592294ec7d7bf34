//! # Store
//!
//! Single-threaded application state with slice subscriptions. A widget subscribes with a
//! selector and is told only when the value it selected changes, so a long list of labels does
//! not wake up on unrelated updates.
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

pub mod state;

pub use state::ChatState;

/// Identifier of a registered subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Watcher<S> {
    id: SubscriptionId,
    active: Cell<bool>,
    observe: RefCell<Box<dyn FnMut(&S) -> bool>>,
}

struct Shared<S> {
    state: RefCell<S>,
    watchers: RefCell<Vec<Rc<Watcher<S>>>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
}

trait Detach {
    fn detach(&self, id: SubscriptionId);
}

impl<S> Detach for Shared<S> {
    fn detach(&self, id: SubscriptionId) {
        // The watcher is dropped after the borrow ends, its listener may own other guards.
        let removed = {
            let mut watchers = self.watchers.borrow_mut();
            let removed = watchers
                .iter()
                .position(|watcher| watcher.id == id)
                .map(|pos| watchers.remove(pos));
            (removed, watchers.len())
        };

        if let (Some(watcher), remaining) = removed {
            watcher.active.set(false);
            debug!(subscription = id.0, remaining, "Store subscription released");
        }
    }
}

/// Resets the notifying flag even if a listener panics
struct NotifyingGuard<'a>(&'a Cell<bool>);

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Shared handle to the application state.
///
/// Clones refer to the same state.
pub struct Store<S> {
    shared: Rc<Shared<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<S: 'static> Store<S> {
    /// Create a store holding `state`
    pub fn new(state: S) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                watchers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Read the current state
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.shared.state.borrow())
    }

    /// Compute a value from the current state
    pub fn select<T>(&self, selector: impl Fn(&S) -> T) -> T {
        self.with_state(|state| selector(state))
    }

    /// Apply an update, then notify every subscription whose slice changed.
    ///
    /// Updates are serialized: calling this from inside a listener fails with
    /// [`Error::ReentrantUpdate`] and leaves the state untouched.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        if self.shared.notifying.get() {
            warn!("Rejected store update from inside a listener");
            return Err(Error::ReentrantUpdate);
        }

        let result = {
            let mut state = self
                .shared
                .state
                .try_borrow_mut()
                .map_err(|_| Error::ReentrantUpdate)?;
            f(&mut *state)
        };

        self.notify();
        Ok(result)
    }

    /// Replace the whole state
    pub fn replace(&self, state: S) -> Result<()> {
        self.update(|current| *current = state)
    }

    /// Register interest in the slice `selector` picks out of the state.
    ///
    /// `listener` runs after an update only when the selected value differs from the one seen
    /// last. It does not run for the initial value. The subscription lasts until the returned
    /// guard is dropped.
    pub fn subscribe<T, F, L>(&self, selector: F, mut listener: L) -> Subscription
    where
        T: PartialEq + 'static,
        F: Fn(&S) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        let mut last = self.with_state(&selector);
        let observe = move |state: &S| {
            let next = selector(state);
            if next == last {
                return false;
            }
            listener(&next);
            last = next;
            true
        };

        let id = SubscriptionId(self.shared.next_id.get());
        self.shared.next_id.set(id.0.wrapping_add(1));

        let watcher = Rc::new(Watcher {
            id,
            active: Cell::new(true),
            observe: RefCell::new(Box::new(observe)),
        });

        let count = {
            let mut watchers = self.shared.watchers.borrow_mut();
            watchers.push(watcher);
            watchers.len()
        };
        debug!(subscription = id.0, count, "Store subscription registered");

        let store: Weak<dyn Detach> = Rc::downgrade(&self.shared) as Weak<dyn Detach>;
        Subscription { id, store }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.shared.watchers.borrow().len()
    }

    fn notify(&self) {
        let watchers: Vec<Rc<Watcher<S>>> = self.shared.watchers.borrow().clone();
        let state = match self.shared.state.try_borrow() {
            Ok(state) => state,
            Err(_) => return,
        };

        self.shared.notifying.set(true);
        let _guard = NotifyingGuard(&self.shared.notifying);

        let mut fired = 0;
        for watcher in &watchers {
            // Released by an earlier listener in this round.
            if !watcher.active.get() {
                continue;
            }

            if let Ok(mut observe) = watcher.observe.try_borrow_mut() {
                let observe: &mut dyn FnMut(&S) -> bool = &mut **observe;
                if observe(&*state) {
                    fired += 1;
                }
            }
        }

        trace!(watchers = watchers.len(), fired, "Store listeners notified");
    }
}

impl<S: Default + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Guard for a store subscription; dropping it stops notifications
#[must_use = "the subscription is released as soon as it is dropped"]
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<dyn Detach>,
}

impl Subscription {
    /// Get the subscription id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Release the subscription now
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.detach(self.id);
        }
    }
}
