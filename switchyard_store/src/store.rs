// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observable value container.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::subscription::Subscription;

/// Default inline capacity for the subscriber list.
///
/// A store typically has a handful of subscribers (one per rendering unit
/// bound to it), so the common case avoids a heap allocation.
const INLINE_SUBSCRIBERS: usize = 4;

type Listener<T> = Rc<dyn Fn(&T)>;
type ListenerList<T> = SmallVec<[(u64, Listener<T>); INLINE_SUBSCRIBERS]>;

struct Inner<T> {
    state: RefCell<T>,
    listeners: RefCell<ListenerList<T>>,
    next_id: Cell<u64>,
}

/// A single-threaded observable value store.
///
/// `Store` is a cheap handle: cloning it aliases the same state, and all
/// handles observe the same subscriber list. State is replaced wholesale via
/// [`Store::set`] / [`Store::set_with`]; every replacement synchronously
/// notifies all subscribers in subscription order, whether or not the value
/// actually changed.
///
/// Reads hand out `&T`, so subscribers and other readers cannot mutate the
/// state behind the store's back; the only write path is `set` / `set_with`.
///
/// # Example
///
/// ```
/// use switchyard_store::Store;
///
/// let store = Store::new("a");
/// let alias = store.clone();
///
/// store.set("b");
/// assert_eq!(alias.get(), "b");
/// ```
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T> Store<T> {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(initial),
                listeners: RefCell::new(SmallVec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Reads the current state through a closure.
    ///
    /// The borrow is released before this returns, so the closure must not
    /// call [`Store::set`] or [`Store::set_with`] on the same store.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.inner.state.borrow())
    }

    /// Returns a clone of the current state.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl<T: Clone + 'static> Store<T> {
    /// Replaces the state and synchronously notifies every subscriber.
    ///
    /// Notification is unconditional: subscribers run even when `next`
    /// compares equal to the previous state. By the time this returns, every
    /// subscriber has observed the new state.
    pub fn set(&self, next: T) {
        *self.inner.state.borrow_mut() = next;
        self.notify();
    }

    /// Replaces the state with `update(&current)` and notifies subscribers.
    ///
    /// The updater observes the state immutably and produces the replacement;
    /// it must not touch the store itself.
    pub fn set_with(&self, update: impl FnOnce(&T) -> T) {
        let next = {
            let state = self.inner.state.borrow();
            update(&state)
        };
        self.set(next);
    }

    /// Subscribes `listener` to every state replacement.
    ///
    /// The listener is **not** invoked at subscription time; it first runs on
    /// the next `set` / `set_with`. The returned [`Subscription`] removes the
    /// listener when dropped or explicitly [`unsubscribed`](Subscription::unsubscribe).
    ///
    /// Listeners may re-entrantly subscribe, unsubscribe, or set the store.
    /// A listener subscribed during a notification pass does not run in that
    /// pass; a listener unsubscribed during a pass is skipped.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(live, _)| *live != id);
            }
        }))
    }

    /// Subscribes to a projection of the state.
    ///
    /// `selector` maps the full state to a derived value; `listener` is
    /// invoked only when that value differs from the previously selected one.
    /// The equality gate lives here, in the store, so that all projection
    /// subscribers share one notion of "changed".
    ///
    /// The initial projection is taken at subscription time and is not
    /// delivered to the listener.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe_selected<S>(
        &self,
        selector: impl Fn(&T) -> S + 'static,
        listener: impl Fn(&S) + 'static,
    ) -> Subscription
    where
        S: Clone + PartialEq + 'static,
    {
        let previous = RefCell::new(self.with(&selector));
        self.subscribe(move |state| {
            let next = selector(state);
            if *previous.borrow() != next {
                *previous.borrow_mut() = next.clone();
                listener(&next);
            }
        })
    }

    fn notify(&self) {
        // Snapshot the subscriber list so listeners can subscribe or
        // unsubscribe re-entrantly without invalidating this pass.
        let listeners: ListenerList<T> = self.inner.listeners.borrow().clone();
        for (id, listener) in listeners {
            let removed = !self
                .inner
                .listeners
                .borrow()
                .iter()
                .any(|(live, _)| *live == id);
            if removed {
                // Unsubscribed earlier in this pass.
                continue;
            }
            // Clone per listener so each one sees the latest state even if an
            // earlier listener re-entrantly replaced it, and so no borrow is
            // held while the listener runs.
            let state = self.inner.state.borrow().clone();
            listener(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn get_returns_initial_state() {
        let store = Store::new(7_u32);
        assert_eq!(store.get(), 7);
    }

    #[test]
    fn set_replaces_state() {
        let store = Store::new("a");
        store.set("b");
        assert_eq!(store.get(), "b");
    }

    #[test]
    fn set_with_derives_next_state_from_current() {
        let store = Store::new(10_u32);
        store.set_with(|state| state + 5);
        assert_eq!(store.get(), 15);
    }

    #[test]
    fn subscribers_are_notified_in_subscription_order() {
        let store = Store::new(0_u32);
        let order = Rc::new(RefCell::new(Vec::new()));

        let first_order = Rc::clone(&order);
        let _first = store.subscribe(move |_| first_order.borrow_mut().push("first"));
        let second_order = Rc::clone(&order);
        let _second = store.subscribe(move |_| second_order.borrow_mut().push("second"));

        store.set(1);

        assert_eq!(*order.borrow(), ["first", "second"]);
    }

    #[test]
    fn both_subscribers_observe_every_mutation() {
        let store = Store::new(0_u32);
        let a = Rc::new(RefCell::new(Vec::new()));
        let b = Rc::new(RefCell::new(Vec::new()));

        let a_sink = Rc::clone(&a);
        let _a = store.subscribe(move |state| a_sink.borrow_mut().push(*state));
        let b_sink = Rc::clone(&b);
        let _b = store.subscribe(move |state| b_sink.borrow_mut().push(*state));

        store.set(1);
        store.set(2);
        store.set(3);

        assert_eq!(*a.borrow(), [1, 2, 3]);
        assert_eq!(*b.borrow(), [1, 2, 3]);
    }

    #[test]
    fn equal_value_still_notifies() {
        let store = Store::new(1_u32);
        let fired = Rc::new(RefCell::new(0_u32));

        let fired_sink = Rc::clone(&fired);
        let _subscription = store.subscribe(move |_| *fired_sink.borrow_mut() += 1);

        store.set(1);
        store.set(1);

        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = Store::new(0_u32);
        let fired = Rc::new(RefCell::new(0_u32));

        let fired_sink = Rc::clone(&fired);
        let subscription = store.subscribe(move |_| *fired_sink.borrow_mut() += 1);

        store.set(1);
        subscription.unsubscribe();
        store.set(2);

        assert_eq!(*fired.borrow(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = Store::new(0_u32);
        let fired = Rc::new(RefCell::new(0_u32));

        let fired_sink = Rc::clone(&fired);
        {
            let _subscription = store.subscribe(move |_| *fired_sink.borrow_mut() += 1);
            store.set(1);
        }
        store.set(2);

        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn selected_subscription_fires_only_on_projection_change() {
        let store = Store::new((0_u32, "x"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_sink = Rc::clone(&seen);
        let _subscription = store.subscribe_selected(
            |state| state.1,
            move |label| seen_sink.borrow_mut().push(*label),
        );

        store.set((1, "x"));
        store.set((2, "x"));
        store.set((2, "y"));
        store.set((3, "y"));

        assert_eq!(*seen.borrow(), ["y"]);
    }

    #[test]
    fn listener_can_unsubscribe_another_listener_mid_pass() {
        let store = Store::new(0_u32);
        let fired = Rc::new(RefCell::new(0_u32));

        let fired_sink = Rc::clone(&fired);
        let victim = store.subscribe(move |_| *fired_sink.borrow_mut() += 1);

        let slot = Rc::new(RefCell::new(Some(victim)));
        let slot_for_killer = Rc::clone(&slot);
        // Subscribed after the victim, so it runs second; the victim fires
        // once before it is removed.
        let _killer = store.subscribe(move |_| {
            if let Some(subscription) = slot_for_killer.borrow_mut().take() {
                subscription.unsubscribe();
            }
        });

        store.set(1);
        store.set(2);

        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn listener_subscribed_mid_pass_does_not_run_in_that_pass() {
        let store: Store<u32> = Store::new(0);
        let late_fired = Rc::new(RefCell::new(0_u32));
        let holder: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let store_for_listener = store.clone();
        let late_fired_for_listener = Rc::clone(&late_fired);
        let holder_for_listener = Rc::clone(&holder);
        let _outer = store.subscribe(move |_| {
            if holder_for_listener.borrow().is_empty() {
                let late_sink = Rc::clone(&late_fired_for_listener);
                let late = store_for_listener.subscribe(move |_| *late_sink.borrow_mut() += 1);
                holder_for_listener.borrow_mut().push(late);
            }
        });

        store.set(1);
        assert_eq!(*late_fired.borrow(), 0);

        store.set(2);
        assert_eq!(*late_fired.borrow(), 1);
    }

    #[test]
    fn reentrant_set_recurses_synchronously() {
        let store = Store::new(0_u32);
        let observed = Rc::new(RefCell::new(Vec::new()));

        let store_for_listener = store.clone();
        let observed_sink = Rc::clone(&observed);
        let _subscription = store.subscribe(move |state| {
            observed_sink.borrow_mut().push(*state);
            if *state == 1 {
                store_for_listener.set(2);
            }
        });

        store.set(1);

        // The nested set completes before the outer one returns.
        assert_eq!(*observed.borrow(), [1, 2]);
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn cloned_handles_alias_the_same_state() {
        let store = Store::new(0_u32);
        let alias = store.clone();

        let fired = Rc::new(RefCell::new(0_u32));
        let fired_sink = Rc::clone(&fired);
        let _subscription = alias.subscribe(move |_| *fired_sink.borrow_mut() += 1);

        store.set(5);

        assert_eq!(alias.get(), 5);
        assert_eq!(*fired.borrow(), 1);
    }
}
