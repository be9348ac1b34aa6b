// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The exclusive-selection core.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use switchyard_store::Store;

use crate::checking::{UnknownValueError, ValueChecking};

/// The state published by a [`BindApi`] through its store.
#[derive(Clone, Debug, PartialEq)]
pub struct BindState<V> {
    /// The currently active value.
    pub value: V,
    /// The candidate set, shared by reference with the options it came from.
    pub values: Rc<[V]>,
}

/// Change listener invoked with the new active value and the owning core.
///
/// Fired synchronously from [`BindApi::set_value`] / [`BindApi::reset`], and
/// only when the active value actually changed. A listener may call back into
/// the core; an unconditional re-entrant `set_value` recurses until the stack
/// overflows, which is a caller error.
pub type OnChange<V> = Rc<dyn Fn(&V, &BindApi<V>)>;

/// Listener callbacks for [`BindApi`] events.
#[derive(Clone, Default)]
pub struct BindListeners<V> {
    /// Called when the active value changes via `set_value` or `reset`.
    pub on_change: Option<OnChange<V>>,
}

impl<V> fmt::Debug for BindListeners<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindListeners")
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Options for creating a [`BindApi`] instance.
///
/// Owned exclusively by one core and replaced wholesale via
/// [`BindApi::update`]. The candidate set is an `Rc` slice so that replacing
/// options does not copy it and callers can rely on pointer identity.
#[derive(Clone)]
pub struct BindOptions<V> {
    /// The value that [`BindApi::reset`] falls back to.
    pub default_value: V,
    /// The closed set of candidate values.
    pub values: Rc<[V]>,
    /// Event listeners.
    pub listeners: BindListeners<V>,
    /// Membership checking policy for `set_value` / `reset`.
    pub checking: ValueChecking,
}

impl<V> BindOptions<V> {
    /// Creates options with the given default value and candidate set.
    ///
    /// Listeners are empty and checking is [`ValueChecking::Permissive`].
    pub fn new(default_value: V, values: impl Into<Rc<[V]>>) -> Self {
        Self {
            default_value,
            values: values.into(),
            listeners: BindListeners { on_change: None },
            checking: ValueChecking::Permissive,
        }
    }

    /// Sets the change listener.
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl Fn(&V, &BindApi<V>) + 'static) -> Self {
        self.listeners.on_change = Some(Rc::new(on_change));
        self
    }

    /// Sets the membership checking policy.
    #[must_use]
    pub fn with_checking(mut self, checking: ValueChecking) -> Self {
        self.checking = checking;
        self
    }
}

impl<V: fmt::Debug> fmt::Debug for BindOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindOptions")
            .field("default_value", &self.default_value)
            .field("values", &self.values)
            .field("listeners", &self.listeners)
            .field("checking", &self.checking)
            .finish()
    }
}

/// Release guard returned by [`BindApi::mount`].
///
/// Currently there is nothing to set up or tear down; the guard exists so
/// adapter layers already follow the scoped-acquisition contract (acquire
/// once at mount, release once at unmount) when future functionality needs
/// it. Dropping the guard, or calling [`MountGuard::release`], releases.
#[must_use = "dropping the guard releases the mount"]
#[derive(Debug)]
pub struct MountGuard {
    _private: (),
}

impl MountGuard {
    /// Creates a guard. Cores hand these out from their `mount` methods.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Releases now instead of at drop time.
    pub fn release(self) {}
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// The exclusive-selection core: one active value among a fixed candidate set.
///
/// `BindApi` owns its [`Store`] and is the only writer to it. All methods
/// take `&self`; the core uses interior mutability so that a shared handle
/// (typically `Rc<BindApi<V>>`) can be handed to event call sites without
/// losing its receiver.
///
/// See the [crate documentation](crate) for usage examples.
pub struct BindApi<V> {
    options: RefCell<BindOptions<V>>,
    store: Store<BindState<V>>,
}

impl<V: fmt::Debug> fmt::Debug for BindApi<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindApi")
            .field("options", &self.options.borrow())
            .field("store", &self.store)
            .finish()
    }
}

impl<V> BindApi<V>
where
    V: Clone + PartialEq + 'static,
{
    /// Creates a core with `options.default_value` active.
    ///
    /// No membership check is performed here even in strict mode; whether the
    /// default belongs to the candidate set is the caller's responsibility.
    #[must_use]
    pub fn new(options: BindOptions<V>) -> Self {
        let store = Store::new(BindState {
            value: options.default_value.clone(),
            values: Rc::clone(&options.values),
        });
        Self {
            options: RefCell::new(options),
            store,
        }
    }

    /// Returns the current state.
    ///
    /// The returned snapshot is a cheap clone; the candidate set inside it is
    /// the same `Rc` slice the core was built with.
    #[must_use]
    pub fn state(&self) -> BindState<V> {
        self.store.get()
    }

    /// Returns the store publishing this core's state.
    ///
    /// Subscribe here to observe mutations; only the core's own methods
    /// write to it.
    #[must_use]
    pub fn store(&self) -> &Store<BindState<V>> {
        &self.store
    }

    /// Returns a clone of the current options.
    #[must_use]
    pub fn options(&self) -> BindOptions<V> {
        self.options.borrow().clone()
    }

    /// Sets the active value.
    ///
    /// The store is written unconditionally, so every subscriber is notified
    /// even when `value` equals the current active value. The `on_change`
    /// listener fires only on an actual change, after the write.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned, before any state change, when the
    ///   configured policy is [`ValueChecking::Strict`] and `value` is not in
    ///   the candidate set.
    pub fn set_value(&self, value: V) -> Result<(), UnknownValueError<V>> {
        self.check(&value)?;
        self.write(value);
        Ok(())
    }

    /// Replaces the options.
    ///
    /// Pure field replacement: the store is untouched and no listener fires,
    /// even when the new default differs from the active value. Adapter
    /// layers call this every render cycle to keep "what `reset` falls back
    /// to" current without causing a visible state change.
    pub fn update(&self, options: BindOptions<V>) {
        *self.options.borrow_mut() = options;
    }

    /// Resets the active value to the current default.
    ///
    /// This targets `options.default_value` as of now, which [`Self::update`]
    /// or [`Self::reset_to`] may have moved since construction. Fires
    /// `on_change` only if the active value actually changes.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned under [`ValueChecking::Strict`] when
    ///   the current default is outside the candidate set.
    pub fn reset(&self) -> Result<(), UnknownValueError<V>> {
        let next = self.options.borrow().default_value.clone();
        self.check(&next)?;
        self.write(next);
        Ok(())
    }

    /// Replaces the default value, then resets to it.
    ///
    /// Useful for "restart wizard at a different step" flows: a subsequent
    /// bare [`Self::reset`] returns to `new_default`, not the original
    /// construction-time default.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned, before the default is replaced,
    ///   under [`ValueChecking::Strict`] when `new_default` is outside the
    ///   candidate set.
    pub fn reset_to(&self, new_default: V) -> Result<(), UnknownValueError<V>> {
        self.check(&new_default)?;
        self.options.borrow_mut().default_value = new_default.clone();
        self.write(new_default);
        Ok(())
    }

    /// Mounts the core, returning its release guard.
    ///
    /// Adapter layers acquire the guard exactly once at first mount and drop
    /// it exactly once at unmount.
    pub fn mount(&self) -> MountGuard {
        MountGuard::new()
    }

    fn check(&self, value: &V) -> Result<(), UnknownValueError<V>> {
        let options = self.options.borrow();
        options.checking.check(value, &options.values)
    }

    /// Writes `next` to the store, then fires `on_change` if it changed.
    fn write(&self, next: V) {
        let previous = self.store.with(|state| state.value.clone());
        self.store.set_with(|state| BindState {
            value: next.clone(),
            values: Rc::clone(&state.values),
        });
        if previous != next {
            // Clone the listener out of the options borrow first so it can
            // re-enter the core.
            let on_change = self.options.borrow().listeners.on_change.clone();
            if let Some(on_change) = on_change {
                on_change(&next, self);
            }
        }
    }
}
