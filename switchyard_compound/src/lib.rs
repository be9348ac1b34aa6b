// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_compound --heading-base-level=0

//! Switchyard Compound: variant state for compound components.
//!
//! [`CompoundApi`] is the listener-less sibling of
//! [`switchyard_bind::BindApi`]: it tracks one **active variant** among a
//! fixed set, for compound-component patterns where a family of cooperating
//! widgets (trigger + surface, tab + panel) renders against shared variant
//! state and nobody needs a change callback — subscribers watch the store
//! directly.
//!
//! Differences from `BindApi`:
//!
//! - No listeners: [`CompoundApi::set_variant`] writes the store and returns.
//! - Terminology: *variant* rather than *value*, matching the
//!   compound-component vocabulary used by the view layer's trigger/surface
//!   render contexts.
//!
//! Everything else carries over, including the shared-by-reference variant
//! set and the [`ValueChecking`] policy (re-exported from `switchyard_bind`).
//!
//! ## Minimal example
//!
//! ```rust
//! use switchyard_compound::{CompoundApi, CompoundOptions};
//!
//! let disclosure = CompoundApi::new(CompoundOptions::new(
//!     "collapsed",
//!     ["collapsed", "expanded"],
//! ));
//! assert_eq!(disclosure.state().active_variant, "collapsed");
//!
//! disclosure.set_variant("expanded").unwrap();
//! assert_eq!(disclosure.state().active_variant, "expanded");
//!
//! disclosure.reset().unwrap();
//! assert_eq!(disclosure.state().active_variant, "collapsed");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use switchyard_store::Store;

pub use switchyard_bind::{MountGuard, UnknownValueError, ValueChecking};

/// The state published by a [`CompoundApi`] through its store.
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundState<V> {
    /// The currently active variant.
    pub active_variant: V,
    /// The variant set, shared by reference with the options it came from.
    pub variants: Rc<[V]>,
}

/// Options for creating a [`CompoundApi`] instance.
///
/// Owned exclusively by one core and replaced wholesale via
/// [`CompoundApi::update`].
#[derive(Clone)]
pub struct CompoundOptions<V> {
    /// The variant that [`CompoundApi::reset`] falls back to.
    pub default_variant: V,
    /// The closed set of variants.
    pub variants: Rc<[V]>,
    /// Membership checking policy for `set_variant` / `reset`.
    pub checking: ValueChecking,
}

impl<V> CompoundOptions<V> {
    /// Creates options with the given default variant and variant set.
    ///
    /// Checking is [`ValueChecking::Permissive`].
    pub fn new(default_variant: V, variants: impl Into<Rc<[V]>>) -> Self {
        Self {
            default_variant,
            variants: variants.into(),
            checking: ValueChecking::Permissive,
        }
    }

    /// Sets the membership checking policy.
    #[must_use]
    pub fn with_checking(mut self, checking: ValueChecking) -> Self {
        self.checking = checking;
        self
    }
}

impl<V: fmt::Debug> fmt::Debug for CompoundOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundOptions")
            .field("default_variant", &self.default_variant)
            .field("variants", &self.variants)
            .field("checking", &self.checking)
            .finish()
    }
}

/// Variant state core for compound components.
///
/// Owns its [`Store`] and is the only writer to it. All methods take `&self`
/// so a shared `Rc<CompoundApi<V>>` handle can be passed to event call sites
/// without losing its receiver.
pub struct CompoundApi<V> {
    options: RefCell<CompoundOptions<V>>,
    store: Store<CompoundState<V>>,
}

impl<V: fmt::Debug> fmt::Debug for CompoundApi<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundApi")
            .field("options", &self.options.borrow())
            .field("store", &self.store)
            .finish()
    }
}

impl<V> CompoundApi<V>
where
    V: Clone + PartialEq + 'static,
{
    /// Creates a core with `options.default_variant` active.
    #[must_use]
    pub fn new(options: CompoundOptions<V>) -> Self {
        let store = Store::new(CompoundState {
            active_variant: options.default_variant.clone(),
            variants: Rc::clone(&options.variants),
        });
        Self {
            options: RefCell::new(options),
            store,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CompoundState<V> {
        self.store.get()
    }

    /// Returns the store publishing this core's state.
    #[must_use]
    pub fn store(&self) -> &Store<CompoundState<V>> {
        &self.store
    }

    /// Returns a clone of the current options.
    #[must_use]
    pub fn options(&self) -> CompoundOptions<V> {
        self.options.borrow().clone()
    }

    /// Sets the active variant.
    ///
    /// The store is written unconditionally, so every subscriber is notified
    /// even when `variant` is already active.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned, before any state change, when the
    ///   configured policy is [`ValueChecking::Strict`] and `variant` is not
    ///   in the variant set.
    pub fn set_variant(&self, variant: V) -> Result<(), UnknownValueError<V>> {
        self.check(&variant)?;
        self.write(variant);
        Ok(())
    }

    /// Replaces the options without touching the store.
    pub fn update(&self, options: CompoundOptions<V>) {
        *self.options.borrow_mut() = options;
    }

    /// Resets the active variant to the current default.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned under [`ValueChecking::Strict`] when
    ///   the current default is outside the variant set.
    pub fn reset(&self) -> Result<(), UnknownValueError<V>> {
        let next = self.options.borrow().default_variant.clone();
        self.check(&next)?;
        self.write(next);
        Ok(())
    }

    /// Replaces the default variant, then resets to it.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned, before the default is replaced,
    ///   under [`ValueChecking::Strict`] when `new_default` is outside the
    ///   variant set.
    pub fn reset_to(&self, new_default: V) -> Result<(), UnknownValueError<V>> {
        self.check(&new_default)?;
        self.options.borrow_mut().default_variant = new_default.clone();
        self.write(new_default);
        Ok(())
    }

    /// Mounts the core, returning its release guard.
    pub fn mount(&self) -> MountGuard {
        MountGuard::new()
    }

    fn check(&self, variant: &V) -> Result<(), UnknownValueError<V>> {
        let options = self.options.borrow();
        options.checking.check(variant, &options.variants)
    }

    fn write(&self, next: V) {
        self.store.set_with(|state| CompoundState {
            active_variant: next.clone(),
            variants: Rc::clone(&state.variants),
        });
    }
}
