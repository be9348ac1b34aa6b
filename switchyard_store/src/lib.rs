// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_store --heading-base-level=0

//! Switchyard Store: a single-threaded observable value store.
//!
//! This crate provides [`Store`], a small publish/subscribe container for one
//! value. It is the state backbone for the Switchyard selection crates, but it
//! has no opinion about what it stores: any `'static` type works.
//!
//! The store is deliberately simple:
//!
//! - **Synchronous fan-out**: [`Store::set`] and [`Store::set_with`] replace
//!   the state and notify every subscriber before returning. There is no
//!   batching, deferral, or reordering; subscribers run in subscription order.
//! - **Unconditional notification**: every state replacement notifies, even
//!   when the new value compares equal to the old one. Callers that want
//!   change-gated delivery use [`Store::subscribe_selected`], which performs
//!   an equality check on a projected value inside the store.
//! - **Single-threaded sharing**: a `Store` is a cheap [`Rc`]-backed handle.
//!   Cloning it aliases the same state; there is no locking because there is
//!   no parallelism.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use switchyard_store::Store;
//!
//! let store = Store::new(1_u32);
//!
//! let seen = Rc::new(Cell::new(0_u32));
//! let seen_by_listener = Rc::clone(&seen);
//! let subscription = store.subscribe(move |state| {
//!     seen_by_listener.set(*state);
//! });
//!
//! store.set(2);
//! assert_eq!(seen.get(), 2);
//! assert_eq!(store.get(), 2);
//!
//! // Updater form: derive the next state from the current one.
//! store.set_with(|state| state + 1);
//! assert_eq!(seen.get(), 3);
//!
//! subscription.unsubscribe();
//! store.set(9);
//! assert_eq!(seen.get(), 3);
//! ```
//!
//! ## Projected subscriptions
//!
//! [`Store::subscribe_selected`] subscribes to a projection of the state and
//! only invokes the listener when the projected value changes:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use switchyard_store::Store;
//!
//! let store = Store::new((0_u32, "label"));
//!
//! let fired = Rc::new(Cell::new(0_u32));
//! let fired_by_listener = Rc::clone(&fired);
//! let _subscription = store.subscribe_selected(
//!     |state| state.1,
//!     move |_label| {
//!         fired_by_listener.set(fired_by_listener.get() + 1);
//!     },
//! );
//!
//! store.set((1, "label")); // projection unchanged, listener skipped
//! assert_eq!(fired.get(), 0);
//!
//! store.set((1, "other"));
//! assert_eq!(fired.get(), 1);
//! ```
//!
//! ## Re-entrancy
//!
//! Listeners may subscribe, unsubscribe, or call `set` from inside a
//! notification. Re-entrant sets recurse synchronously; a listener that
//! unconditionally re-sets the store will overflow the stack, which is a
//! caller error rather than something the store guards against.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod store;
mod subscription;

pub use store::Store;
pub use subscription::Subscription;
