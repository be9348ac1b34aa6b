// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_bind --heading-base-level=0

//! Switchyard Bind: exclusive-selection state for tabs, accordions, and wizards.
//!
//! The core type is [`BindApi`], a small state container that owns exactly one
//! "active value" drawn from a fixed set of candidate values. It is
//! framework-agnostic: user interfaces connect to it through the observable
//! store it publishes ([`BindApi::store`]) or through an adapter layer such as
//! `switchyard_bind_view`.
//!
//! The container is intentionally opinionated and compact:
//!
//! - One mutable field: the active value. Setting it always replaces the
//!   store state (notifying every subscriber), and fires the optional
//!   [`on_change`](BindListeners::on_change) listener only when the value
//!   actually changed.
//! - The candidate set is shared as an [`Rc`] slice and never copied, so
//!   callers can rely on [`Rc::ptr_eq`] identity for memoization.
//! - Value membership checking is an explicit policy ([`ValueChecking`]),
//!   defaulting to the permissive behavior of trusting the caller.
//!
//! `BindApi` is generic over the value type. Use `&'static str` labels for
//! quick wiring, or a small enum when you want the closed set enforced at
//! compile time.
//!
//! ## Minimal example
//!
//! ```rust
//! use switchyard_bind::{BindApi, BindOptions};
//!
//! let tabs = BindApi::new(BindOptions::new("tab1", ["tab1", "tab2", "tab3"]));
//! assert_eq!(tabs.state().value, "tab1");
//!
//! tabs.set_value("tab2").unwrap();
//! assert_eq!(tabs.state().value, "tab2");
//!
//! tabs.reset().unwrap();
//! assert_eq!(tabs.state().value, "tab1");
//! ```
//!
//! ## Change notification
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use switchyard_bind::{BindApi, BindOptions};
//!
//! let changes = Rc::new(RefCell::new(Vec::new()));
//! let changes_sink = Rc::clone(&changes);
//!
//! let wizard = BindApi::new(
//!     BindOptions::new("intro", ["intro", "details", "confirm"])
//!         .with_on_change(move |step, _wizard| {
//!             changes_sink.borrow_mut().push(*step);
//!         }),
//! );
//!
//! wizard.set_value("details").unwrap();
//! wizard.set_value("details").unwrap(); // no-op transition, listener skipped
//! wizard.reset().unwrap();
//!
//! assert_eq!(*changes.borrow(), ["details", "intro"]);
//! ```
//!
//! ## Strict checking
//!
//! The default policy ([`ValueChecking::Permissive`]) never validates that a
//! value belongs to the candidate set; a misused core silently carries an
//! out-of-range active value. Opt into [`ValueChecking::Strict`] to reject
//! unknown values before any state change:
//!
//! ```rust
//! use switchyard_bind::{BindApi, BindOptions, ValueChecking};
//!
//! let tabs = BindApi::new(
//!     BindOptions::new("a", ["a", "b"]).with_checking(ValueChecking::Strict),
//! );
//!
//! assert!(tabs.set_value("c").is_err());
//! assert_eq!(tabs.state().value, "a");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod api;
mod checking;

pub use api::{BindApi, BindListeners, BindOptions, BindState, MountGuard, OnChange};
pub use checking::{UnknownValueError, ValueChecking};
