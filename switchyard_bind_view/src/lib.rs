// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_bind_view --heading-base-level=0

//! Switchyard Bind View: render-prop bindings and composition for [`switchyard_bind`].
//!
//! This crate bridges the framework-agnostic selection core to a rendering
//! host. It has no opinion about what "rendered output" is — every binding is
//! generic over an output type `R` (a string, a virtual node, a draw list) —
//! and it models the host's subscription behavior directly:
//!
//! - [`BoundBind`] scopes one core to a rendering unit's lifetime: the core
//!   is created once, mounted once, released on drop, and its options are
//!   re-synced each host render cycle via [`BoundBind::sync_options`].
//! - [`BoundBind::element`] is the **item renderer**: a render function bound
//!   to one value, re-run synchronously on every store notification with a
//!   fresh [`ElementContext`] (`is_active`, `active_value`, `select`).
//! - [`BoundBind::subscribe`] is the **selector subscriber**: a render
//!   function bound to a projection of the state, re-run only when the
//!   projection changes.
//!
//! ## Item renderers
//!
//! ```rust
//! use switchyard_bind::BindOptions;
//! use switchyard_bind_view::BoundBind;
//!
//! let tabs = BoundBind::new(BindOptions::new("tab1", ["tab1", "tab2"]));
//!
//! let trigger = tabs.element("tab2", |element| element.clone());
//! let panel = tabs.element("tab2", |element| {
//!     if element.is_active { "Panel 2" } else { "" }
//! });
//!
//! // User interaction: activate tab2 through the trigger's context.
//! trigger.output().select().unwrap();
//!
//! // Fully synchronous: the panel has already re-rendered.
//! assert_eq!(panel.output(), "Panel 2");
//! ```
//!
//! ## Composition
//!
//! The composition layer lets an application register named groups of
//! components once ([`BindComposer`]) and then retrieve pre-wired selections
//! for a group ([`BindComposer::bind_group`]). Components read the live
//! element context — and, inside an [`AppBind::provide`] scope, the whole
//! extended API — from [`ContextSlot`]s instead of arguments:
//!
//! ```rust
//! use std::rc::Rc;
//! use switchyard_bind::BindOptions;
//! use switchyard_bind_view::{
//!     BindComposer, BindContexts, ComponentGroup, ComponentGroups, component,
//! };
//!
//! let contexts = Rc::new(BindContexts::<&'static str, String>::new());
//!
//! let mut tab_group = ComponentGroup::new();
//! let element_slot = contexts.element().clone();
//! tab_group.insert(
//!     "Tab",
//!     component(move |children: String| {
//!         let element = element_slot.current().unwrap();
//!         if element.is_active {
//!             format!("[{children}]")
//!         } else {
//!             children
//!         }
//!     }),
//! );
//!
//! let mut groups = ComponentGroups::new();
//! groups.insert("Tab", tab_group);
//!
//! let composer = BindComposer::new(Rc::clone(&contexts), groups);
//! let tabs = composer
//!     .bind_group("Tab", BindOptions::new("one", ["one", "two"]))
//!     .unwrap();
//!
//! let first = tabs.app_element("one", |context| {
//!     context.render("Tab", String::from("One")).unwrap()
//! });
//! assert_eq!(first.output(), "[One]");
//!
//! tabs.set_value("two").unwrap();
//! assert_eq!(first.output(), "One");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bound;
mod compose;
mod context;

pub use bound::{BoundBind, ElementContext, RenderBinding};
pub use compose::{
    AppBind, AppElementContext, BindComposer, BindContexts, Component, ComponentGroup,
    ComponentGroups, UnknownGroupError, component,
};
pub use context::{ContextSlot, MissingContextError};
