// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_compound_view --heading-base-level=0

//! Switchyard Compound View: render-prop bindings and composition for
//! [`switchyard_compound`].
//!
//! The compound counterpart of [`switchyard_bind_view`], sharing its
//! component-group vocabulary ([`Component`], [`ComponentGroups`],
//! [`ContextSlot`]) but built over the listener-less compound core:
//!
//! - [`BoundCompound`] scopes one core to a rendering unit's lifetime.
//! - [`BoundCompound::slot`] is the **slot renderer**: a render function
//!   bound to one variant, re-run synchronously on every store notification
//!   with a fresh [`SlotContext`] (`is_active`, `active_variant`,
//!   `set_variant`).
//! - [`BoundCompound::subscribe`] re-runs a render function only when a
//!   projection of the state changes.
//!
//! ```rust
//! use switchyard_compound::CompoundOptions;
//! use switchyard_compound_view::BoundCompound;
//!
//! let accordion = BoundCompound::new(CompoundOptions::new("closed", ["closed", "open"]));
//!
//! let header = accordion.slot("open", |slot| slot.clone());
//! let panel = accordion.slot("open", |slot| {
//!     if slot.is_active { "Contents" } else { "" }
//! });
//!
//! header.output().set_variant().unwrap();
//!
//! // Fully synchronous: the panel has already re-rendered.
//! assert_eq!(panel.output(), "Contents");
//! ```
//!
//! The composition layer mirrors `switchyard_bind_view` as well: register
//! named component groups once with a [`CompoundComposer`], then call
//! [`CompoundComposer::bind_group`] for a pre-wired [`AppCompound`] whose
//! components read the live [`SlotContext`] from a [`ContextSlot`] instead
//! of arguments.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bound;
mod compose;

pub use bound::{BoundCompound, RenderBinding, SlotContext};
pub use compose::{AppCompound, AppSlotContext, CompoundComposer, CompoundContexts};

// The component-group vocabulary is shared with the bind view layer, so the
// two composition registries accept the same libraries.
pub use switchyard_bind_view::{
    Component, ComponentGroup, ComponentGroups, ContextSlot, MissingContextError,
    UnknownGroupError, component,
};
