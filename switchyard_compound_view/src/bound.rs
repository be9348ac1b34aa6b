// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compound view adapter: per-slot render contexts and retained bindings.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::ops::Deref;

use switchyard_compound::{CompoundApi, CompoundOptions, CompoundState, MountGuard, UnknownValueError};
use switchyard_store::Subscription;

/// Render context handed to a slot's render function.
///
/// Recomputed from the live snapshot on every store notification. Cloning is
/// cheap and keeps [`SlotContext::set_variant`] bound to the owning core.
#[derive(Clone)]
pub struct SlotContext<V> {
    /// The variant this slot represents.
    pub variant: V,
    /// Whether this slot's variant is currently active.
    pub is_active: bool,
    /// The currently active variant.
    pub active_variant: V,
    set_variant: Rc<dyn Fn() -> Result<(), UnknownValueError<V>>>,
}

impl<V> SlotContext<V> {
    /// Makes this slot's variant the active one.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Propagated from
    ///   [`CompoundApi::set_variant`] under strict checking.
    pub fn set_variant(&self) -> Result<(), UnknownValueError<V>> {
        (self.set_variant)()
    }
}

impl<V: fmt::Debug> fmt::Debug for SlotContext<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotContext")
            .field("variant", &self.variant)
            .field("is_active", &self.is_active)
            .field("active_variant", &self.active_variant)
            .finish_non_exhaustive()
    }
}

/// A retained rendering unit holding the latest output of a render function.
///
/// Dropping the binding unsubscribes it from the store.
pub struct RenderBinding<R> {
    output: Rc<RefCell<R>>,
    subscription: Subscription,
}

impl<R> RenderBinding<R> {
    pub(crate) fn new(output: Rc<RefCell<R>>, subscription: Subscription) -> Self {
        Self {
            output,
            subscription,
        }
    }

    /// Returns a clone of the latest rendered output.
    #[must_use]
    pub fn output(&self) -> R
    where
        R: Clone,
    {
        self.output.borrow().clone()
    }

    /// Reads the latest rendered output through a closure.
    ///
    /// The output is borrowed for the duration of `f`, so `f` must not drive
    /// the selection (that would re-render this binding while it is
    /// borrowed). Clone the output out with [`RenderBinding::output`] first
    /// when the read leads to a `set_variant`.
    pub fn with_output<U>(&self, f: impl FnOnce(&R) -> U) -> U {
        f(&self.output.borrow())
    }

    /// Unmounts now instead of at drop time.
    pub fn unbind(self) {
        self.subscription.unsubscribe();
    }
}

impl<R: fmt::Debug> fmt::Debug for RenderBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderBinding")
            .field("output", &self.output.borrow())
            .finish_non_exhaustive()
    }
}

/// One compound core bound to a rendering host's lifetime.
///
/// Mirrors `switchyard_bind_view::BoundBind` for the listener-less compound
/// core: created once, mounted once, released on drop, options re-synced per
/// render cycle. Dereferences to [`CompoundApi`].
pub struct BoundCompound<V> {
    api: Rc<CompoundApi<V>>,
    _mount: MountGuard,
}

impl<V: fmt::Debug> fmt::Debug for BoundCompound<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCompound")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl<V> Deref for BoundCompound<V> {
    type Target = CompoundApi<V>;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

impl<V> BoundCompound<V>
where
    V: Clone + PartialEq + 'static,
{
    /// Creates the core and mounts it.
    #[must_use]
    pub fn new(options: CompoundOptions<V>) -> Self {
        let api = Rc::new(CompoundApi::new(options));
        let mount = api.mount();
        Self { api, _mount: mount }
    }

    /// Returns the shared handle to the underlying core.
    #[must_use]
    pub fn api(&self) -> &Rc<CompoundApi<V>> {
        &self.api
    }

    /// Syncs the core's options from the host's current render.
    ///
    /// Never notifies the store, so it cannot cause additional renders.
    pub fn sync_options(&self, options: CompoundOptions<V>) {
        self.api.update(options);
    }

    /// The slot renderer: binds a render function to one variant.
    ///
    /// Re-run on **every** store notification with a fresh [`SlotContext`];
    /// slots subscribe to the whole snapshot so that triggers and surfaces
    /// bound to the same variant stay trivially consistent.
    pub fn slot<R: 'static>(
        &self,
        variant: V,
        render: impl Fn(&SlotContext<V>) -> R + 'static,
    ) -> RenderBinding<R> {
        let api_for_set = Rc::clone(&self.api);
        let variant_for_set = variant.clone();
        let set_variant: Rc<dyn Fn() -> Result<(), UnknownValueError<V>>> =
            Rc::new(move || api_for_set.set_variant(variant_for_set.clone()));

        let context_for = move |state: &CompoundState<V>| SlotContext {
            variant: variant.clone(),
            is_active: state.active_variant == variant,
            active_variant: state.active_variant.clone(),
            set_variant: Rc::clone(&set_variant),
        };

        let initial = render(&context_for(&self.api.state()));
        let output = Rc::new(RefCell::new(initial));

        let output_sink = Rc::clone(&output);
        let subscription = self.api.store().subscribe(move |state| {
            *output_sink.borrow_mut() = render(&context_for(state));
        });

        RenderBinding::new(output, subscription)
    }

    /// The selector subscriber: binds a render function to a projection,
    /// re-run only when the projection changes.
    pub fn subscribe<S, R>(
        &self,
        selector: impl Fn(&CompoundState<V>) -> S + 'static,
        render: impl Fn(&S) -> R + 'static,
    ) -> RenderBinding<R>
    where
        S: Clone + PartialEq + 'static,
        R: 'static,
    {
        let initial = render(&self.api.store().with(&selector));
        let output = Rc::new(RefCell::new(initial));

        let output_sink = Rc::clone(&output);
        let subscription = self
            .api
            .store()
            .subscribe_selected(selector, move |selected| {
                *output_sink.borrow_mut() = render(selected);
            });

        RenderBinding::new(output, subscription)
    }

    /// [`BoundCompound::subscribe`] with the identity projection.
    pub fn subscribe_state<R: 'static>(
        &self,
        render: impl Fn(&CompoundState<V>) -> R + 'static,
    ) -> RenderBinding<R> {
        self.subscribe(Clone::clone, render)
    }
}
