// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view adapter: per-element render contexts and retained render bindings.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::ops::Deref;

use switchyard_bind::{BindApi, BindOptions, BindState, MountGuard, UnknownValueError};
use switchyard_store::Subscription;

/// Render context handed to an element's render function.
///
/// Recomputed from the live snapshot on every store notification; never
/// stored by the adapter beyond the duration of one render call. Cloning is
/// cheap and keeps [`ElementContext::select`] bound to the owning core, so a
/// context (or its `select` callable) can be handed to event call sites.
#[derive(Clone)]
pub struct ElementContext<V> {
    /// The value this element represents.
    pub value: V,
    /// Whether this element's value is currently active.
    pub is_active: bool,
    /// The currently active value.
    pub active_value: V,
    select: Rc<dyn Fn() -> Result<(), UnknownValueError<V>>>,
}

impl<V> ElementContext<V> {
    /// Makes this element's value the active one.
    ///
    /// Stable callable bound to the owning core; by the time this returns,
    /// every live render binding has re-rendered from the new snapshot.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Propagated from
    ///   [`BindApi::set_value`] under strict checking.
    pub fn select(&self) -> Result<(), UnknownValueError<V>> {
        (self.select)()
    }
}

impl<V: fmt::Debug> fmt::Debug for ElementContext<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementContext")
            .field("value", &self.value)
            .field("is_active", &self.is_active)
            .field("active_value", &self.active_value)
            .finish_non_exhaustive()
    }
}

/// A retained rendering unit: holds the latest output of a render function
/// and the store subscription that keeps it current.
///
/// Returned by [`BoundBind::element`], [`BoundBind::subscribe`], and the
/// composition layer's `app_element`. Dropping the binding unsubscribes; the
/// output stops updating and the rendering unit is effectively unmounted.
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
    /// when the read leads to a `select`.
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

/// One core bound to a rendering host's lifetime.
///
/// `BoundBind` owns exactly one [`BindApi`] per logical selection: the core
/// is created once at construction (not per render), its mount guard is
/// acquired exactly once here and released exactly once on drop. Hosts with
/// a render cycle call [`BoundBind::sync_options`] each cycle so that the
/// core's options track the caller's current props without causing a visible
/// state change.
///
/// Dereferences to [`BindApi`], so the full core surface (`state`,
/// `set_value`, `reset`, `store`, ...) is available directly.
pub struct BoundBind<V> {
    api: Rc<BindApi<V>>,
    _mount: MountGuard,
}

impl<V: fmt::Debug> fmt::Debug for BoundBind<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundBind")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl<V> Deref for BoundBind<V> {
    type Target = BindApi<V>;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

impl<V> BoundBind<V>
where
    V: Clone + PartialEq + 'static,
{
    /// Creates the core and mounts it.
    #[must_use]
    pub fn new(options: BindOptions<V>) -> Self {
        let api = Rc::new(BindApi::new(options));
        let mount = api.mount();
        Self { api, _mount: mount }
    }

    /// Returns the shared handle to the underlying core.
    #[must_use]
    pub fn api(&self) -> &Rc<BindApi<V>> {
        &self.api
    }

    /// Syncs the core's options from the host's current render.
    ///
    /// Side-effect-free with respect to rendering: this never notifies the
    /// store, so it cannot cause additional renders beyond the caller's own.
    pub fn sync_options(&self, options: BindOptions<V>) {
        self.api.update(options);
    }

    /// The item renderer: binds a render function to one value.
    ///
    /// `render` receives an [`ElementContext`] derived from the live
    /// snapshot. It runs once immediately and again on **every** store
    /// notification — the element subscribes to the entire snapshot rather
    /// than a projection, so multiple elements bound to the same value stay
    /// trivially consistent.
    pub fn element<R: 'static>(
        &self,
        value: V,
        render: impl Fn(&ElementContext<V>) -> R + 'static,
    ) -> RenderBinding<R> {
        let api_for_select = Rc::clone(&self.api);
        let value_for_select = value.clone();
        let select: Rc<dyn Fn() -> Result<(), UnknownValueError<V>>> =
            Rc::new(move || api_for_select.set_value(value_for_select.clone()));

        let context_for = move |state: &BindState<V>| ElementContext {
            value: value.clone(),
            is_active: state.value == value,
            active_value: state.value.clone(),
            select: Rc::clone(&select),
        };

        let initial = render(&context_for(&self.api.state()));
        let output = Rc::new(RefCell::new(initial));

        let output_sink = Rc::clone(&output);
        let subscription = self.api.store().subscribe(move |state| {
            *output_sink.borrow_mut() = render(&context_for(state));
        });

        RenderBinding::new(output, subscription)
    }

    /// The selector subscriber: binds a render function to a projection.
    ///
    /// `render` runs once immediately, then only when the projected value
    /// changes — the equality gate lives in the store's selected
    /// subscription, not here.
    pub fn subscribe<S, R>(
        &self,
        selector: impl Fn(&BindState<V>) -> S + 'static,
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

    /// [`BoundBind::subscribe`] with the identity projection.
    ///
    /// Re-renders when the snapshot itself changes; a no-op `set_value`
    /// leaves the output untouched.
    pub fn subscribe_state<R: 'static>(
        &self,
        render: impl Fn(&BindState<V>) -> R + 'static,
    ) -> RenderBinding<R> {
        self.subscribe(Clone::clone, render)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn tabs() -> BoundBind<&'static str> {
        BoundBind::new(BindOptions::new("tab1", ["tab1", "tab2"]))
    }

    #[test]
    fn element_renders_immediately_with_derived_context() {
        let bound = tabs();

        let binding = bound.element("tab2", |element| {
            format!(
                "{} active={} current={}",
                element.value, element.is_active, element.active_value
            )
        });

        assert_eq!(binding.output(), "tab2 active=false current=tab1");
    }

    #[test]
    fn element_rerenders_on_every_store_notification() {
        let bound = tabs();
        let renders = Rc::new(RefCell::new(0_u32));

        let renders_sink = Rc::clone(&renders);
        let binding = bound.element("tab1", move |element| {
            *renders_sink.borrow_mut() += 1;
            element.is_active
        });
        assert_eq!(*renders.borrow(), 1);

        bound.set_value("tab2").unwrap();
        assert!(!binding.output());

        // A no-op write still re-renders elements: they subscribe to the
        // whole snapshot, not a projection.
        bound.set_value("tab2").unwrap();
        assert_eq!(*renders.borrow(), 3);
    }

    #[test]
    fn select_activates_the_elements_value_synchronously() {
        let bound = tabs();

        let trigger = bound.element("tab2", |element| element.clone());
        let panel = bound.element("tab2", |element| element.is_active);

        trigger.output().select().unwrap();

        // By the time select returns, both bindings observed the new state.
        assert!(panel.output());
        assert_eq!(bound.state().value, "tab2");
    }

    #[test]
    fn multiple_elements_bound_to_the_same_value_stay_consistent() {
        let bound = tabs();

        let a = bound.element("tab2", |element| element.is_active);
        let b = bound.element("tab2", |element| element.is_active);

        bound.set_value("tab2").unwrap();

        assert!(a.output());
        assert!(b.output());
    }

    #[test]
    fn subscribe_rerenders_only_when_the_projection_changes() {
        let bound = tabs();
        let renders = Rc::new(RefCell::new(Vec::new()));

        let renders_sink = Rc::clone(&renders);
        let binding = bound.subscribe(
            |state| state.value,
            move |value| {
                renders_sink.borrow_mut().push(*value);
                String::from(*value)
            },
        );
        assert_eq!(binding.output(), "tab1");

        bound.set_value("tab2").unwrap();
        bound.set_value("tab2").unwrap(); // projection unchanged
        bound.reset().unwrap();

        assert_eq!(*renders.borrow(), ["tab1", "tab2", "tab1"]);
    }

    #[test]
    fn subscribe_state_skips_no_op_writes() {
        let bound = tabs();
        let renders = Rc::new(RefCell::new(0_u32));

        let renders_sink = Rc::clone(&renders);
        let _binding = bound.subscribe_state(move |state| {
            *renders_sink.borrow_mut() += 1;
            state.value
        });

        bound.set_value("tab1").unwrap(); // snapshot unchanged
        bound.set_value("tab2").unwrap();

        assert_eq!(*renders.borrow(), 2);
    }

    #[test]
    fn sync_options_never_rerenders() {
        let bound = tabs();
        let renders = Rc::new(RefCell::new(0_u32));

        let renders_sink = Rc::clone(&renders);
        let _binding = bound.element("tab1", move |_| {
            *renders_sink.borrow_mut() += 1;
        });

        bound.sync_options(BindOptions::new("tab2", ["tab1", "tab2"]));

        assert_eq!(*renders.borrow(), 1, "only the initial render may run");
        assert_eq!(bound.state().value, "tab1");
    }

    #[test]
    fn dropping_a_binding_unmounts_it() {
        let bound = tabs();
        let renders = Rc::new(RefCell::new(0_u32));

        let renders_sink = Rc::clone(&renders);
        let binding = bound.element("tab1", move |_| {
            *renders_sink.borrow_mut() += 1;
        });
        binding.unbind();

        bound.set_value("tab2").unwrap();

        assert_eq!(*renders.borrow(), 1);
        assert_eq!(bound.store().subscriber_count(), 0);
    }

    #[test]
    fn deref_exposes_the_core_surface() {
        let bound = tabs();
        bound.set_value("tab2").unwrap();
        assert_eq!(bound.state().value, "tab2");
        bound.reset().unwrap();
        assert_eq!(bound.state().value, "tab1");
    }
}
