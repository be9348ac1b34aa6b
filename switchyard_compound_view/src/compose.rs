// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition registry for compound selections.
//!
//! Structurally the same registry as `switchyard_bind_view::BindComposer`,
//! rebuilt around the listener-less compound core: named component groups are
//! registered once, and [`CompoundComposer::bind_group`] hands out an
//! [`AppCompound`] whose slot render contexts are pre-merged with the
//! matching group's components.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use switchyard_bind_view::{
    Component, ComponentGroup, ComponentGroups, ContextSlot, MissingContextError,
    UnknownGroupError,
};
use switchyard_compound::CompoundOptions;

use crate::bound::{BoundCompound, RenderBinding, SlotContext};

/// The two context slots backing one compound registry.
///
/// - The **slot slot** carries the live [`SlotContext`] while an `app_slot`
///   render function runs.
/// - The **compound slot** carries the extended API while an
///   [`AppCompound::provide`] scope is active.
///
/// Create one `CompoundContexts` per registry and share it (via `Rc`) between
/// the composer and the components registered with it.
pub struct CompoundContexts<V, R> {
    slot: ContextSlot<SlotContext<V>>,
    compound: ContextSlot<Rc<AppCompound<V, R>>>,
}

impl<V: Clone, R> CompoundContexts<V, R> {
    /// Creates the slot pair.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: ContextSlot::new("slot context"),
            compound: ContextSlot::new("compound context"),
        }
    }

    /// Returns the slot-context slot.
    #[must_use]
    pub fn slot(&self) -> &ContextSlot<SlotContext<V>> {
        &self.slot
    }

    /// Returns the compound slot.
    #[must_use]
    pub fn compound(&self) -> &ContextSlot<Rc<AppCompound<V, R>>> {
        &self.compound
    }

    /// Returns the slot context of the innermost `app_slot` render.
    ///
    /// # Errors
    ///
    /// - [`MissingContextError`]: Returned outside any `app_slot` render.
    pub fn current_slot(&self) -> Result<SlotContext<V>, MissingContextError> {
        self.slot.current()
    }

    /// Returns the extended API of the innermost [`AppCompound::provide`]
    /// scope.
    ///
    /// # Errors
    ///
    /// - [`MissingContextError`]: Returned outside any `provide` scope.
    pub fn current_compound(&self) -> Result<Rc<AppCompound<V, R>>, MissingContextError> {
        self.compound.current()
    }
}

impl<V: Clone, R> Default for CompoundContexts<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> fmt::Debug for CompoundContexts<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundContexts")
            .field("slot", &self.slot)
            .field("compound", &self.compound)
            .finish()
    }
}

/// The compound composition registry factory.
pub struct CompoundComposer<V, R> {
    contexts: Rc<CompoundContexts<V, R>>,
    groups: ComponentGroups<R>,
}

impl<V, R> fmt::Debug for CompoundComposer<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups: Vec<&str> = self.groups.keys().copied().collect();
        groups.sort_unstable();
        f.debug_struct("CompoundComposer")
            .field("contexts", &self.contexts)
            .field("groups", &groups)
            .finish()
    }
}

impl<V, R> CompoundComposer<V, R>
where
    V: Clone + PartialEq + 'static,
    R: 'static,
{
    /// Creates a composer over the given slots and component library.
    #[must_use]
    pub fn new(contexts: Rc<CompoundContexts<V, R>>, groups: ComponentGroups<R>) -> Self {
        Self { contexts, groups }
    }

    /// Returns the context slots this composer provides into.
    #[must_use]
    pub fn contexts(&self) -> &Rc<CompoundContexts<V, R>> {
        &self.contexts
    }

    /// Binds a new compound selection to the named component group.
    ///
    /// # Errors
    ///
    /// - [`UnknownGroupError`]: Returned when `group` was not registered.
    pub fn bind_group(
        &self,
        group: &'static str,
        options: CompoundOptions<V>,
    ) -> Result<Rc<AppCompound<V, R>>, UnknownGroupError> {
        let components = self
            .groups
            .get(group)
            .cloned()
            .ok_or(UnknownGroupError { group })?;
        Ok(Rc::new_cyclic(|this| AppCompound {
            bound: BoundCompound::new(options),
            contexts: Rc::clone(&self.contexts),
            components,
            this: this.clone(),
        }))
    }
}

/// Slot render context merged with the bound group's components.
///
/// Dereferences to the plain [`SlotContext`]; the group's components are
/// reachable by name through [`AppSlotContext::component`].
pub struct AppSlotContext<'a, V, R> {
    slot: &'a SlotContext<V>,
    components: &'a ComponentGroup<R>,
}

impl<V, R> Deref for AppSlotContext<'_, V, R> {
    type Target = SlotContext<V>;

    fn deref(&self) -> &Self::Target {
        self.slot
    }
}

impl<V: fmt::Debug, R> fmt::Debug for AppSlotContext<'_, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<&str> = self.components.keys().copied().collect();
        components.sort_unstable();
        f.debug_struct("AppSlotContext")
            .field("slot", &self.slot)
            .field("components", &components)
            .finish()
    }
}

impl<V, R> AppSlotContext<'_, V, R> {
    /// Returns the plain slot context.
    #[must_use]
    pub fn slot(&self) -> &SlotContext<V> {
        self.slot
    }

    /// Looks up a component of the bound group by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component<R>> {
        self.components.get(name)
    }

    /// Renders the named component with `children`.
    ///
    /// Returns `None` when the group has no component of that name.
    #[must_use]
    pub fn render(&self, name: &str, children: R) -> Option<R> {
        self.components.get(name).map(|render| render(children))
    }
}

/// A compound selection bound to a component group: the extended API.
///
/// Everything [`BoundCompound`] exposes (and, through it, the core itself),
/// plus [`AppCompound::app_slot`] and [`AppCompound::provide`]. Handed out as
/// `Rc` so the provide scope can share the exact same instance with nested
/// readers.
pub struct AppCompound<V, R> {
    bound: BoundCompound<V>,
    contexts: Rc<CompoundContexts<V, R>>,
    components: ComponentGroup<R>,
    // Self-handle for `provide`; always upgradable while `self` is reachable
    // because instances are only constructed behind `Rc` by `bind_group`.
    this: Weak<Self>,
}

impl<V: fmt::Debug, R> fmt::Debug for AppCompound<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<&str> = self.components.keys().copied().collect();
        components.sort_unstable();
        f.debug_struct("AppCompound")
            .field("bound", &self.bound)
            .field("components", &components)
            .finish_non_exhaustive()
    }
}

impl<V, R> Deref for AppCompound<V, R> {
    type Target = BoundCompound<V>;

    fn deref(&self) -> &Self::Target {
        &self.bound
    }
}

impl<V, R> AppCompound<V, R>
where
    V: Clone + PartialEq + 'static,
    R: 'static,
{
    /// Returns the underlying view adapter.
    #[must_use]
    pub fn bound(&self) -> &BoundCompound<V> {
        &self.bound
    }

    /// Returns the bound component group.
    #[must_use]
    pub fn components(&self) -> &ComponentGroup<R> {
        &self.components
    }

    /// The slot renderer with composition.
    ///
    /// Identical to [`BoundCompound::slot`] except that `render` receives an
    /// [`AppSlotContext`], and for the duration of each render call the slot
    /// context is provided into the slot-context slot so nested components
    /// can read it instead of receiving it as an argument.
    pub fn app_slot(
        &self,
        variant: V,
        render: impl Fn(&AppSlotContext<'_, V, R>) -> R + 'static,
    ) -> RenderBinding<R> {
        let contexts = Rc::clone(&self.contexts);
        let components = self.components.clone();
        self.bound.slot(variant, move |slot| {
            contexts.slot.provide(slot.clone(), || {
                render(&AppSlotContext {
                    slot,
                    components: &components,
                })
            })
        })
    }

    /// The wrapper: provides this extended API for the duration of `children`.
    ///
    /// Inside the scope, [`CompoundContexts::current_compound`] returns this
    /// exact instance (`Rc` identity holds). No other effect.
    pub fn provide<U>(&self, children: impl FnOnce() -> U) -> U {
        let this = self
            .this
            .upgrade()
            .expect("AppCompound is only constructed behind Rc");
        self.contexts.compound.provide(this, children)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::format;
    use alloc::string::String;
    use switchyard_bind_view::component;

    type StepContexts = Rc<CompoundContexts<u32, String>>;

    /// A `Step`/`StepBody` group whose components read the slot context.
    fn step_group(contexts: &StepContexts) -> ComponentGroup<String> {
        let mut group = ComponentGroup::new();

        let slot = contexts.slot().clone();
        group.insert(
            "Step",
            component(move |children: String| {
                let context = slot.current().unwrap();
                format!("<step current={}>{children}</step>", context.is_active)
            }),
        );

        let slot = contexts.slot().clone();
        group.insert(
            "StepBody",
            component(move |children: String| {
                let context = slot.current().unwrap();
                if context.is_active {
                    format!("<body>{children}</body>")
                } else {
                    String::new()
                }
            }),
        );

        group
    }

    fn step_composer() -> (StepContexts, CompoundComposer<u32, String>) {
        let contexts: StepContexts = Rc::new(CompoundContexts::new());
        let mut groups = ComponentGroups::new();
        groups.insert("Step", step_group(&contexts));
        let composer = CompoundComposer::new(Rc::clone(&contexts), groups);
        (contexts, composer)
    }

    #[test]
    fn bind_group_rejects_unregistered_groups() {
        let (_contexts, composer) = step_composer();

        let error = composer
            .bind_group("Accordion", CompoundOptions::new(1, [1]))
            .unwrap_err();

        assert_eq!(error.group, "Accordion");
    }

    #[test]
    fn app_slot_context_merges_slot_fields_and_group_components() {
        let (_contexts, composer) = step_composer();
        let steps = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2, 3]))
            .unwrap();

        let binding = steps.app_slot(1, |context| {
            assert!(context.is_active);
            assert_eq!(context.variant, 1);
            assert!(context.component("Step").is_some());
            assert!(context.component("Missing").is_none());
            context.render("Step", String::from("One")).unwrap()
        });

        assert_eq!(binding.output(), "<step current=true>One</step>");
    }

    #[test]
    fn nested_components_read_the_slot_during_render() {
        let (contexts, composer) = step_composer();
        let steps = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2]))
            .unwrap();

        let body = steps.app_slot(2, |context| {
            context.render("StepBody", String::from("Details")).unwrap()
        });
        assert_eq!(body.output(), "");

        steps.set_variant(2).unwrap();
        assert_eq!(body.output(), "<body>Details</body>");

        // Outside any render, the slot is empty again.
        assert!(contexts.current_slot().is_err());
    }

    #[test]
    fn provide_exposes_the_exact_extended_api_by_identity() {
        let (contexts, composer) = step_composer();
        let steps = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2]))
            .unwrap();

        steps.provide(|| {
            let ambient = contexts.current_compound().unwrap();
            assert!(
                Rc::ptr_eq(&ambient, &steps),
                "provide must share the same instance"
            );

            ambient.set_variant(2).unwrap();
        });

        assert_eq!(steps.state().active_variant, 2);
        assert!(contexts.current_compound().is_err());
    }

    #[test]
    fn two_bound_selections_from_one_registry_are_independent() {
        let (_contexts, composer) = step_composer();
        let first = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2]))
            .unwrap();
        let second = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2]))
            .unwrap();

        first.set_variant(2).unwrap();

        assert_eq!(first.state().active_variant, 2);
        assert_eq!(second.state().active_variant, 1);
    }

    #[test]
    fn app_slot_rerenders_components_on_variant_change() {
        let (_contexts, composer) = step_composer();
        let steps = composer
            .bind_group("Step", CompoundOptions::new(1, [1, 2]))
            .unwrap();

        let step_one = steps.app_slot(1, |context| {
            context.render("Step", String::from("1")).unwrap()
        });
        let step_two = steps.app_slot(2, |context| {
            context.render("Step", String::from("2")).unwrap()
        });

        assert_eq!(step_one.output(), "<step current=true>1</step>");
        assert_eq!(step_two.output(), "<step current=false>2</step>");

        steps.set_variant(2).unwrap();

        assert_eq!(step_one.output(), "<step current=false>1</step>");
        assert_eq!(step_two.output(), "<step current=true>2</step>");
    }
}
