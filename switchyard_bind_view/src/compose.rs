// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition registry: named component groups bound to selections.
//!
//! A [`BindComposer`] is built once, up front, from a library of named
//! component groups plus the pair of context slots those components read
//! from. Consumers then call [`BindComposer::bind_group`] to get an
//! [`AppBind`]: the ordinary view adapter with every element render context
//! pre-merged with the matching group's components, so render functions can
//! pull pre-wired widgets straight out of their context.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use hashbrown::HashMap;
use switchyard_bind::BindOptions;

use crate::bound::{BoundBind, ElementContext, RenderBinding};
use crate::context::{ContextSlot, MissingContextError};

/// A renderable component: children in, rendered output out.
///
/// Components read ambient selection state through the context slots they
/// captured at registration time rather than through arguments.
pub type Component<R> = Rc<dyn Fn(R) -> R>;

/// A named group of components (for example `Tab` and `TabPanel`).
pub type ComponentGroup<R> = HashMap<&'static str, Component<R>>;

/// The component library: group name to component group.
pub type ComponentGroups<R> = HashMap<&'static str, ComponentGroup<R>>;

/// Wraps a closure as a [`Component`].
pub fn component<R>(render: impl Fn(R) -> R + 'static) -> Component<R> {
    Rc::new(render)
}

/// Error returned when [`BindComposer::bind_group`] is given an unregistered
/// group name.
///
/// Group membership cannot be enforced at compile time with runtime map
/// keys, so the check happens here.
#[derive(Clone, PartialEq, Eq)]
pub struct UnknownGroupError {
    /// The group name that is not in the registry.
    pub group: &'static str,
}

impl fmt::Debug for UnknownGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnknownGroupError {{ group: {:?} }}", self.group)
    }
}

impl fmt::Display for UnknownGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component group {:?} is not registered", self.group)
    }
}

impl core::error::Error for UnknownGroupError {}

/// The two context slots backing one composition registry.
///
/// - The **element slot** carries the live [`ElementContext`] while an
///   `app_element` render function runs, so nested components can ask "am I
///   active, how do I select myself" without prop drilling.
/// - The **bind slot** carries the extended API while an [`AppBind::provide`]
///   scope is active, so deeply nested components can read or mutate the
///   selection directly.
///
/// Create one `BindContexts` per registry and share it (via `Rc`) between
/// the composer and the components registered with it.
pub struct BindContexts<V, R> {
    element: ContextSlot<ElementContext<V>>,
    bind: ContextSlot<Rc<AppBind<V, R>>>,
}

impl<V: Clone, R> BindContexts<V, R> {
    /// Creates the slot pair.
    #[must_use]
    pub fn new() -> Self {
        Self {
            element: ContextSlot::new("element context"),
            bind: ContextSlot::new("bind context"),
        }
    }

    /// Returns the element slot.
    #[must_use]
    pub fn element(&self) -> &ContextSlot<ElementContext<V>> {
        &self.element
    }

    /// Returns the bind slot.
    #[must_use]
    pub fn bind(&self) -> &ContextSlot<Rc<AppBind<V, R>>> {
        &self.bind
    }

    /// Returns the element context of the innermost `app_element` render.
    ///
    /// # Errors
    ///
    /// - [`MissingContextError`]: Returned outside any `app_element` render.
    pub fn current_element(&self) -> Result<ElementContext<V>, MissingContextError> {
        self.element.current()
    }

    /// Returns the extended API of the innermost [`AppBind::provide`] scope.
    ///
    /// # Errors
    ///
    /// - [`MissingContextError`]: Returned outside any `provide` scope.
    pub fn current_bind(&self) -> Result<Rc<AppBind<V, R>>, MissingContextError> {
        self.bind.current()
    }
}

impl<V: Clone, R> Default for BindContexts<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> fmt::Debug for BindContexts<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindContexts")
            .field("element", &self.element)
            .field("bind", &self.bind)
            .finish()
    }
}

/// The composition registry factory.
///
/// Holds the component library and the context slots; hands out bound
/// selections via [`BindComposer::bind_group`].
pub struct BindComposer<V, R> {
    contexts: Rc<BindContexts<V, R>>,
    groups: ComponentGroups<R>,
}

impl<V, R> fmt::Debug for BindComposer<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups: Vec<&str> = self.groups.keys().copied().collect();
        groups.sort_unstable();
        f.debug_struct("BindComposer")
            .field("contexts", &self.contexts)
            .field("groups", &groups)
            .finish()
    }
}

impl<V, R> BindComposer<V, R>
where
    V: Clone + PartialEq + 'static,
    R: 'static,
{
    /// Creates a composer over the given slots and component library.
    #[must_use]
    pub fn new(contexts: Rc<BindContexts<V, R>>, groups: ComponentGroups<R>) -> Self {
        Self { contexts, groups }
    }

    /// Returns the context slots this composer provides into.
    #[must_use]
    pub fn contexts(&self) -> &Rc<BindContexts<V, R>> {
        &self.contexts
    }

    /// Binds a new selection to the named component group.
    ///
    /// Creates one core (options semantics as in [`BoundBind::new`]) and
    /// pairs it with `groups[group]`. The same registry can bind any number
    /// of independent selections, to the same group or different ones.
    ///
    /// # Errors
    ///
    /// - [`UnknownGroupError`]: Returned when `group` was not registered.
    pub fn bind_group(
        &self,
        group: &'static str,
        options: BindOptions<V>,
    ) -> Result<Rc<AppBind<V, R>>, UnknownGroupError> {
        let components = self
            .groups
            .get(group)
            .cloned()
            .ok_or(UnknownGroupError { group })?;
        Ok(Rc::new_cyclic(|this| AppBind {
            bound: BoundBind::new(options),
            contexts: Rc::clone(&self.contexts),
            components,
            this: this.clone(),
        }))
    }
}

/// Element render context merged with the bound group's components.
///
/// Dereferences to the plain [`ElementContext`], so `is_active`, `value`,
/// `active_value`, and `select` are available directly; the group's
/// components are reachable by name through [`AppElementContext::component`].
/// The string-keyed lookup surface contains only components, so a component
/// named like a context field shadows nothing.
pub struct AppElementContext<'a, V, R> {
    element: &'a ElementContext<V>,
    components: &'a ComponentGroup<R>,
}

impl<V, R> Deref for AppElementContext<'_, V, R> {
    type Target = ElementContext<V>;

    fn deref(&self) -> &Self::Target {
        self.element
    }
}

impl<V: fmt::Debug, R> fmt::Debug for AppElementContext<'_, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<&str> = self.components.keys().copied().collect();
        components.sort_unstable();
        f.debug_struct("AppElementContext")
            .field("element", &self.element)
            .field("components", &components)
            .finish()
    }
}

impl<V, R> AppElementContext<'_, V, R> {
    /// Returns the plain element context.
    #[must_use]
    pub fn element(&self) -> &ElementContext<V> {
        self.element
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

/// A selection bound to a component group: the extended API.
///
/// Everything [`BoundBind`] exposes (and, through it, the core itself), plus
/// the composition surface: [`AppBind::app_element`] and
/// [`AppBind::provide`]. Handed out as `Rc` so the provide scope can share
/// the exact same instance with nested readers.
pub struct AppBind<V, R> {
    bound: BoundBind<V>,
    contexts: Rc<BindContexts<V, R>>,
    components: ComponentGroup<R>,
    // Self-handle for `provide`; always upgradable while `self` is reachable
    // because instances are only constructed behind `Rc` by `bind_group`.
    this: Weak<Self>,
}

impl<V: fmt::Debug, R> fmt::Debug for AppBind<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<&str> = self.components.keys().copied().collect();
        components.sort_unstable();
        f.debug_struct("AppBind")
            .field("bound", &self.bound)
            .field("components", &components)
            .finish_non_exhaustive()
    }
}

impl<V, R> Deref for AppBind<V, R> {
    type Target = BoundBind<V>;

    fn deref(&self) -> &Self::Target {
        &self.bound
    }
}

impl<V, R> AppBind<V, R>
where
    V: Clone + PartialEq + 'static,
    R: 'static,
{
    /// Returns the underlying view adapter.
    #[must_use]
    pub fn bound(&self) -> &BoundBind<V> {
        &self.bound
    }

    /// Returns the bound component group.
    #[must_use]
    pub fn components(&self) -> &ComponentGroup<R> {
        &self.components
    }

    /// The item renderer with composition.
    ///
    /// Identical to [`BoundBind::element`] except that `render` receives an
    /// [`AppElementContext`] (element context merged with the group's
    /// components), and for the duration of each render call the element
    /// context is provided into the element slot so nested components can
    /// read it instead of receiving it as an argument.
    pub fn app_element(
        &self,
        value: V,
        render: impl Fn(&AppElementContext<'_, V, R>) -> R + 'static,
    ) -> RenderBinding<R> {
        let contexts = Rc::clone(&self.contexts);
        let components = self.components.clone();
        self.bound.element(value, move |element| {
            contexts.element.provide(element.clone(), || {
                render(&AppElementContext {
                    element,
                    components: &components,
                })
            })
        })
    }

    /// The wrapper: provides this extended API for the duration of `children`.
    ///
    /// Inside the scope, [`BindContexts::current_bind`] returns this exact
    /// instance (`Rc` identity holds). No other effect.
    pub fn provide<U>(&self, children: impl FnOnce() -> U) -> U {
        let this = self
            .this
            .upgrade()
            .expect("AppBind is only constructed behind Rc");
        self.contexts.bind.provide(this, children)
    }
}
