// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped context slots.
//!
//! The composition layer needs to hand ambient state to nested components
//! without threading it through every argument list. Instead of a global
//! lookup, this module provides [`ContextSlot`]: an explicit
//! scoped-environment value that is pushed for the duration of a closure and
//! readable by anything that holds a handle to the slot. Reading outside any
//! provider scope is a hard error ([`MissingContextError`]), matching the
//! "used outside provider" contract of the composition registry.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Error returned when a context slot is read outside any provider scope.
///
/// Fatal to the calling render: there is no fallback value, so callers
/// propagate it (or let the host's error handling surface it).
#[derive(Clone, PartialEq, Eq)]
pub struct MissingContextError {
    /// The name of the slot that was read.
    pub slot: &'static str,
}

impl fmt::Debug for MissingContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MissingContextError {{ slot: {:?} }}", self.slot)
    }
}

impl fmt::Display for MissingContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accessed outside of a provider scope",
            self.slot
        )
    }
}

impl core::error::Error for MissingContextError {}

/// A scoped slot for ambient values.
///
/// A `ContextSlot` is a cheap handle: clones alias the same underlying
/// stack, so a component can capture a clone at construction time and read
/// whatever value is provided around it at render time.
///
/// Values are provided for the duration of a closure and removed when it
/// returns (including on unwind). Provider scopes nest; [`ContextSlot::current`]
/// reads the innermost one.
///
/// # Example
///
/// ```
/// use switchyard_bind_view::ContextSlot;
///
/// let slot = ContextSlot::new("theme context");
/// assert!(slot.current().is_err());
///
/// let rendered = slot.provide("dark", || {
///     slot.current().unwrap()
/// });
/// assert_eq!(rendered, "dark");
/// assert!(slot.current().is_err());
/// ```
pub struct ContextSlot<T> {
    name: &'static str,
    stack: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for ContextSlot<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            stack: Rc::clone(&self.stack),
        }
    }
}

impl<T> fmt::Debug for ContextSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSlot")
            .field("name", &self.name)
            .field("depth", &self.stack.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone> ContextSlot<T> {
    /// Creates an empty slot.
    ///
    /// `name` identifies the slot in [`MissingContextError`] messages.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stack: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Returns the slot's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` while at least one provider scope is active.
    #[must_use]
    pub fn is_provided(&self) -> bool {
        !self.stack.borrow().is_empty()
    }

    /// Provides `value` for the duration of `scope`.
    ///
    /// The value is popped when `scope` returns, even if it unwinds.
    pub fn provide<U>(&self, value: T, scope: impl FnOnce() -> U) -> U {
        self.stack.borrow_mut().push(value);
        let _pop = PopGuard { stack: &self.stack };
        scope()
    }

    /// Returns the innermost provided value.
    ///
    /// # Errors
    ///
    /// - [`MissingContextError`]: Returned when no provider scope is active.
    pub fn current(&self) -> Result<T, MissingContextError> {
        self.stack
            .borrow()
            .last()
            .cloned()
            .ok_or(MissingContextError { slot: self.name })
    }
}

struct PopGuard<'a, T> {
    stack: &'a Rc<RefCell<Vec<T>>>,
}

impl<T> Drop for PopGuard<'_, T> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
