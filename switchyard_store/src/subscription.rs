// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription guards.

use alloc::boxed::Box;
use core::fmt;

/// Removes a store listener when dropped or explicitly unsubscribed.
///
/// Returned by [`Store::subscribe`](crate::Store::subscribe) and
/// [`Store::subscribe_selected`](crate::Store::subscribe_selected). The
/// listener stays registered for exactly as long as this guard is alive, so a
/// rendering unit typically keeps its `Subscription` next to whatever state
/// the listener feeds.
///
/// Unsubscribing is idempotent by construction: the removal closure runs at
/// most once, and it is a no-op if the store itself has already been dropped.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: Box<dyn FnOnce()>) -> Self {
        Self {
            cancel: Some(cancel),
        }
    }

    /// Removes the listener now instead of at drop time.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}
