// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value membership checking policy.

use core::fmt;

/// Error returned when a value is rejected by [`ValueChecking::Strict`].
#[derive(Clone, PartialEq, Eq)]
pub struct UnknownValueError<V> {
    /// The value that is not part of the configured candidate set.
    pub value: V,
}

impl<V: fmt::Debug> fmt::Debug for UnknownValueError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnknownValueError {{ value: {:?} }}", self.value)
    }
}

impl<V: fmt::Debug> fmt::Display for UnknownValueError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {:?} is not in the configured candidate set",
            self.value
        )
    }
}

impl<V: fmt::Debug> core::error::Error for UnknownValueError<V> {}

/// How to handle values outside the configured candidate set.
///
/// The permissive contract trusts callers and performs no runtime membership
/// checks; whether an embedder wants them depends on how the candidate set is
/// produced. This enum makes that an explicit configuration choice instead of
/// a silent guess.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ValueChecking {
    /// Accept any value without checking membership.
    ///
    /// This is the default: an active value outside the candidate set is the
    /// caller's responsibility.
    #[default]
    Permissive,
    /// Panic in debug builds on an unknown value, accept it in release builds.
    ///
    /// Catches wiring bugs during development with zero cost in release.
    DebugAssert,
    /// Reject unknown values with [`UnknownValueError`] before any state change.
    Strict,
}

impl ValueChecking {
    /// Checks `value` against `candidates` according to this policy.
    ///
    /// # Errors
    ///
    /// - [`UnknownValueError`]: Returned when the policy is
    ///   [`ValueChecking::Strict`] and `value` is not in `candidates`.
    pub fn check<V>(self, value: &V, candidates: &[V]) -> Result<(), UnknownValueError<V>>
    where
        V: Clone + PartialEq,
    {
        match self {
            Self::Permissive => Ok(()),
            Self::DebugAssert => {
                debug_assert!(
                    candidates.contains(value),
                    "value is not in the configured candidate set"
                );
                Ok(())
            }
            Self::Strict => {
                if candidates.contains(value) {
                    Ok(())
                } else {
                    Err(UnknownValueError {
                        value: value.clone(),
                    })
                }
            }
        }
    }
}
