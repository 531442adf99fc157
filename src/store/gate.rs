//! Refresh re-entrancy guard.
//!
//! Each [`crate::store::Store`] owns one [`RefreshGate`]. A refresh moves the
//! gate from `Idle` to `Refreshing` and the returned [`RefreshGuard`] moves it
//! back when dropped, whether the refresh succeeded or failed. A refresh that
//! finds the gate busy is dropped, not queued.

use crate::core::period::MonthKey;
use std::sync::{Mutex, PoisonError};

/// Where a store's refresh cycle currently is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh in flight
    #[default]
    Idle,
    /// A refresh holds the gate
    Refreshing,
}

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was in flight; nothing was read or written
    Skipped,
    /// The snapshot was reloaded
    Completed {
        /// Month the snapshot now holds
        month: MonthKey,
        /// Recurring incomes created by this refresh
        materialized: usize,
    },
}

/// Admits at most one refresh at a time.
#[derive(Debug, Default)]
pub struct RefreshGate {
    state: Mutex<RefreshState>,
}

impl RefreshGate {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the gate.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enters the refreshing state, or returns `None` when a refresh is
    /// already in flight.
    #[must_use]
    pub fn try_begin(&self) -> Option<RefreshGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == RefreshState::Refreshing {
            return None;
        }
        *state = RefreshState::Refreshing;
        Some(RefreshGuard { gate: self })
    }
}

/// Holds the gate in the refreshing state until dropped.
#[derive(Debug)]
pub struct RefreshGuard<'a> {
    gate: &'a RefreshGate,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        *self
            .gate
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = RefreshState::Idle;
    }
}
