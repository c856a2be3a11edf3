// Flow State
// Loading/error state machine owned by each asynchronous flow (pagination, profile, deep analysis)

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FlowState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed { message: String },
}

impl FlowState {
    /// Enter `Loading`. Returns false, leaving the state alone, when already loading.
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = Self::Loading;
        true
    }

    pub fn succeed(&mut self) {
        *self = Self::Succeeded;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = Self::Failed {
            message: message.into(),
        };
    }

    /// Back to `Idle`, dropping any recorded outcome.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Lock flow-owning state. A panic while holding the lock does not wedge the flow.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases a flow's `Loading` state when dropped.
///
/// Created right after `begin()`. If the request future is dropped before an
/// outcome is recorded (timeout, `select!`, aborted task), the flow returns to
/// `Idle` so the next trigger goes through.
pub(crate) struct LoadingGuard<'a, T> {
    state: &'a Mutex<T>,
    flow: fn(&mut T) -> &mut FlowState,
}

impl<'a, T> LoadingGuard<'a, T> {
    pub(crate) fn new(state: &'a Mutex<T>, flow: fn(&mut T) -> &mut FlowState) -> Self {
        Self { state, flow }
    }
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        let flow = (self.flow)(&mut *state);
        if flow.is_loading() {
            flow.reset();
        }
    }
}
