//! Host callback contract
//!
//! The host registers up to three callbacks when it builds the player.
//! Unregistered callbacks are no-ops.

use crate::player::PlayerState;

/// Payload of `on_state_change`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub data: PlayerState,
}

type ReadyCallback = Box<dyn FnMut() + Send>;
type StateChangeCallback = Box<dyn FnMut(StateChange) + Send>;
type ErrorCallback = Box<dyn FnMut() + Send>;

/// Callbacks supplied by the host
#[derive(Default)]
pub struct PlayerEvents {
    on_ready: Option<ReadyCallback>,
    on_state_change: Option<StateChangeCallback>,
    on_error: Option<ErrorCallback>,
}

impl PlayerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once, when metadata first loads
    pub fn on_ready<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_ready = Some(Box::new(callback));
        self
    }

    /// Called on every state transition with the new state
    pub fn on_state_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(StateChange) + Send + 'static,
    {
        self.on_state_change = Some(Box::new(callback));
        self
    }

    /// Called when the surface or its last source fails
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub(crate) fn ready(&mut self) {
        if let Some(callback) = self.on_ready.as_mut() {
            callback();
        }
    }

    pub(crate) fn state_changed(&mut self, state: PlayerState) {
        if let Some(callback) = self.on_state_change.as_mut() {
            callback(StateChange { data: state });
        }
    }

    pub(crate) fn error(&mut self) {
        if let Some(callback) = self.on_error.as_mut() {
            callback();
        }
    }
}

impl std::fmt::Debug for PlayerEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerEvents")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
