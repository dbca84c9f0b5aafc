//! Typed event queue feeding the player
//!
//! Native surface adapters and cast adapters never touch player state. They
//! push [`PlayerEvent`]s through an [`EventSender`]; the controller drains the
//! queue in arrival order and handles each event to completion.

use crate::cast::RemoteEventType;
use crate::media::MediaEventKind;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

/// Everything that can change player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A native event fired by the media surface
    Native(MediaEventKind),

    /// A `<source>` child of the surface failed to load
    SourceFailed { index: usize },

    /// A change notification from the cast framework
    Remote(RemoteEventType),
}

/// Cloneable producer handle
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<PlayerEvent>,
}

impl EventSender {
    /// Push an event; silently dropped once the player is gone
    pub fn send(&self, event: PlayerEvent) {
        if self.tx.send(event).is_err() {
            trace!("Dropping {:?}, player no longer listening", event);
        }
    }

    pub fn native(&self, kind: MediaEventKind) {
        self.send(PlayerEvent::Native(kind));
    }

    pub fn remote(&self, kind: RemoteEventType) {
        self.send(PlayerEvent::Remote(kind));
    }
}

/// Unbounded FIFO owned by the controller
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<PlayerEvent>,
    rx: Receiver<PlayerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    /// Next pending event, if any
    pub fn try_next(&self) -> Option<PlayerEvent> {
        self.rx.try_recv().ok()
    }

    /// Discard everything pending
    pub fn clear(&self) -> usize {
        self.rx.try_iter().count()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
