//! Player state machine and diagnostic log
//!
//! State only moves in response to native (or remote) events. Host transport
//! calls go to the surface, and the surface's events come back here.

use crate::media::MediaEventKind;
use crate::player::PlayerState;
use log::debug;
use serde::Serialize;

/// One diagnostic record: which event arrived and the state at that moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    #[serde(rename = "event name")]
    pub event_name: String,
    pub state: PlayerState,
}

/// A state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlayerState,
    pub to: PlayerState,
}

/// Result of feeding one event to the machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub transition: Option<Transition>,
    /// Metadata arrived for the first time since construction
    pub became_ready: bool,
}

/// Canonical player state plus the unbounded event log
#[derive(Debug)]
pub struct PlayerStateMachine {
    state: PlayerState,
    ready: bool,
    log: Vec<LogEntry>,
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Unstarted,
            ready: false,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether `loadedmetadata` has been seen
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Append a log record tagged with the current state
    pub fn record(&mut self, event_name: &str) {
        self.log.push(LogEntry {
            event_name: event_name.to_string(),
            state: self.state,
        });
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.log
    }

    /// Apply the transition rule for `kind`
    pub fn apply(&mut self, kind: MediaEventKind) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        let next = match (kind, self.state) {
            (MediaEventKind::LoadedMetadata, _) => {
                if !self.ready {
                    self.ready = true;
                    outcome.became_ready = true;
                }
                match self.state {
                    PlayerState::Unstarted => Some(PlayerState::Paused),
                    _ => None,
                }
            }
            (MediaEventKind::Play, PlayerState::Buffering) => None,
            (MediaEventKind::Play, _) => Some(PlayerState::Buffering),
            (MediaEventKind::Playing, _) => Some(PlayerState::Playing),
            (MediaEventKind::Pause, PlayerState::Playing | PlayerState::Buffering) => {
                Some(PlayerState::Paused)
            }
            (MediaEventKind::Ended, _) => Some(PlayerState::Ended),
            _ => None,
        };

        if let Some(to) = next.filter(|to| *to != self.state) {
            debug!("Player state {:?} -> {:?} on {}", self.state, to, kind);
            outcome.transition = Some(Transition { from: self.state, to });
            self.state = to;
        }

        outcome
    }
}

impl Default for PlayerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
