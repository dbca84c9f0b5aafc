//! Player module for html5-video
//!
//! The player mirrors the YouTube IFrame API so that hosts can drive an
//! HTML5 video element and a YouTube player through the same calls and read
//! the same state codes. It coordinates the local surface, the optional cast
//! bridge, the state machine and the host callbacks.

mod controller;
mod dispatch;
mod events;
mod state;

pub use controller::{Html5Player, Html5PlayerBuilder};
pub use dispatch::{PlayerEvents, StateChange};
pub use events::{EventQueue, EventSender, PlayerEvent};
pub use state::{LogEntry, PlayerStateMachine, StepOutcome, Transition};

use crate::utils::error::{Html5VideoError, Result};
use serde::{Deserialize, Serialize};

/// Host-facing playback interface shared with the YouTube-backed player
pub trait VideoPlayer {
    /// Start or resume playback
    fn play_video(&mut self);

    /// Pause playback
    fn pause_video(&mut self);

    /// Pause and rewind to the start
    fn stop_video(&mut self);

    /// Seek to `seconds`; ignored unless finite and within `[0, duration]`
    fn seek_to(&mut self, seconds: f64);

    /// Set volume on a `0..=100` scale; out-of-range values are ignored
    fn set_volume(&mut self, value: f64);

    /// Set playback rate; non-finite values are ignored
    fn set_playback_rate(&mut self, rate: f64);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds, 0 while unknown
    fn duration(&self) -> f64;

    /// Current state
    fn player_state(&self) -> PlayerState;

    /// Volume in `[0, 1]`
    fn volume(&self) -> f64;

    /// The fixed set of rates offered to the viewer
    fn available_playback_rates(&self) -> &[f64];

    /// Tear down the surface and detach all listeners
    ///
    /// Must be called at most once; the player must not be used afterwards.
    fn destroy(&mut self);
}

/// Whatever currently plays the media: the local surface or a cast receiver
///
/// Inputs are validated by the implementation; invalid values are ignored.
pub trait PlaybackTarget {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn toggle(&mut self);
    fn seek_to(&mut self, seconds: f64);
    /// `0..=100` scale
    fn set_volume(&mut self, value: f64);
    fn mute(&mut self);
    fn unmute(&mut self);
}

/// Playback state, numbered like the YouTube player states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i8")]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Numeric code reported to the host
    pub fn code(&self) -> i8 {
        match self {
            PlayerState::Unstarted => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::Cued => 5,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(PlayerState::Unstarted),
            0 => Some(PlayerState::Ended),
            1 => Some(PlayerState::Playing),
            2 => Some(PlayerState::Paused),
            3 => Some(PlayerState::Buffering),
            5 => Some(PlayerState::Cued),
            _ => None,
        }
    }
}

impl From<PlayerState> for i8 {
    fn from(state: PlayerState) -> Self {
        state.code()
    }
}

/// One playable rendition of the video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Container format, e.g. `mp4`, `webm`, `ogg`
    pub format: String,
    pub url: String,
}

impl VideoSource {
    pub fn new(format: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            url: url.into(),
        }
    }

    /// Guess the format from the URL's extension, falling back to `mp4`
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let format = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && !ext.contains('/'))
            .unwrap_or_else(|| "mp4".to_string());
        Self { format, url }
    }

    /// MIME type announced to remote receivers
    pub fn content_type(&self) -> String {
        match self.format.as_str() {
            "mp4" | "m4v" => "video/mp4".to_string(),
            "webm" => "video/webm".to_string(),
            "ogg" | "ogv" => "video/ogg".to_string(),
            other => format!("video/{}", other),
        }
    }
}

/// Player configuration, fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sources in order of preference
    pub video_sources: Vec<VideoSource>,

    /// Poster image URL
    pub poster: Option<String>,

    /// Device name reported by the host's touch detection
    pub touch_device: Option<String>,

    /// Speeds offered to the viewer
    pub playback_rates: Vec<f64>,

    /// Prefix of the custom events re-broadcast on the container
    pub event_namespace: String,

    /// Log every native event with ready and network state
    pub debug: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_sources: Vec::new(),
            poster: None,
            touch_device: None,
            playback_rates: vec![0.75, 1.0, 1.25, 1.5],
            event_namespace: "html5".to_string(),
            debug: false,
        }
    }
}

impl PlayerConfig {
    /// Config with the given sources and defaults elsewhere
    pub fn with_sources(sources: Vec<VideoSource>) -> Self {
        Self {
            video_sources: sources,
            ..Self::default()
        }
    }

    /// iPhone and iPod only play inline video with native controls
    pub fn needs_native_controls(&self) -> bool {
        self.touch_device.as_deref().is_some_and(|device| {
            let device = device.to_ascii_lowercase();
            device.contains("iphone") || device.contains("ipod")
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.video_sources.is_empty() {
            return Err(Html5VideoError::config("At least one video source is required"));
        }

        if let Some(source) = self.video_sources.iter().find(|s| s.url.trim().is_empty()) {
            return Err(Html5VideoError::Config(format!(
                "Video source for format '{}' has an empty URL",
                source.format
            )));
        }

        if self.event_namespace.is_empty() {
            return Err(Html5VideoError::config("Event namespace must not be empty"));
        }

        if self.playback_rates.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(Html5VideoError::config("Playback rates must be finite and positive"));
        }

        Ok(())
    }
}
