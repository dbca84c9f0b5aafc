//! Local media surface module for html5-video
//!
//! A media surface is the native `<video>` element (or anything that
//! behaves like one). The player never talks to the browser directly; it
//! drives a [`MediaSurface`] and receives the surface's native events through
//! the player event queue.

pub mod driver;
pub mod headless;
pub mod markup;

pub use driver::{LocalDriver, SurfaceView};
pub use headless::{HeadlessHandle, HeadlessSurface};
pub use markup::{CacheBuster, SourceMarkup, SourceTag, TimestampCacheBuster};

use crate::player::EventSender;
use serde::Serialize;

/// Native media events the player listens to on its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEventKind {
    LoadStart,
    Progress,
    Suspend,
    Abort,
    Error,
    Emptied,
    Stalled,
    Play,
    Pause,
    LoadedMetadata,
    LoadedData,
    Waiting,
    Playing,
    CanPlay,
    CanPlayThrough,
    Seeking,
    Seeked,
    TimeUpdate,
    Ended,
    RateChange,
    DurationChange,
    VolumeChange,
}

impl MediaEventKind {
    /// Every event registered on the surface at construction, in registration order
    pub const ALL: [MediaEventKind; 22] = [
        MediaEventKind::LoadStart,
        MediaEventKind::Progress,
        MediaEventKind::Suspend,
        MediaEventKind::Abort,
        MediaEventKind::Error,
        MediaEventKind::Emptied,
        MediaEventKind::Stalled,
        MediaEventKind::Play,
        MediaEventKind::Pause,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::LoadedData,
        MediaEventKind::Waiting,
        MediaEventKind::Playing,
        MediaEventKind::CanPlay,
        MediaEventKind::CanPlayThrough,
        MediaEventKind::Seeking,
        MediaEventKind::Seeked,
        MediaEventKind::TimeUpdate,
        MediaEventKind::Ended,
        MediaEventKind::RateChange,
        MediaEventKind::DurationChange,
        MediaEventKind::VolumeChange,
    ];

    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            MediaEventKind::LoadStart => "loadstart",
            MediaEventKind::Progress => "progress",
            MediaEventKind::Suspend => "suspend",
            MediaEventKind::Abort => "abort",
            MediaEventKind::Error => "error",
            MediaEventKind::Emptied => "emptied",
            MediaEventKind::Stalled => "stalled",
            MediaEventKind::Play => "play",
            MediaEventKind::Pause => "pause",
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::LoadedData => "loadeddata",
            MediaEventKind::Waiting => "waiting",
            MediaEventKind::Playing => "playing",
            MediaEventKind::CanPlay => "canplay",
            MediaEventKind::CanPlayThrough => "canplaythrough",
            MediaEventKind::Seeking => "seeking",
            MediaEventKind::Seeked => "seeked",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::Ended => "ended",
            MediaEventKind::RateChange => "ratechange",
            MediaEventKind::DurationChange => "durationchange",
            MediaEventKind::VolumeChange => "volumechange",
        }
    }

    /// Look up an event by its DOM name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A native event together with the surface state observed when it arrived
///
/// This is what the host container receives with every re-broadcast event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaEvent {
    pub kind: MediaEventKind,
    pub current_time: f64,
    pub ready_state: u8,
    pub network_state: u8,
}

/// Native media element abstraction
///
/// Implementations report native events asynchronously by pushing them into
/// the [`EventSender`] handed over in [`MediaSurface::attach`]. Transport
/// calls are fire-and-forget; the resulting events are the only way state
/// changes reach the player.
pub trait MediaSurface: Send {
    /// Register listeners for all native events
    fn attach(&mut self, events: EventSender);

    /// Remove all listeners; no events may be delivered afterwards
    fn detach(&mut self);

    /// Replace the element's sources and fallback content
    fn set_sources(&mut self, markup: &SourceMarkup);

    fn set_poster(&mut self, url: &str);

    /// Enable the element's own native controls
    fn set_controls(&mut self, enabled: bool);

    fn play(&mut self);

    fn pause(&mut self);

    /// The element's own paused flag
    fn is_paused(&self) -> bool;

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Media duration in seconds, NaN while unknown
    fn duration(&self) -> f64;

    /// Volume in `[0, 1]`
    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// HTMLMediaElement.readyState
    fn ready_state(&self) -> u8;

    /// HTMLMediaElement.networkState
    fn network_state(&self) -> u8;
}

/// The element hosting the player, which receives re-broadcast native events
pub trait HostContainer: Send {
    /// Deliver a namespaced custom event such as `html5:timeupdate`
    fn trigger(&mut self, event_name: &str, event: &MediaEvent);
}

/// A container that drops every event
#[derive(Debug, Default)]
pub struct DetachedContainer;

impl HostContainer for DetachedContainer {
    fn trigger(&mut self, _event_name: &str, _event: &MediaEvent) {}
}
