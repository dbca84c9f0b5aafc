//! In-memory media surface
//!
//! Behaves like a browser video element without decoding anything: transport
//! calls update its state and emit the native events a browser would emit, in
//! the same order. Reaching the end of the media sets the paused flag but
//! emits only `timeupdate` and `ended`; the browser's closing `pause` event is
//! folded into `ended`. The [`HeadlessHandle`] plays the part of the media engine
//! (metadata arriving, time advancing, sources failing) and of any code that
//! touches the element behind the player's back.

use crate::media::markup::{SourceMarkup, SourceTag};
use crate::media::{MediaEventKind, MediaSurface};
use crate::player::{EventSender, PlayerEvent};
use parking_lot::Mutex;
use std::sync::Arc;

const HAVE_NOTHING: u8 = 0;
const HAVE_ENOUGH_DATA: u8 = 4;

const NETWORK_EMPTY: u8 = 0;
const NETWORK_IDLE: u8 = 1;
const NETWORK_LOADING: u8 = 2;
const NETWORK_NO_SOURCE: u8 = 3;

#[derive(Debug)]
struct HeadlessState {
    events: Option<EventSender>,
    sources: Vec<SourceTag>,
    poster: Option<String>,
    controls: bool,
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    muted: bool,
    rate: f64,
    ready_state: u8,
    network_state: u8,
}

impl HeadlessState {
    fn emit(&self, kinds: &[MediaEventKind]) {
        if let Some(events) = &self.events {
            for kind in kinds {
                events.native(*kind);
            }
        }
    }

    fn has_metadata(&self) -> bool {
        self.ready_state > HAVE_NOTHING
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        if self.duration.is_finite() && self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.paused = false;
        if self.has_metadata() {
            self.emit(&[MediaEventKind::Play, MediaEventKind::Playing]);
        } else {
            self.emit(&[MediaEventKind::Play, MediaEventKind::Waiting]);
        }
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.emit(&[MediaEventKind::TimeUpdate, MediaEventKind::Pause]);
    }
}

/// The surface half, handed to the player
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
}

/// The engine half, kept by whoever drives the simulation
#[derive(Clone)]
pub struct HeadlessHandle {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new() -> (Self, HeadlessHandle) {
        let state = Arc::new(Mutex::new(HeadlessState {
            events: None,
            sources: Vec::new(),
            poster: None,
            controls: false,
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            ready_state: HAVE_NOTHING,
            network_state: NETWORK_EMPTY,
        }));
        (
            Self { state: Arc::clone(&state) },
            HeadlessHandle { state },
        )
    }
}

impl MediaSurface for HeadlessSurface {
    fn attach(&mut self, events: EventSender) {
        self.state.lock().events = Some(events);
    }

    fn detach(&mut self) {
        self.state.lock().events = None;
    }

    fn set_sources(&mut self, markup: &SourceMarkup) {
        let mut state = self.state.lock();
        state.sources = markup.tags.clone();
        state.network_state = NETWORK_LOADING;
        state.emit(&[MediaEventKind::LoadStart]);
    }

    fn set_poster(&mut self, url: &str) {
        self.state.lock().poster = Some(url.to_string());
    }

    fn set_controls(&mut self, enabled: bool) {
        self.state.lock().controls = enabled;
    }

    fn play(&mut self) {
        self.state.lock().play();
    }

    fn pause(&mut self) {
        self.state.lock().pause();
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut state = self.state.lock();
        state.current_time = seconds;
        state.emit(&[
            MediaEventKind::Seeking,
            MediaEventKind::TimeUpdate,
            MediaEventKind::Seeked,
        ]);
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    fn set_volume(&mut self, volume: f64) {
        let mut state = self.state.lock();
        state.volume = volume;
        state.emit(&[MediaEventKind::VolumeChange]);
    }

    fn is_muted(&self) -> bool {
        self.state.lock().muted
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = self.state.lock();
        state.muted = muted;
        state.emit(&[MediaEventKind::VolumeChange]);
    }

    fn playback_rate(&self) -> f64 {
        self.state.lock().rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        let mut state = self.state.lock();
        state.rate = rate;
        state.emit(&[MediaEventKind::RateChange]);
    }

    fn ready_state(&self) -> u8 {
        self.state.lock().ready_state
    }

    fn network_state(&self) -> u8 {
        self.state.lock().network_state
    }
}

impl HeadlessHandle {
    /// Metadata and enough data arrive; `duration` may be NaN for live streams
    pub fn load_metadata(&self, duration: f64) {
        let mut state = self.state.lock();
        state.duration = duration;
        state.ready_state = HAVE_ENOUGH_DATA;
        state.network_state = NETWORK_IDLE;
        state.emit(&[
            MediaEventKind::DurationChange,
            MediaEventKind::LoadedMetadata,
            MediaEventKind::LoadedData,
            MediaEventKind::CanPlay,
            MediaEventKind::CanPlayThrough,
        ]);
        if !state.paused {
            state.emit(&[MediaEventKind::Playing]);
        }
    }

    /// Advance playback time; reaching the end stops playback
    ///
    /// The end of the media is reported as `timeupdate` then `ended`, with no
    /// separate `pause`.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.lock();
        if state.paused || !state.has_metadata() {
            return;
        }
        let target = state.current_time + seconds.max(0.0);
        if state.duration.is_finite() && target >= state.duration {
            state.current_time = state.duration;
            state.paused = true;
            state.emit(&[MediaEventKind::TimeUpdate, MediaEventKind::Ended]);
        } else {
            state.current_time = target;
            state.emit(&[MediaEventKind::TimeUpdate]);
        }
    }

    /// Jump straight to the end of the media
    pub fn finish(&self) {
        let mut state = self.state.lock();
        if state.duration.is_finite() {
            state.current_time = state.duration;
        }
        state.paused = true;
        state.emit(&[MediaEventKind::TimeUpdate, MediaEventKind::Ended]);
    }

    /// Source `index` failed to load
    pub fn fail_source(&self, index: usize) {
        let mut state = self.state.lock();
        if index + 1 >= state.sources.len() {
            state.network_state = NETWORK_NO_SOURCE;
        }
        if let Some(events) = &state.events {
            events.send(PlayerEvent::SourceFailed { index });
        }
    }

    /// Every source failed
    pub fn fail_all_sources(&self) {
        let count = self.state.lock().sources.len();
        for index in 0..count {
            self.fail_source(index);
        }
    }

    /// A decode or network error on the element itself
    pub fn fail(&self) {
        self.state.lock().emit(&[MediaEventKind::Error]);
    }

    /// Fire an arbitrary native event
    pub fn emit(&self, kind: MediaEventKind) {
        self.state.lock().emit(&[kind]);
    }

    /// Start playback without going through the player
    pub fn play(&self) {
        self.state.lock().play();
    }

    /// Pause playback without going through the player
    pub fn pause(&self) {
        self.state.lock().pause();
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().events.is_some()
    }

    pub fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    pub fn playback_rate(&self) -> f64 {
        self.state.lock().rate
    }

    pub fn poster(&self) -> Option<String> {
        self.state.lock().poster.clone()
    }

    pub fn controls(&self) -> bool {
        self.state.lock().controls
    }

    pub fn sources(&self) -> Vec<SourceTag> {
        self.state.lock().sources.clone()
    }
}
