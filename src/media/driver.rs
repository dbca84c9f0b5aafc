//! Local playback driver
//!
//! Owns the native surface, validates transport input and keeps the visual
//! state of the player region (overlay, error message, spinner) in step with
//! what the surface is doing.

use crate::media::markup::{CacheBuster, SourceMarkup};
use crate::media::{MediaEvent, MediaEventKind, MediaSurface};
use crate::player::{EventSender, PlaybackTarget, PlayerConfig};
use log::{debug, info, warn};

/// Visual state of the player region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceView {
    /// Inner HTML of the video element
    pub markup: String,
    pub poster: Option<String>,
    /// Native controls enabled
    pub controls: bool,
    /// The surface is part of the document
    pub mounted: bool,
    /// Play-button overlay hidden
    pub overlay_hidden: bool,
    /// Surface region hidden (error shown, or playback moved to a cast device)
    pub surface_hidden: bool,
    /// Inline "cannot play" message visible
    pub error_visible: bool,
    pub initialized: bool,
    pub spinner_aria_hidden: bool,
    pub spinner_tabindex: Option<i32>,
}

impl Default for SurfaceView {
    fn default() -> Self {
        Self {
            markup: String::new(),
            poster: None,
            controls: false,
            mounted: false,
            overlay_hidden: true,
            surface_hidden: false,
            error_visible: false,
            initialized: false,
            spinner_aria_hidden: false,
            spinner_tabindex: None,
        }
    }
}

/// Seek targets must be finite and inside `[0, duration]`
pub(crate) fn accepts_seek(value: f64, duration: f64) -> bool {
    value.is_finite() && value >= 0.0 && value <= duration
}

/// Map a `0..=100` volume to `[0, 1]`
pub(crate) fn volume_fraction(value: f64) -> Option<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Some(value / 100.0)
    } else {
        None
    }
}

/// Duration as reported to the host; unknown becomes 0
pub(crate) fn known_duration(duration: f64) -> f64 {
    if duration.is_nan() {
        0.0
    } else {
        duration
    }
}

/// Parse the leading decimal number of `value`, like `parseFloat`
pub fn parse_rate(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Driver for the local media surface
pub struct LocalDriver {
    surface: Box<dyn MediaSurface>,
    markup: SourceMarkup,
    view: SurfaceView,
    attached: bool,
    suspended: bool,
}

impl LocalDriver {
    /// Attach to `surface`, load the sources and mount it
    pub fn new(
        mut surface: Box<dyn MediaSurface>,
        config: &PlayerConfig,
        events: EventSender,
        buster: &mut dyn CacheBuster,
    ) -> Self {
        let markup = SourceMarkup::build(&config.video_sources, buster);
        let mut view = SurfaceView::default();

        surface.attach(events);

        if config.needs_native_controls() {
            surface.set_controls(true);
            view.controls = true;
        }

        if let Some(poster) = &config.poster {
            surface.set_poster(poster);
            view.poster = Some(poster.clone());
        }

        surface.set_sources(&markup);
        view.markup = markup.to_html();
        view.mounted = true;

        debug!("Mounted media surface with {} source(s)", markup.tags.len());

        Self {
            surface,
            markup,
            view,
            attached: true,
            suspended: false,
        }
    }

    pub fn markup(&self) -> &SourceMarkup {
        &self.markup
    }

    pub fn view(&self) -> &SurfaceView {
        &self.view
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            debug!("Ignoring playback rate {}", rate);
            return;
        }
        if self.surface.playback_rate() != rate {
            self.surface.set_playback_rate(rate);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.surface.is_paused()
    }

    pub fn is_muted(&self) -> bool {
        self.surface.is_muted()
    }

    pub fn current_time(&self) -> f64 {
        self.surface.current_time()
    }

    pub fn duration(&self) -> f64 {
        known_duration(self.surface.duration())
    }

    pub fn volume(&self) -> f64 {
        self.surface.volume()
    }

    /// Snapshot of the surface for an event being re-broadcast
    pub fn snapshot(&self, kind: MediaEventKind) -> MediaEvent {
        MediaEvent {
            kind,
            current_time: self.surface.current_time(),
            ready_state: self.surface.ready_state(),
            network_state: self.surface.network_state(),
        }
    }

    /// Metadata loaded: offer the play overlay
    pub fn on_loaded_metadata(&mut self) {
        self.view.overlay_hidden = false;
        self.view.initialized = true;
    }

    pub fn on_play(&mut self) {
        self.view.overlay_hidden = true;
    }

    pub fn on_pause(&mut self) {
        self.view.overlay_hidden = false;
    }

    /// Hide the surface region and show the inline error in its place
    pub fn show_error(&mut self) {
        warn!("Media surface cannot play any of its sources");
        self.view.surface_hidden = true;
        self.view.error_visible = true;
        self.view.initialized = true;
        self.view.spinner_aria_hidden = true;
        self.view.spinner_tabindex = Some(-1);
    }

    /// Hand playback to another device; listeners stay attached
    pub fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        if !self.surface.is_paused() {
            self.surface.pause();
        }
        self.suspended = true;
        self.view.surface_hidden = true;
        info!("Local surface suspended");
    }

    /// Take playback back from another device
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        self.view.surface_hidden = self.view.error_visible;
        info!("Local surface resumed");
    }

    /// Detach listeners, reset the region and remove the surface
    pub fn destroy(&mut self) {
        self.surface.detach();
        self.attached = false;
        self.suspended = false;
        self.view.surface_hidden = false;
        self.view.error_visible = false;
        self.view.initialized = false;
        self.view.spinner_aria_hidden = false;
        self.view.mounted = false;
        info!("Media surface destroyed");
    }
}

impl PlaybackTarget for LocalDriver {
    fn play(&mut self) {
        self.surface.play();
    }

    fn pause(&mut self) {
        self.surface.pause();
    }

    fn stop(&mut self) {
        self.surface.pause();
        self.surface.set_current_time(0.0);
    }

    /// Play if the surface reports paused, otherwise pause
    fn toggle(&mut self) {
        if self.surface.is_paused() {
            self.surface.play();
        } else {
            self.surface.pause();
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        if accepts_seek(seconds, self.surface.duration()) {
            self.surface.set_current_time(seconds);
        } else {
            debug!("Ignoring seek to {}", seconds);
        }
    }

    fn set_volume(&mut self, value: f64) {
        match volume_fraction(value) {
            Some(volume) => self.surface.set_volume(volume),
            None => debug!("Ignoring volume {}", value),
        }
    }

    fn mute(&mut self) {
        if !self.surface.is_muted() {
            self.surface.set_muted(true);
        }
    }

    fn unmute(&mut self) {
        if self.surface.is_muted() {
            self.surface.set_muted(false);
        }
    }
}
