//! Player controller implementation for html5-video
//!
//! `Html5Player` wires the local driver, the cast bridge, the state machine
//! and the host callbacks together. Adapters only ever push events into the
//! player's queue; every state change happens in [`Html5Player::handle_event`].

use crate::cast::{
    CastBridge, CastFramework, GenericMediaMetadata, LoadRequest, RemoteEventType,
    RemoteMediaState,
};
use crate::media::driver::parse_rate;
use crate::media::markup::{CacheBuster, SourceMarkup, TimestampCacheBuster};
use crate::media::{DetachedContainer, HostContainer, LocalDriver, MediaEventKind, MediaSurface, SurfaceView};
use crate::player::{
    EventQueue, EventSender, LogEntry, PlaybackTarget, PlayerConfig, PlayerEvent, PlayerEvents,
    PlayerState, PlayerStateMachine, StepOutcome, VideoPlayer,
};
use crate::utils::config::{CastConfig, Config};
use crate::utils::error::Result;
use log::{debug, info, trace, warn};

/// Builder for [`Html5Player`]
pub struct Html5PlayerBuilder {
    config: PlayerConfig,
    cast: CastConfig,
    events: PlayerEvents,
    container: Box<dyn HostContainer>,
    cache_buster: Box<dyn CacheBuster>,
}

impl Html5PlayerBuilder {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            cast: CastConfig::default(),
            events: PlayerEvents::default(),
            container: Box::new(DetachedContainer),
            cache_buster: Box::new(TimestampCacheBuster::new()),
        }
    }

    /// Player and cast settings taken from a loaded [`Config`]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.player.clone()).cast_config(config.cast.clone())
    }

    pub fn cast_config(mut self, cast: CastConfig) -> Self {
        self.cast = cast;
        self
    }

    /// Host callbacks
    pub fn events(mut self, events: PlayerEvents) -> Self {
        self.events = events;
        self
    }

    /// Element receiving the re-broadcast native events
    pub fn container(mut self, container: impl HostContainer + 'static) -> Self {
        self.container = Box::new(container);
        self
    }

    pub fn cache_buster(mut self, buster: impl CacheBuster + 'static) -> Self {
        self.cache_buster = Box::new(buster);
        self
    }

    /// Validate the configuration and mount `surface`
    pub fn build(mut self, surface: Box<dyn MediaSurface>) -> Result<Html5Player> {
        self.config.validate()?;

        let queue = EventQueue::new();
        let driver = LocalDriver::new(surface, &self.config, queue.sender(), self.cache_buster.as_mut());

        info!(
            "HTML5 player created with {} source(s), cast {}",
            self.config.video_sources.len(),
            if self.cast.enabled { "enabled" } else { "disabled" }
        );

        Ok(Html5Player {
            driver,
            bridge: CastBridge::new(self.cast),
            machine: PlayerStateMachine::new(),
            queue,
            events: self.events,
            container: self.container,
            config: self.config,
            destroyed: false,
        })
    }
}

/// HTML5 video player with optional remote casting
pub struct Html5Player {
    driver: LocalDriver,
    bridge: CastBridge,
    machine: PlayerStateMachine,
    queue: EventQueue,
    events: PlayerEvents,
    container: Box<dyn HostContainer>,
    config: PlayerConfig,
    destroyed: bool,
}

impl Html5Player {
    /// Create a player over `surface` with default cast settings
    pub fn new(surface: Box<dyn MediaSurface>, config: PlayerConfig, events: PlayerEvents) -> Result<Self> {
        Html5PlayerBuilder::new(config).events(events).build(surface)
    }

    pub fn builder(config: PlayerConfig) -> Html5PlayerBuilder {
        Html5PlayerBuilder::new(config)
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Handle for adapters that deliver events to this player
    pub fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    /// Handle every pending event in arrival order
    ///
    /// Events queued while handling (for example by a surface reacting to a
    /// handoff) are handled in the same call. Returns the number handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.try_next() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Handle a single event to completion
    pub fn handle_event(&mut self, event: PlayerEvent) {
        if self.destroyed {
            trace!("Discarding {:?} after destroy", event);
            return;
        }
        match event {
            PlayerEvent::Native(kind) => self.on_native(kind),
            PlayerEvent::SourceFailed { index } => self.on_source_failed(index),
            PlayerEvent::Remote(kind) => self.on_remote(kind),
        }
    }

    /// The host reports whether the cast framework loaded
    pub fn cast_api_available(&mut self, framework: Option<CastFramework>) -> bool {
        let events = self.queue.sender();
        self.bridge.on_api_available(framework, events)
    }

    pub fn is_remote_active(&self) -> bool {
        self.bridge.is_active()
    }

    pub fn remote_media_state(&self) -> RemoteMediaState {
        self.bridge.media_state()
    }

    /// Name of the receiver playback was handed to
    pub fn cast_device(&self) -> Option<&str> {
        self.bridge.device_name()
    }

    /// Whether `on_ready` has fired
    pub fn is_ready(&self) -> bool {
        self.machine.is_ready()
    }

    /// Play if paused, otherwise pause (click on the surface or the overlay)
    pub fn toggle_playback(&mut self) {
        self.with_target(|target| target.toggle());
    }

    /// Set the rate from a textual value such as `"1.25"`; unparsable text is ignored
    pub fn set_playback_rate_str(&mut self, value: &str) {
        match parse_rate(value) {
            Some(rate) => self.set_playback_rate(rate),
            None => debug!("Ignoring playback rate {:?}", value),
        }
    }

    pub fn mute(&mut self) {
        self.with_target(|target| target.mute());
    }

    pub fn unmute(&mut self) {
        self.with_target(|target| target.unmute());
    }

    pub fn is_muted(&self) -> bool {
        if self.bridge.is_active() {
            self.bridge.volume_state().muted
        } else {
            self.driver.is_muted()
        }
    }

    /// Diagnostic log, one record per native event
    pub fn logs(&self) -> &[LogEntry] {
        self.machine.logs()
    }

    /// Diagnostic log as pretty-printed JSON
    pub fn export_logs(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.machine.logs())?)
    }

    pub fn view(&self) -> &SurfaceView {
        self.driver.view()
    }

    pub fn markup(&self) -> &SourceMarkup {
        self.driver.markup()
    }

    fn with_target(&mut self, action: impl FnOnce(&mut dyn PlaybackTarget)) {
        if self.destroyed {
            warn!("Transport call on a destroyed player ignored");
            return;
        }
        match self.bridge.target() {
            Some(mut remote) => action(&mut remote),
            None => action(&mut self.driver),
        }
    }

    fn on_native(&mut self, kind: MediaEventKind) {
        let snapshot = self.driver.snapshot(kind);
        if self.config.debug {
            info!(
                "{} (readyState {}, networkState {}, state {:?})",
                kind,
                snapshot.ready_state,
                snapshot.network_state,
                self.machine.state()
            );
        } else {
            trace!("{} at {:.3}s", kind, snapshot.current_time);
        }

        self.machine.record(kind.name());
        let event_name = format!("{}:{}", self.config.event_namespace, kind.name());
        self.container.trigger(&event_name, &snapshot);

        // Metadata still readies the player while casting; the receiver owns
        // every other state change.
        if self.bridge.is_active() && kind != MediaEventKind::LoadedMetadata {
            trace!("Local {} ignored while casting", kind);
            return;
        }

        let outcome = self.machine.apply(kind);
        match kind {
            MediaEventKind::LoadedMetadata => {
                if outcome.became_ready || outcome.transition.is_some() {
                    self.driver.on_loaded_metadata();
                }
            }
            MediaEventKind::Play | MediaEventKind::Playing => self.driver.on_play(),
            MediaEventKind::Pause => self.driver.on_pause(),
            MediaEventKind::Error => {
                warn!("Media surface reported an error");
                self.events.error();
            }
            _ => {}
        }
        self.dispatch(outcome);
    }

    fn on_source_failed(&mut self, index: usize) {
        if self.driver.markup().last_index() == Some(index) {
            self.driver.show_error();
            self.events.error();
        } else {
            debug!("Source {} failed, falling back to the next one", index);
        }
    }

    fn on_remote(&mut self, kind: RemoteEventType) {
        if !self.bridge.is_subscribed(kind) {
            trace!("Unsubscribed remote notification {:?} ignored", kind);
            return;
        }

        match kind {
            RemoteEventType::IsConnectedChanged => {
                if self.bridge.remote_connected() {
                    self.start_casting();
                } else {
                    self.stop_casting();
                }
            }
            RemoteEventType::IsPausedChanged => match self.bridge.remote_paused() {
                Some(true) => self.apply_remote(MediaEventKind::Pause),
                Some(false) if self.machine.state() != PlayerState::Playing => {
                    self.apply_remote(MediaEventKind::Play);
                    self.apply_remote(MediaEventKind::Playing);
                }
                _ => {}
            },
            RemoteEventType::IsMutedChanged | RemoteEventType::VolumeLevelChanged => {
                self.bridge.sync_volume();
            }
        }
    }

    fn apply_remote(&mut self, kind: MediaEventKind) {
        let outcome = self.machine.apply(kind);
        self.dispatch(outcome);
    }

    fn start_casting(&mut self) {
        if self.bridge.is_active() {
            return;
        }
        let Some(source) = self.config.video_sources.first() else {
            return;
        };

        let request = LoadRequest {
            content_id: source.url.clone(),
            content_type: source.content_type(),
            metadata: GenericMediaMetadata {
                title: None,
                images: self.config.poster.iter().cloned().collect(),
            },
            current_time: self.driver.current_time(),
            autoplay: !self.driver.is_paused(),
        };

        if !self.bridge.connect(request) {
            return;
        }
        self.driver.suspend();

        // The receiver holds nothing to play, so playback is halted
        if self.bridge.media_state() == RemoteMediaState::Error {
            self.apply_remote(MediaEventKind::Pause);
        }
    }

    fn stop_casting(&mut self) {
        if !self.bridge.is_active() {
            return;
        }
        self.bridge.disconnect();
        self.driver.resume();
    }

    fn dispatch(&mut self, outcome: StepOutcome) {
        if outcome.became_ready {
            info!("Player ready");
            self.events.ready();
        }
        if let Some(transition) = outcome.transition {
            self.events.state_changed(transition.to);
        }
    }
}

impl VideoPlayer for Html5Player {
    fn play_video(&mut self) {
        self.with_target(|target| target.play());
    }

    fn pause_video(&mut self) {
        self.with_target(|target| target.pause());
    }

    fn stop_video(&mut self) {
        self.with_target(|target| target.stop());
    }

    fn seek_to(&mut self, seconds: f64) {
        self.with_target(|target| target.seek_to(seconds));
    }

    fn set_volume(&mut self, value: f64) {
        self.with_target(|target| target.set_volume(value));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if self.destroyed {
            warn!("Transport call on a destroyed player ignored");
            return;
        }
        self.driver.set_playback_rate(rate);
    }

    fn current_time(&self) -> f64 {
        self.bridge
            .current_time()
            .unwrap_or_else(|| self.driver.current_time())
    }

    fn duration(&self) -> f64 {
        self.bridge.duration().unwrap_or_else(|| self.driver.duration())
    }

    fn player_state(&self) -> PlayerState {
        self.machine.state()
    }

    fn volume(&self) -> f64 {
        if self.bridge.is_active() {
            self.bridge.volume_state().level
        } else {
            self.driver.volume()
        }
    }

    fn available_playback_rates(&self) -> &[f64] {
        &self.config.playback_rates
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.bridge.disconnect();
        self.driver.destroy();
        self.destroyed = true;
        let dropped = self.queue.clear();
        info!("Player destroyed ({} pending event(s) dropped)", dropped);
    }
}
