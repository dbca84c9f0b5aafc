//! Integration test utilities for html5-video
//!
//! - A player over the headless surface with every callback recorded
//! - A recording host container
//! - A fake cast framework whose receiver state is shared with the test
//! - Config file fixtures in a temporary directory

use anyhow::Result;
use html5_video::media::{HeadlessHandle, HeadlessSurface, HostContainer, MediaEvent};
use html5_video::player::{Html5Player, PlayerConfig, PlayerEvents, PlayerState, VideoSource};
use html5_video::utils::{CastConfig, Config};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Everything the host saw
#[derive(Debug, Default)]
pub struct Recorder {
    pub ready: usize,
    pub errors: usize,
    pub states: Vec<PlayerState>,
    pub triggered: Vec<(String, MediaEvent)>,
}

impl Recorder {
    /// Names of the re-broadcast events, in order
    pub fn event_names(&self) -> Vec<String> {
        self.triggered.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn state_codes(&self) -> Vec<i8> {
        self.states.iter().map(PlayerState::code).collect()
    }
}

/// Host container that appends every event to a [`Recorder`]
pub struct RecordingContainer(pub Arc<Mutex<Recorder>>);

impl HostContainer for RecordingContainer {
    fn trigger(&mut self, event_name: &str, event: &MediaEvent) {
        self.0.lock().triggered.push((event_name.to_string(), event.clone()));
    }
}

/// Callbacks that append to `recorder`
pub fn recording_events(recorder: &Arc<Mutex<Recorder>>) -> PlayerEvents {
    let (ready, states, errors) = (recorder.clone(), recorder.clone(), recorder.clone());
    PlayerEvents::new()
        .on_ready(move || ready.lock().ready += 1)
        .on_state_change(move |change| states.lock().states.push(change.data))
        .on_error(move || errors.lock().errors += 1)
}

/// Two renditions of the same lecture video
pub fn lecture_config() -> PlayerConfig {
    let mut config = PlayerConfig::with_sources(vec![
        VideoSource::new("mp4", "https://cdn.example/lecture.mp4"),
        VideoSource::new("webm", "https://cdn.example/lecture.webm?quality=hd"),
    ]);
    config.poster = Some("https://cdn.example/lecture.jpg".to_string());
    config
}

/// A player over the headless surface with recorded callbacks
pub struct TestPlayer {
    pub player: Html5Player,
    pub surface: HeadlessHandle,
    pub recorder: Arc<Mutex<Recorder>>,
}

impl TestPlayer {
    pub fn new(config: PlayerConfig) -> Result<Self> {
        Self::with_cast(config, CastConfig::default())
    }

    pub fn with_cast(config: PlayerConfig, cast: CastConfig) -> Result<Self> {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let (surface, handle) = HeadlessSurface::new();
        let player = Html5Player::builder(config)
            .cast_config(cast)
            .events(recording_events(&recorder))
            .container(RecordingContainer(recorder.clone()))
            .build(Box::new(surface))?;

        Ok(Self {
            player,
            surface: handle,
            recorder,
        })
    }

    /// Handle everything pending
    pub fn run(&mut self) -> usize {
        self.player.process_events()
    }

    /// Load metadata and handle the resulting events
    pub fn load(&mut self, duration: f64) {
        self.surface.load_metadata(duration);
        self.run();
    }
}

/// Temporary directory holding config files
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Write `config` as TOML and return its path
    pub fn write_config(&self, config: &Config) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("html5-video").join("config.toml");
        config.save_to(&path)?;
        Ok(path)
    }

    /// Write raw TOML and return its path
    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Fake cast framework
pub mod fake_cast {
    use html5_video::cast::{
        CastContext, CastError, CastErrorCode, CastFramework, CastOptions, CastSession, LoadRequest,
        RemoteEventType, RemotePlayerController,
    };
    use html5_video::player::EventSender;
    use parking_lot::{Mutex, MutexGuard};
    use std::sync::Arc;

    /// Receiver state shared between the fake framework and the test
    #[derive(Debug)]
    pub struct ReceiverState {
        pub connected: bool,
        pub has_session: bool,
        pub paused: bool,
        pub muted: bool,
        pub volume_level: f64,
        pub current_time: f64,
        pub duration: f64,
        pub reject_with: Option<CastError>,
        pub loads: Vec<LoadRequest>,
        pub options: Option<CastOptions>,
        pub commands: Vec<String>,
        events: Option<EventSender>,
    }

    impl Default for ReceiverState {
        fn default() -> Self {
            Self {
                connected: false,
                has_session: false,
                paused: true,
                muted: false,
                volume_level: 1.0,
                current_time: 0.0,
                duration: f64::NAN,
                reject_with: None,
                loads: Vec::new(),
                options: None,
                commands: Vec::new(),
                events: None,
            }
        }
    }

    impl ReceiverState {
        fn notify(&self, kind: RemoteEventType) {
            if let Some(events) = &self.events {
                events.remote(kind);
            }
        }
    }

    type Shared = Arc<Mutex<ReceiverState>>;

    /// Test side of the fake receiver
    #[derive(Clone, Default)]
    pub struct FakeReceiver {
        state: Shared,
    }

    impl FakeReceiver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Framework object to hand to the player
        pub fn framework(&self) -> CastFramework {
            CastFramework::new(
                Box::new(FakeContext(self.state.clone())),
                Box::new(FakeRemote(self.state.clone())),
            )
        }

        pub fn state(&self) -> MutexGuard<'_, ReceiverState> {
            self.state.lock()
        }

        /// A receiver with an open session connects
        pub fn connect(&self) {
            let mut state = self.state.lock();
            state.connected = true;
            state.has_session = true;
            state.notify(RemoteEventType::IsConnectedChanged);
        }

        /// The framework reports a connection but has no session yet
        pub fn connect_without_session(&self) {
            let mut state = self.state.lock();
            state.connected = true;
            state.notify(RemoteEventType::IsConnectedChanged);
        }

        pub fn disconnect(&self) {
            let mut state = self.state.lock();
            state.connected = false;
            state.has_session = false;
            state.notify(RemoteEventType::IsConnectedChanged);
        }

        /// Someone pressed play or pause on the receiver itself
        pub fn set_paused(&self, paused: bool) {
            let mut state = self.state.lock();
            state.paused = paused;
            state.notify(RemoteEventType::IsPausedChanged);
        }

        /// Volume changed on the receiver itself
        pub fn set_volume_level(&self, level: f64) {
            let mut state = self.state.lock();
            state.volume_level = level;
            state.notify(RemoteEventType::VolumeLevelChanged);
        }

        pub fn reject_loads(&self, code: CastErrorCode, description: &str) {
            self.state.lock().reject_with = Some(CastError::with_description(code, description));
        }
    }

    struct FakeContext(Shared);

    impl CastContext for FakeContext {
        fn set_options(&mut self, options: &CastOptions) {
            self.0.lock().options = Some(options.clone());
        }

        fn current_session(&mut self) -> Option<Box<dyn CastSession>> {
            if self.0.lock().has_session {
                Some(Box::new(FakeSession(self.0.clone())))
            } else {
                None
            }
        }
    }

    struct FakeSession(Shared);

    impl CastSession for FakeSession {
        fn load_media(&mut self, request: &LoadRequest) -> Result<(), CastError> {
            let mut state = self.0.lock();
            state.loads.push(request.clone());
            if let Some(err) = state.reject_with.clone() {
                return Err(err);
            }
            state.current_time = request.current_time;
            state.duration = 600.0;
            Ok(())
        }

        fn device_name(&self) -> String {
            "Classroom Display".to_string()
        }
    }

    struct FakeRemote(Shared);

    impl RemotePlayerController for FakeRemote {
        fn attach(&mut self, events: EventSender) {
            self.0.lock().events = Some(events);
        }

        fn is_connected(&self) -> bool {
            self.0.lock().connected
        }

        fn is_paused(&self) -> bool {
            self.0.lock().paused
        }

        fn is_muted(&self) -> bool {
            self.0.lock().muted
        }

        fn volume_level(&self) -> f64 {
            self.0.lock().volume_level
        }

        fn current_time(&self) -> f64 {
            self.0.lock().current_time
        }

        fn duration(&self) -> f64 {
            self.0.lock().duration
        }

        fn play_or_pause(&mut self) {
            let mut state = self.0.lock();
            state.paused = !state.paused;
            state.commands.push("play_or_pause".to_string());
            state.notify(RemoteEventType::IsPausedChanged);
        }

        fn stop(&mut self) {
            let mut state = self.0.lock();
            state.paused = true;
            state.current_time = 0.0;
            state.commands.push("stop".to_string());
            state.notify(RemoteEventType::IsPausedChanged);
        }

        fn seek(&mut self, seconds: f64) {
            let mut state = self.0.lock();
            state.current_time = seconds;
            state.commands.push(format!("seek:{}", seconds));
        }

        fn set_volume_level(&mut self, level: f64) {
            let mut state = self.0.lock();
            state.volume_level = level;
            state.notify(RemoteEventType::VolumeLevelChanged);
        }

        fn mute_or_unmute(&mut self) {
            let mut state = self.0.lock();
            state.muted = !state.muted;
            state.notify(RemoteEventType::IsMutedChanged);
        }
    }
}
