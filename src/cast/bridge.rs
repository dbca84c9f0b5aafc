//! Remote-cast bridge
//!
//! Tracks the cast framework once the host reports it, takes over playback
//! when a receiver connects and hands it back when the receiver goes away.
//! While a session is active, transport calls are proxied through a
//! [`RemoteTarget`] instead of the local surface.

use crate::cast::{
    CastFramework, CastOptions, CastSession, LoadRequest, RemoteEventType,
    RemotePlayerController,
};
use crate::media::driver::{accepts_seek, known_duration, volume_fraction};
use crate::player::{EventSender, PlaybackTarget};
use crate::utils::config::CastConfig;
use log::{debug, error, info, warn};
use std::collections::HashSet;

/// Outcome of the last media load on the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMediaState {
    /// No load attempted in the current session
    Idle,
    Loaded,
    /// The receiver rejected the load
    Error,
}

/// Receiver volume as last reported by the framework
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteVolume {
    pub level: f64,
    pub muted: bool,
}

impl Default for RemoteVolume {
    fn default() -> Self {
        Self { level: 1.0, muted: false }
    }
}

/// Bridge between the player and the cast framework
pub struct CastBridge {
    config: CastConfig,
    framework: Option<CastFramework>,
    session: Option<Box<dyn CastSession>>,
    device_name: Option<String>,
    subscriptions: HashSet<RemoteEventType>,
    media_state: RemoteMediaState,
    volume: RemoteVolume,
}

impl CastBridge {
    pub fn new(config: CastConfig) -> Self {
        Self {
            config,
            framework: None,
            session: None,
            device_name: None,
            subscriptions: HashSet::new(),
            media_state: RemoteMediaState::Idle,
            volume: RemoteVolume::default(),
        }
    }

    /// The host reports whether the cast framework loaded
    ///
    /// Returns true when the framework was accepted and connection changes
    /// are now being watched.
    pub fn on_api_available(&mut self, framework: Option<CastFramework>, events: EventSender) -> bool {
        if !self.config.enabled {
            debug!("Cast support disabled, ignoring framework");
            return false;
        }
        let Some(mut framework) = framework else {
            info!("Cast framework unavailable, playing locally only");
            return false;
        };
        if self.framework.is_some() {
            warn!("Cast framework reported twice, keeping the first one");
            return false;
        }

        framework.context.set_options(&CastOptions {
            receiver_application_id: self.config.receiver_application_id.clone(),
            auto_join_policy: self.config.auto_join_policy,
        });
        framework.remote.attach(events);
        self.subscriptions.insert(RemoteEventType::IsConnectedChanged);
        self.framework = Some(framework);

        info!(
            "Cast framework ready (receiver {})",
            self.config.receiver_application_id
        );
        true
    }

    /// A remote session currently drives playback
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether notifications of this type are currently subscribed
    pub fn is_subscribed(&self, kind: RemoteEventType) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// The framework reports a connected receiver
    pub fn remote_connected(&self) -> bool {
        self.remote().is_some_and(|remote| remote.is_connected())
    }

    pub fn media_state(&self) -> RemoteMediaState {
        self.media_state
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn volume_state(&self) -> RemoteVolume {
        self.volume
    }

    /// Take over playback on the connected receiver
    ///
    /// Returns false, leaving everything untouched, when the framework has no
    /// current session. A rejected load still leaves the session active; the
    /// failure is logged and recorded in [`media_state`](Self::media_state).
    pub fn connect(&mut self, request: LoadRequest) -> bool {
        if self.session.is_some() {
            return true;
        }
        let Some(framework) = self.framework.as_mut() else {
            return false;
        };
        let Some(mut session) = framework.context.current_session() else {
            warn!("Receiver connected but no cast session is available");
            return false;
        };

        self.subscriptions.extend([
            RemoteEventType::IsPausedChanged,
            RemoteEventType::IsMutedChanged,
            RemoteEventType::VolumeLevelChanged,
        ]);

        let device = session.device_name();
        info!("Casting to {}: loading {}", device, request.content_id);

        self.media_state = match session.load_media(&request) {
            Ok(()) => RemoteMediaState::Loaded,
            Err(err) => {
                error!("Remote media load error: {}", err.message());
                RemoteMediaState::Error
            }
        };

        self.session = Some(session);
        self.device_name = Some(device);
        self.sync_volume();

        if request.autoplay && self.media_state == RemoteMediaState::Loaded {
            if let Some(mut target) = self.target() {
                target.play();
            }
        }
        true
    }

    /// Give playback back to the local surface
    pub fn disconnect(&mut self) {
        if self.session.take().is_none() {
            return;
        }
        self.subscriptions.retain(|kind| *kind == RemoteEventType::IsConnectedChanged);
        self.media_state = RemoteMediaState::Idle;
        if let Some(device) = self.device_name.take() {
            info!("Stopped casting to {}", device);
        }
    }

    /// Copy volume and mute flag from the receiver
    pub fn sync_volume(&mut self) {
        if let Some(remote) = self.remote() {
            self.volume = RemoteVolume {
                level: remote.volume_level(),
                muted: remote.is_muted(),
            };
            debug!("Remote volume {:.2} (muted: {})", self.volume.level, self.volume.muted);
        }
    }

    /// Receiver paused flag, while a session is active
    pub fn remote_paused(&self) -> Option<bool> {
        self.active_remote().map(|remote| remote.is_paused())
    }

    pub fn current_time(&self) -> Option<f64> {
        self.active_remote().map(|remote| remote.current_time())
    }

    pub fn duration(&self) -> Option<f64> {
        self.active_remote().map(|remote| known_duration(remote.duration()))
    }

    /// Transport proxy for the active session
    pub fn target(&mut self) -> Option<RemoteTarget<'_>> {
        self.session.as_ref()?;
        let framework = self.framework.as_mut()?;
        Some(RemoteTarget {
            remote: framework.remote.as_mut(),
        })
    }

    fn remote(&self) -> Option<&dyn RemotePlayerController> {
        self.framework.as_ref().map(|framework| framework.remote.as_ref())
    }

    fn active_remote(&self) -> Option<&dyn RemotePlayerController> {
        self.session.as_ref().and(self.remote())
    }
}

/// Transport operations applied to the receiver
pub struct RemoteTarget<'a> {
    remote: &'a mut dyn RemotePlayerController,
}

impl RemoteTarget<'_> {
    pub fn is_muted(&self) -> bool {
        self.remote.is_muted()
    }
}

impl PlaybackTarget for RemoteTarget<'_> {
    fn play(&mut self) {
        if self.remote.is_paused() {
            self.remote.play_or_pause();
        }
    }

    fn pause(&mut self) {
        if !self.remote.is_paused() {
            self.remote.play_or_pause();
        }
    }

    fn stop(&mut self) {
        self.remote.stop();
    }

    fn toggle(&mut self) {
        self.remote.play_or_pause();
    }

    fn seek_to(&mut self, seconds: f64) {
        if accepts_seek(seconds, self.remote.duration()) {
            self.remote.seek(seconds);
        } else {
            debug!("Ignoring remote seek to {}", seconds);
        }
    }

    fn set_volume(&mut self, value: f64) {
        if let Some(level) = volume_fraction(value) {
            self.remote.set_volume_level(level);
        }
    }

    fn mute(&mut self) {
        if !self.remote.is_muted() {
            self.remote.mute_or_unmute();
        }
    }

    fn unmute(&mut self) {
        if self.remote.is_muted() {
            self.remote.mute_or_unmute();
        }
    }
}
