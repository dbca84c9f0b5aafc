//! Remote-cast module for html5-video
//!
//! The cast framework lives in the host runtime and becomes available at an
//! unpredictable time, if at all. These traits describe the parts of it the
//! player uses: a context that hands out the current session, a session that
//! loads media, and a remote player/controller pair that mirrors the
//! receiver's state and accepts transport commands.

mod bridge;
mod error;

pub use bridge::{CastBridge, RemoteMediaState, RemoteTarget, RemoteVolume};
pub use error::{CastError, CastErrorCode, UnknownErrorCode};

use crate::player::EventSender;
use crate::utils::config::AutoJoinPolicy;

/// Change notifications published by the remote player controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteEventType {
    IsConnectedChanged,
    IsPausedChanged,
    IsMutedChanged,
    VolumeLevelChanged,
}

/// Options applied to the cast context once the framework is available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastOptions {
    pub receiver_application_id: String,
    pub auto_join_policy: AutoJoinPolicy,
}

/// Media metadata sent with a load request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericMediaMetadata {
    pub title: Option<String>,
    pub images: Vec<String>,
}

/// Request to load media on the receiver
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub content_id: String,
    pub content_type: String,
    pub metadata: GenericMediaMetadata,
    /// Start position in seconds
    pub current_time: f64,
    pub autoplay: bool,
}

/// Global cast context
pub trait CastContext: Send {
    fn set_options(&mut self, options: &CastOptions);

    /// The session with the connected receiver, if any
    fn current_session(&mut self) -> Option<Box<dyn CastSession>>;
}

/// A connection to one receiver device
pub trait CastSession: Send {
    /// Load media on the receiver; resolves once the receiver accepts or rejects it
    fn load_media(&mut self, request: &LoadRequest) -> Result<(), CastError>;

    /// Friendly name of the receiver device
    fn device_name(&self) -> String;
}

/// Remote player state plus the controller that acts on it
pub trait RemotePlayerController: Send {
    /// Start publishing change notifications into `events`
    fn attach(&mut self, events: EventSender);

    fn is_connected(&self) -> bool;

    fn is_paused(&self) -> bool;

    fn is_muted(&self) -> bool;

    /// Volume in `[0, 1]`
    fn volume_level(&self) -> f64;

    fn current_time(&self) -> f64;

    /// Duration in seconds, NaN while unknown
    fn duration(&self) -> f64;

    fn play_or_pause(&mut self);

    fn stop(&mut self);

    fn seek(&mut self, seconds: f64);

    fn set_volume_level(&mut self, level: f64);

    fn mute_or_unmute(&mut self);
}

/// The cast framework as handed to the player when it becomes available
pub struct CastFramework {
    pub context: Box<dyn CastContext>,
    pub remote: Box<dyn RemotePlayerController>,
}

impl CastFramework {
    pub fn new(context: Box<dyn CastContext>, remote: Box<dyn RemotePlayerController>) -> Self {
        Self { context, remote }
    }
}

impl std::fmt::Debug for CastFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastFramework")
            .field("connected", &self.remote.is_connected())
            .finish()
    }
}
