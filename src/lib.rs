//! html5-video - HTML5 video playback controller
//!
//! Drives a native media surface through the same calls and state codes as a
//! YouTube IFrame player, relays lifecycle notifications to the host and hands
//! playback over to a cast receiver when one connects.

pub mod cast;
pub mod media;
pub mod player;
pub mod utils;

pub use cast::{CastError, CastErrorCode, CastFramework, RemoteMediaState};
pub use media::{HeadlessHandle, HeadlessSurface, HostContainer, MediaEvent, MediaEventKind, MediaSurface};
pub use player::{
    Html5Player, Html5PlayerBuilder, PlayerConfig, PlayerEvent, PlayerEvents, PlayerState,
    StateChange, VideoPlayer, VideoSource,
};
pub use utils::{Config, Html5VideoError, Result};
