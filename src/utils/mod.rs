//! Utility module for html5-video
//!
//! - Error handling with custom error types
//! - Configuration management
//! - Small formatting helpers used by the replay tool

pub mod config;
pub mod error;

pub use config::{AutoJoinPolicy, CastConfig, Config, GeneralConfig};
pub use error::{Html5VideoError, IntoVideoError, Result};

/// Load the application configuration
///
/// See [`Config::load`] for the order in which sources are applied.
pub fn load_config() -> Result<Config> {
    Config::load()
}

/// Format a playback time in seconds for display
///
/// Returns "HH:MM:SS", or "MM:SS" for times under an hour. Negative and
/// non-finite values are shown as zero.
pub fn format_seconds(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
