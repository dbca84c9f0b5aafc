//! Integration tests for configuration loading
//!
//! Environment overrides touch process-wide state, so those tests run serially.

use anyhow::Result;
use html5_video::player::{Html5PlayerBuilder, VideoPlayer, VideoSource};
use html5_video::utils::{AutoJoinPolicy, Config};
use html5_video::HeadlessSurface;
use html5_video_integration_tests::TestFixture;
use serial_test::serial;

const ENV_VARS: [&str; 5] = [
    "HTML5_VIDEO_POSTER",
    "HTML5_VIDEO_DEBUG",
    "HTML5_VIDEO_CAST_ENABLED",
    "HTML5_VIDEO_CAST_APP_ID",
    "HTML5_VIDEO_LOG_LEVEL",
];

fn clear_env() {
    for name in ENV_VARS {
        std::env::remove_var(name);
    }
}

#[test]
fn test_partial_file_keeps_defaults() -> Result<()> {
    let fixture = TestFixture::new()?;
    let path = fixture.write_raw(
        "partial.toml",
        r#"
[player]
poster = "https://cdn.example/poster.png"
video_sources = [
    { format = "mp4", url = "https://cdn.example/intro.mp4" },
    { format = "webm", url = "https://cdn.example/intro.webm" },
]

[cast]
auto_join_policy = "page_scoped"
"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.player.video_sources.len(), 2);
    assert_eq!(config.player.playback_rates, vec![0.75, 1.0, 1.25, 1.5]);
    assert_eq!(config.player.event_namespace, "html5");
    assert!(config.cast.enabled);
    assert_eq!(config.cast.receiver_application_id, "CC1AD845");
    assert_eq!(config.cast.auto_join_policy, AutoJoinPolicy::PageScoped);
    assert_eq!(config.general.log_level, "info");
    config.validate()?;
    Ok(())
}

#[test]
fn test_saved_config_builds_player() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut config = Config::default();
    config.player.video_sources = vec![VideoSource::from_url("https://cdn.example/talk.ogv")];
    config.player.playback_rates = vec![0.5, 1.0, 2.0];
    config.cast.enabled = false;

    let path = fixture.write_config(&config)?;
    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.player.video_sources, config.player.video_sources);
    assert!(!loaded.cast.enabled);

    let (surface, handle) = HeadlessSurface::new();
    let player = Html5PlayerBuilder::from_config(&loaded).build(Box::new(surface))?;
    assert_eq!(player.available_playback_rates(), &[0.5, 1.0, 2.0]);
    assert_eq!(handle.sources()[0].format, "ogv");
    Ok(())
}

#[test]
fn test_malformed_file_is_config_error() -> Result<()> {
    let fixture = TestFixture::new()?;
    let path = fixture.write_raw("broken.toml", "[player\nposter = ")?;
    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Failed to parse config file"));
    Ok(())
}

#[test]
#[serial]
fn test_env_overrides() -> Result<()> {
    clear_env();
    std::env::set_var("HTML5_VIDEO_POSTER", "https://cdn.example/env.png");
    std::env::set_var("HTML5_VIDEO_DEBUG", "true");
    std::env::set_var("HTML5_VIDEO_CAST_APP_ID", "4F8B3483");
    std::env::set_var("HTML5_VIDEO_LOG_LEVEL", "debug");

    let mut config = Config::default();
    let result = config.apply_env_overrides();
    clear_env();
    result?;

    assert_eq!(config.player.poster.as_deref(), Some("https://cdn.example/env.png"));
    assert!(config.player.debug);
    assert_eq!(config.cast.receiver_application_id, "4F8B3483");
    assert_eq!(config.general.log_level, "debug");
    Ok(())
}

#[test]
#[serial]
fn test_invalid_env_flag_rejected() {
    clear_env();
    std::env::set_var("HTML5_VIDEO_CAST_ENABLED", "sometimes");

    let mut config = Config::default();
    let result = config.apply_env_overrides();
    clear_env();

    assert!(result.is_err());
    assert!(config.cast.enabled);
}

#[test]
#[serial]
fn test_invalid_log_level_fails_validation() {
    clear_env();
    std::env::set_var("HTML5_VIDEO_LOG_LEVEL", "loud");

    let mut config = Config::default();
    config.player.video_sources = vec![VideoSource::from_url("https://cdn.example/a.mp4")];
    let applied = config.apply_env_overrides();
    clear_env();

    assert!(applied.is_ok());
    assert!(config.validate().is_err());
}
