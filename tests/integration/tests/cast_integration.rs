//! Integration tests for the cast handoff
//!
//! A fake cast framework stands in for the browser's. These tests verify:
//! - Framework setup and the disabled/unavailable paths
//! - Routing of transport calls while a receiver is connected
//! - Remote state flowing back into the state machine
//! - Handing playback back without a state reset

use anyhow::Result;
use html5_video::cast::{CastErrorCode, RemoteMediaState};
use html5_video::player::{PlayerState, VideoPlayer};
use html5_video::utils::{AutoJoinPolicy, CastConfig};
use html5_video_integration_tests::fake_cast::FakeReceiver;
use html5_video_integration_tests::{lecture_config, TestPlayer};

/// A player that is playing at 42s with the cast framework available
fn casting_player() -> Result<(TestPlayer, FakeReceiver)> {
    let mut test = TestPlayer::new(lecture_config())?;
    let receiver = FakeReceiver::new();
    assert!(test.player.cast_api_available(Some(receiver.framework())));

    test.load(300.0);
    test.player.play_video();
    test.run();
    test.surface.advance(42.0);
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Playing);

    Ok((test, receiver))
}

#[test]
fn test_framework_options_applied() -> Result<()> {
    let (_test, receiver) = casting_player()?;
    let state = receiver.state();
    let options = state.options.as_ref().unwrap();
    assert_eq!(options.receiver_application_id, "CC1AD845");
    assert_eq!(options.auto_join_policy, AutoJoinPolicy::OriginScoped);
    Ok(())
}

#[test]
fn test_connect_mid_playback_routes_to_remote() -> Result<()> {
    let (mut test, receiver) = casting_player()?;

    receiver.connect();
    test.run();

    assert!(test.player.is_remote_active());
    assert_eq!(test.player.cast_device(), Some("Classroom Display"));
    assert_eq!(test.player.remote_media_state(), RemoteMediaState::Loaded);
    assert!(test.surface.is_paused());
    assert!(test.player.view().surface_hidden);
    assert_eq!(test.player.player_state(), PlayerState::Playing);

    {
        let state = receiver.state();
        let request = &state.loads[0];
        assert_eq!(request.content_id, "https://cdn.example/lecture.mp4");
        assert_eq!(request.content_type, "video/mp4");
        assert_eq!(request.current_time, 42.0);
        assert!(request.autoplay);
        assert_eq!(request.metadata.images, vec!["https://cdn.example/lecture.jpg".to_string()]);
        assert!(!state.paused);
    }

    test.player.pause_video();
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Paused);
    assert!(receiver.state().paused);

    test.player.play_video();
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Playing);
    assert!(test.surface.is_paused());

    assert_eq!(test.recorder.lock().state_codes(), vec![2, 3, 1, 2, 3, 1]);
    Ok(())
}

#[test]
fn test_disconnect_returns_control_without_reset() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect();
    test.run();
    test.player.pause_video();
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Paused);

    receiver.disconnect();
    test.run();
    assert!(!test.player.is_remote_active());
    assert!(!test.player.view().surface_hidden);
    assert_eq!(test.player.player_state(), PlayerState::Paused);
    assert_eq!(test.player.current_time(), 42.0);

    test.player.play_video();
    test.run();
    assert!(!test.surface.is_paused());
    assert_eq!(test.player.player_state(), PlayerState::Playing);
    Ok(())
}

#[test]
fn test_local_events_while_casting_only_logged() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect();
    test.run();

    let before = test.player.logs().len();
    let states_before = test.recorder.lock().states.len();

    test.surface.play();
    test.run();

    assert_eq!(test.player.logs().len(), before + 2);
    assert_eq!(test.recorder.lock().states.len(), states_before);
    Ok(())
}

#[test]
fn test_remote_pause_from_receiver() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect();
    test.run();

    receiver.set_paused(true);
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Paused);

    receiver.set_paused(false);
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Playing);
    Ok(())
}

#[test]
fn test_remote_seek_and_stop() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect();
    test.run();
    assert_eq!(test.player.duration(), 600.0);

    test.player.seek_to(700.0);
    test.player.seek_to(90.0);
    assert_eq!(test.player.current_time(), 90.0);

    test.player.stop_video();
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Paused);

    let state = receiver.state();
    assert_eq!(state.commands.last().map(String::as_str), Some("stop"));
    assert!(state.commands.contains(&"seek:90".to_string()));
    assert!(!state.commands.iter().any(|c| c == "seek:700"));
    Ok(())
}

#[test]
fn test_remote_volume_and_mute_mirrored() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect();
    test.run();

    receiver.set_volume_level(0.3);
    test.run();
    assert_eq!(test.player.volume(), 0.3);

    test.player.set_volume(80.0);
    test.run();
    assert_eq!(test.player.volume(), 0.8);

    test.player.set_volume(180.0);
    test.run();
    assert_eq!(test.player.volume(), 0.8);

    test.player.mute();
    test.run();
    assert!(test.player.is_muted());
    assert!(receiver.state().muted);

    receiver.disconnect();
    test.run();
    assert_eq!(test.player.volume(), 1.0);
    assert!(!test.player.is_muted());
    Ok(())
}

#[test]
fn test_rejected_load_keeps_session() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.reject_loads(CastErrorCode::SessionError, "receiver app crashed");

    receiver.connect();
    test.run();

    assert!(test.player.is_remote_active());
    assert_eq!(test.player.remote_media_state(), RemoteMediaState::Error);
    assert!(receiver.state().paused);
    assert!(test.surface.is_paused());
    assert_eq!(test.player.player_state(), PlayerState::Paused);
    assert_eq!(test.recorder.lock().state_codes(), vec![2, 3, 1, 2]);
    assert_eq!(test.recorder.lock().errors, 0);
    Ok(())
}

#[test]
fn test_metadata_while_casting_readies_player() -> Result<()> {
    let mut test = TestPlayer::new(lecture_config())?;
    let receiver = FakeReceiver::new();
    assert!(test.player.cast_api_available(Some(receiver.framework())));

    receiver.connect();
    test.run();
    assert!(test.player.is_remote_active());
    assert_eq!(test.player.player_state(), PlayerState::Unstarted);

    test.load(300.0);
    assert_eq!(test.recorder.lock().ready, 1);
    assert!(test.player.is_ready());
    assert_eq!(test.player.player_state(), PlayerState::Paused);

    receiver.disconnect();
    test.run();
    assert!(!test.player.is_remote_active());
    assert_eq!(test.player.player_state(), PlayerState::Paused);

    test.player.play_video();
    test.run();
    assert_eq!(test.player.player_state(), PlayerState::Playing);

    let recorder = test.recorder.lock();
    assert_eq!(recorder.ready, 1);
    assert_eq!(recorder.state_codes(), vec![2, 3, 1]);
    Ok(())
}

#[test]
fn test_connect_without_session_stays_local() -> Result<()> {
    let (mut test, receiver) = casting_player()?;
    receiver.connect_without_session();
    test.run();

    assert!(!test.player.is_remote_active());
    assert!(!test.surface.is_paused());
    assert!(receiver.state().loads.is_empty());
    Ok(())
}

#[test]
fn test_unavailable_or_disabled_cast() -> Result<()> {
    let mut test = TestPlayer::new(lecture_config())?;
    assert!(!test.player.cast_api_available(None));

    let cast = CastConfig {
        enabled: false,
        ..CastConfig::default()
    };
    let mut test_disabled = TestPlayer::with_cast(lecture_config(), cast)?;
    let receiver = FakeReceiver::new();
    assert!(!test_disabled.player.cast_api_available(Some(receiver.framework())));
    assert!(receiver.state().options.is_none());

    receiver.connect();
    test.run();
    test_disabled.run();
    assert!(!test_disabled.player.is_remote_active());
    Ok(())
}
