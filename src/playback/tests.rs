use super::testing::FakeOutput;
use super::*;
use crate::playlist::{AudioBlob, PlaylistStore, Track};
use crate::storage::{KEY_AUDIO_POSITION, KeyValueStore, MemoryStore};
use proptest::prelude::*;
use std::time::Duration;

fn t(name: &str) -> Track {
    Track::new(
        name,
        AudioBlob::new(
            format!("/tmp/{name}"),
            name.as_bytes().to_vec(),
            Some(Duration::from_secs(200)),
        ),
    )
}

fn controller() -> (PlaybackController<FakeOutput>, FakeOutput) {
    let out = FakeOutput::new();
    (PlaybackController::new(out.clone()), out)
}

#[test]
fn starts_idle() {
    let (pc, _) = controller();
    assert_eq!(pc.state(), HandleState::Idle);
    assert!(pc.binding().is_none());
    assert_eq!(pc.progress(), 0.0);
}

#[test]
fn load_without_play_is_loaded_paused() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), false).unwrap();

    assert_eq!(pc.state(), HandleState::LoadedPaused);
    out.with(|s| {
        assert_eq!(s.loads.len(), 1);
        assert!(!s.playing);
        assert_eq!(s.bytes.as_deref(), Some(&b"a.mp3"[..]));
    });
}

#[test]
fn load_with_play_is_loaded_playing() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), true).unwrap();

    assert_eq!(pc.state(), HandleState::LoadedPlaying);
    assert!(out.with(|s| s.playing));
    assert_eq!(pc.urls().live(), 1);
}

#[test]
fn toggle_play_flips_between_loaded_states() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), false).unwrap();

    let state = pc.toggle_play();
    assert!(state.is_playing);
    assert_eq!(pc.state(), HandleState::LoadedPlaying);
    assert!(out.with(|s| s.playing));

    let state = pc.toggle_play();
    assert!(!state.is_playing);
    assert_eq!(pc.state(), HandleState::LoadedPaused);
    assert!(!out.with(|s| s.playing));
}

#[test]
fn toggle_play_while_idle_does_nothing() {
    let (mut pc, out) = controller();
    let state = pc.toggle_play();
    assert!(!state.is_playing);
    assert_eq!(pc.state(), HandleState::Idle);
    assert!(!out.with(|s| s.playing));
}

#[test]
fn swapping_tracks_revokes_the_previous_url() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), true).unwrap();
    let first = pc.binding().unwrap().as_str().to_string();

    pc.load_and_maybe_play(&t("b.mp3"), true).unwrap();
    let second = pc.binding().unwrap().as_str().to_string();

    assert_ne!(first, second);
    assert_eq!(pc.urls().live(), 1);
    assert_eq!(pc.urls().revoked(), 1);
    assert!(pc.urls().resolve(&first).is_none());
    assert!(pc.urls().resolve(&second).is_some());
    assert_eq!(out.with(|s| s.loads.clone()), vec![first, second]);
}

#[test]
fn many_swaps_never_leak_urls() {
    let (mut pc, _) = controller();
    for i in 0..50 {
        pc.load_and_maybe_play(&t(&format!("{i}.mp3")), i % 2 == 0).unwrap();
        assert_eq!(pc.urls().live(), 1);
    }
    assert_eq!(pc.urls().revoked(), 49);
}

#[test]
fn failed_load_leaves_controller_idle_and_unbound() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), true).unwrap();

    out.with(|s| s.fail_next_load = true);
    let err = pc.load_and_maybe_play(&t("b.mp3"), true).unwrap_err();
    assert!(matches!(err, PlaybackError::Decode { .. }));

    assert_eq!(pc.state(), HandleState::Idle);
    assert!(pc.binding().is_none());
    assert_eq!(pc.urls().live(), 0);
    assert!(!out.with(|s| s.playing));
}

#[test]
fn load_at_passes_start_offset() {
    let (mut pc, out) = controller();
    pc.load_at(&t("a.mp3"), true, Duration::from_secs(30)).unwrap();

    assert_eq!(out.with(|s| s.start_at), Duration::from_secs(30));
    assert!((pc.progress() - 15.0).abs() < 1e-9);
}

#[test]
fn time_update_guards_degenerate_durations() {
    type Pc = PlaybackController<FakeOutput>;
    assert_eq!(Pc::on_time_update(10.0, 0.0), 0.0);
    assert_eq!(Pc::on_time_update(f64::NAN, 100.0), 0.0);
    assert_eq!(Pc::on_time_update(10.0, f64::NAN), 0.0);
    assert_eq!(Pc::on_time_update(10.0, f64::INFINITY), 0.0);
    assert_eq!(Pc::on_time_update(25.0, 100.0), 25.0);
    assert_eq!(Pc::on_time_update(150.0, 100.0), 100.0);
}

#[test]
fn progress_is_zero_when_output_duration_unknown() {
    let (mut pc, out) = controller();
    let track = Track::new("x.mp3", AudioBlob::new("/tmp/x.mp3", b"x".to_vec(), None));
    pc.load_and_maybe_play(&track, true).unwrap();
    out.with(|s| s.current_time = 12.0);

    assert!(out.with(|s| s.duration.is_nan()));
    assert_eq!(pc.playback_state().progress_percent, 0.0);
}

#[test]
fn track_ended_advances_and_revokes_previous_binding() {
    let (mut pc, out) = controller();
    let mut playlist = PlaylistStore::new(MemoryStore::new());
    playlist.append(vec![t("0.mp3"), t("1.mp3"), t("2.mp3")]);
    playlist.select(1);
    pc.load_and_maybe_play(playlist.current_track().unwrap(), true)
        .unwrap();
    let old = pc.binding().unwrap().as_str().to_string();

    assert_eq!(pc.on_track_ended(&mut playlist).unwrap(), Some(2));

    assert_eq!(playlist.current_index(), 2);
    assert_eq!(pc.state(), HandleState::LoadedPlaying);
    assert_eq!(out.with(|s| s.bytes.clone()).as_deref(), Some(&b"2.mp3"[..]));
    assert!(pc.urls().resolve(&old).is_none());
    assert_eq!(pc.urls().live(), 1);
}

#[test]
fn track_ended_wraps_to_first() {
    let (mut pc, _) = controller();
    let mut playlist = PlaylistStore::new(MemoryStore::new());
    playlist.append(vec![t("0.mp3"), t("1.mp3")]);
    playlist.select(1);

    assert_eq!(pc.on_track_ended(&mut playlist).unwrap(), Some(0));
    assert_eq!(playlist.current_index(), 0);
}

#[test]
fn track_ended_on_empty_playlist_is_a_no_op() {
    let (mut pc, out) = controller();
    let mut playlist = PlaylistStore::new(MemoryStore::new());

    assert_eq!(pc.on_track_ended(&mut playlist).unwrap(), None);
    assert_eq!(pc.state(), HandleState::Idle);
    assert!(out.with(|s| s.loads.is_empty()));
}

#[test]
fn poll_ended_only_fires_while_playing() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), false).unwrap();
    out.with(|s| s.ended = true);
    assert!(!pc.poll_ended());

    pc.toggle_play();
    out.with(|s| s.ended = true);
    assert!(pc.poll_ended());
    assert!(!pc.poll_ended());
}

#[test]
fn session_end_saves_position() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), true).unwrap();
    out.with(|s| s.current_time = 42.5);

    let mut store = MemoryStore::new();
    pc.on_session_end(&mut store);
    assert_eq!(store.get(KEY_AUDIO_POSITION).as_deref(), Some("42.5"));
}

#[test]
fn session_end_survives_store_failure() {
    let (pc, out) = controller();
    out.with(|s| s.current_time = f64::NAN);

    let mut full = MemoryStore::with_quota(1);
    pc.on_session_end(&mut full);
    assert_eq!(full.get(KEY_AUDIO_POSITION), None);

    let mut store = MemoryStore::new();
    pc.on_session_end(&mut store);
    assert_eq!(store.get(KEY_AUDIO_POSITION).as_deref(), Some("0"));
}

#[test]
fn teardown_releases_binding() {
    let (mut pc, out) = controller();
    pc.load_and_maybe_play(&t("a.mp3"), true).unwrap();

    pc.teardown();
    assert_eq!(pc.state(), HandleState::Idle);
    assert!(pc.binding().is_none());
    assert_eq!(pc.urls().live(), 0);
    assert_eq!(out.with(|s| s.stopped), 1);
}

proptest! {
    #[test]
    fn progress_is_always_finite_and_bounded(current in any::<f64>(), duration in any::<f64>()) {
        let p = progress_percent(current, duration);
        prop_assert!(p.is_finite());
        prop_assert!((0.0..=100.0).contains(&p));
    }
}
