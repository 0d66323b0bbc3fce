use std::cell::RefCell;
use std::rc::Rc;

use mimic_playback_core::{
    HumanoidSkeleton, Landmark, Landmark2D, MemorySkeleton, PlaybackEvent, PosePlayer, RigFrame,
    SkeletonHandle, TransportState,
};
use mimic_rig_core::HumanoidBone;
use mimic_test_fixtures::{poses, solvers};

type Solver = fn(&[Landmark], &[Landmark2D]) -> anyhow::Result<RigFrame>;

fn mk_player(fixture: &str) -> PosePlayer<Solver> {
    let mut player = PosePlayer::new(solvers::head_x as Solver);
    player
        .load_str(&poses::json(fixture).unwrap())
        .unwrap_or_else(|e| panic!("{fixture}: {e}"));
    player
}

fn mk_skeleton() -> (Rc<RefCell<MemorySkeleton>>, SkeletonHandle) {
    let skel = Rc::new(RefCell::new(MemorySkeleton::full()));
    let handle: SkeletonHandle = skel.clone();
    (skel, handle)
}

fn head_x(skel: &Rc<RefCell<MemorySkeleton>>) -> f32 {
    skel.borrow()
        .bone_rotation(HumanoidBone::Head)
        .map_or(f32::NAN, |r| r.x)
}

/// Deterministic jitter in [-amp, amp].
struct Jitter(u64);

impl Jitter {
    fn next(&mut self, amp: f64) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let unit = (self.0 >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * amp
    }
}

/// it should present frames 0..N-1 then wrap to 0 without skips or repeats
#[test]
fn loop_visits_every_frame_in_order() {
    let mut player = mk_player("canonical-5f-30fps");
    let (skel, handle) = mk_skeleton();
    player.bind_skeleton(&handle);
    player.play(0.0).unwrap();

    let mut shown = Vec::new();
    let mut applied = Vec::new();
    // 7 ms refresh against 30 fps data, for seven seconds
    for k in 1..=1000 {
        if let Some(index) = player.tick(k as f64 * 7.0) {
            shown.push(index);
            applied.push(head_x(&skel));
        }
    }
    assert!(shown.len() >= 200, "only {} advances", shown.len());
    for (i, index) in shown.iter().enumerate() {
        assert_eq!(*index, i % 5);
        assert_eq!(applied[i], (i % 5) as f32);
    }
    assert_eq!(player.render_count(), 1000);
}

/// it should keep the long-run frame rate under tick jitter
#[test]
fn pacing_does_not_drift_with_jitter() {
    for (seed, fps_fixture, fps) in [(7u64, "canonical-5f-30fps", 30.0), (99, "canonical-12f-60fps", 60.0)] {
        let mut player = mk_player(fps_fixture);
        player.play(0.0).unwrap();
        let mut jitter = Jitter(seed);
        let mut advances = 0usize;
        let mut last = 0.0;
        // 144 Hz refresh for ten seconds, +-2 ms jitter
        for k in 1..=1440 {
            let now = k as f64 * 1000.0 / 144.0 + jitter.next(2.0);
            if player.tick(now).is_some() {
                advances += 1;
            }
            last = now;
        }
        let expected = (last / 1000.0 * fps).floor() as i64;
        let diff = advances as i64 - expected;
        assert!(diff.abs() <= 1, "fps {fps}: {advances} advances, expected ~{expected}");
    }
}

/// it should not advance while paused or stopped, but still count renders
#[test]
fn idle_ticks_only_render() {
    let mut player = mk_player("canonical-5f-30fps");
    assert_eq!(player.tick(1_000.0), None);
    player.play(0.0).unwrap();
    player.tick(40.0);
    player.pause();
    assert_eq!(player.tick(10_000.0), None);
    player.stop();
    assert_eq!(player.tick(20_000.0), None);
    assert_eq!(player.render_count(), 4);
    assert_eq!(player.state().current_frame_index, 0);
}

/// it should resume from the paused frame with a fresh anchor
#[test]
fn resume_continues_from_current_frame() {
    let mut player = mk_player("canonical-5f-30fps");
    player.play(0.0).unwrap();
    assert_eq!(player.tick(34.0), Some(0));
    assert_eq!(player.tick(68.0), Some(1));
    player.pause();
    assert_eq!(player.state().current_frame_index, 2);

    player.play(5_000.0).unwrap();
    // a long pause does not produce a catch-up burst
    assert_eq!(player.tick(5_010.0), None);
    assert_eq!(player.tick(5_034.0), Some(2));
}

/// it should clamp any seek target and apply that frame while paused
#[test]
fn seek_clamps_and_applies_immediately() {
    let mut player = mk_player("canonical-5f-30fps");
    let (skel, handle) = mk_skeleton();
    player.bind_skeleton(&handle);

    for (target, expected) in [(-10i64, 0usize), (3, 3), (4, 4), (5, 4), (i64::MAX, 4), (i64::MIN, 0)] {
        assert_eq!(player.seek(target), Some(expected));
        assert_eq!(player.state().current_frame_index, expected);
        assert_eq!(head_x(&skel), expected as f32);
        assert_eq!(player.transport_state(), TransportState::Paused);
    }
}

/// it should leave Stopped for Paused when seeking off frame 0
#[test]
fn seek_while_stopped_pauses_at_target() {
    let mut player = mk_player("canonical-5f-30fps");
    let (skel, handle) = mk_skeleton();
    player.bind_skeleton(&handle);
    player.play(0.0).unwrap();
    player.stop();
    player.take_events();

    assert_eq!(player.seek(3), Some(3));
    let state = player.state();
    assert_eq!(state.state, TransportState::Paused);
    assert_eq!(state.current_frame_index, 3);
    assert_eq!(head_x(&skel), 3.0);
    assert!(player.take_events().iter().any(|e| matches!(
        e,
        PlaybackEvent::StateChanged {
            from: TransportState::Stopped,
            to: TransportState::Paused
        }
    )));

    player.stop();
    assert_eq!(player.step(0), Some(0));
    assert_eq!(player.transport_state(), TransportState::Stopped);
    assert_eq!(player.step(2), Some(2));
    assert_eq!(player.transport_state(), TransportState::Paused);
}

/// it should step relative to the current frame
#[test]
fn step_moves_relative() {
    let mut player = mk_player("canonical-5f-30fps");
    assert_eq!(player.step(1), Some(1));
    assert_eq!(player.step(1), Some(2));
    assert_eq!(player.step(-5), Some(0));
    assert_eq!(player.step(100), Some(4));
}

/// it should toggle between playing and paused
#[test]
fn toggle_flips_play_state() {
    let mut player = mk_player("canonical-5f-30fps");
    player.toggle(0.0).unwrap();
    assert!(player.state().is_playing);
    player.toggle(10.0).unwrap();
    assert!(!player.state().is_playing);
    assert_eq!(player.state().last_tick_ms, None);

    let events = player.take_events();
    let transitions: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (TransportState::Paused, TransportState::Playing),
            (TransportState::Playing, TransportState::Paused)
        ]
    );
}

/// it should apply seeked frames idempotently
#[test]
fn reapplying_a_frame_changes_nothing() {
    let mut player = mk_player("canonical-5f-30fps");
    let (skel, handle) = mk_skeleton();
    player.bind_skeleton(&handle);
    player.seek(3);
    let once = skel.borrow().clone();
    player.seek(3);
    assert_eq!(*skel.borrow(), once);
    // writing through the trait object directly behaves the same
    let _ = handle
        .borrow_mut()
        .set_bone_rotation(HumanoidBone::Head, once.bone_rotation(HumanoidBone::Head).unwrap());
    assert_eq!(*skel.borrow(), once);
}
