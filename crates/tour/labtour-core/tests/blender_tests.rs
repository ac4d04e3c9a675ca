mod common;

use common::{approx, library};
use labtour_core::AnimationBlender;

fn blender() -> AnimationBlender {
    AnimationBlender::new(library(&["idle", "walking", "talking_1", "talking_2", "waving"]))
}

#[test]
fn replaying_the_active_clip_is_a_no_op() {
    let mut b = blender();
    assert!(b.play_animation("idle", 0.2, true));
    b.advance(0.1);
    let before = b.clip("idle").unwrap().clone();
    approx(before.weight, 0.5, 1e-5);

    assert!(b.play_animation("idle", 0.2, true));
    let after = b.clip("idle").unwrap();
    assert_eq!(after.time, before.time);
    assert_eq!(after.weight, before.weight);
    assert_eq!(b.playing_count(), 1);
}

#[test]
fn unknown_clip_is_rejected_without_side_effects() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    assert!(!b.play_animation("backflip", 0.3, true));
    assert_eq!(b.active_name(), Some("idle"));
    assert_eq!(b.weight_of("idle"), 1.0);
}

#[test]
fn crossfade_moves_weight_between_two_clips() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    b.play_animation("walking", 0.4, true);
    assert_eq!(b.playing_count(), 2);

    b.advance(0.1);
    approx(b.weight_of("idle"), 0.75, 1e-4);
    approx(b.weight_of("walking"), 0.25, 1e-4);

    b.advance(0.3);
    assert_eq!(b.weight_of("walking"), 1.0);
    assert_eq!(b.weight_of("idle"), 0.0);
    assert_eq!(b.playing_count(), 1);
    assert!(!b.clip("idle").unwrap().enabled);
}

#[test]
fn rapid_requests_settle_on_the_latest_clip() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    b.play_animation("talking_1", 0.3, true);
    b.play_animation("talking_2", 0.3, true);

    assert_eq!(b.active_name(), Some("talking_2"));
    // idle is neither outgoing nor incoming any more
    assert!(!b.clip("idle").unwrap().enabled);
    assert!(b.playing_count() <= 2);

    b.advance(0.3);
    assert_eq!(b.weight_of("talking_2"), 1.0);
    assert_eq!(b.weight_of("talking_1"), 0.0);
    assert_eq!(b.playing_count(), 1);
}

#[test]
fn never_more_than_two_clips_overlap() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    for name in ["walking", "talking_1", "waving", "talking_2", "idle"] {
        b.play_animation(name, 0.5, true);
        b.advance(0.1);
        assert!(b.playing_count() <= 2, "{} clips after {name}", b.playing_count());
    }
}

#[test]
fn zero_fade_switches_instantly() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    b.play_animation("waving", 0.0, true);
    assert_eq!(b.weight_of("waving"), 1.0);
    assert_eq!(b.weight_of("idle"), 0.0);
    assert_eq!(b.playing_count(), 1);
}

#[test]
fn resume_keeps_clip_time_when_not_reset() {
    let mut b = blender();
    b.play_animation("talking_1", 0.0, true);
    b.advance(0.5);
    b.play_animation("idle", 0.0, true);
    b.play_animation("talking_1", 0.0, false);
    approx(b.clip("talking_1").unwrap().time, 0.5, 1e-6);

    b.play_animation("idle", 0.0, true);
    b.play_animation("talking_1", 0.0, true);
    assert_eq!(b.clip("talking_1").unwrap().time, 0.0);
}

#[test]
fn one_shot_clip_holds_its_last_frame() {
    let mut b = blender();
    b.play_animation("waving", 0.0, true);
    b.advance(0.75);
    b.advance(0.75);
    assert_eq!(b.clip("waving").unwrap().time, 1.0);
    assert_eq!(b.weight_of("waving"), 1.0);
}

#[test]
fn stop_all_clears_everything() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    b.play_animation("walking", 0.3, true);
    b.stop_all();
    assert_eq!(b.active_name(), None);
    assert_eq!(b.playing_count(), 0);
    assert!(b.poses().is_empty());
}

#[test]
fn poses_report_enabled_clips() {
    let mut b = blender();
    b.play_animation("idle", 0.0, true);
    b.play_animation("walking", 0.2, true);
    b.advance(0.1);
    let mut names: Vec<_> = b.poses().into_iter().map(|p| p.name).collect();
    names.sort();
    assert_eq!(names, vec!["idle".to_string(), "walking".to_string()]);
}
