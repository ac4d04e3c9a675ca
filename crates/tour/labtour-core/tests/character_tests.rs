mod common;

use common::{
    mentor_manifest, mentor_script, ready_character, test_config, FakeLoader, RecordingNarrator,
    RecordingRenderer,
};
use labtour_core::{
    CharacterController, CharacterStatus, Easing, ModelHandle, NodeHandle, TourEvent, Transform,
};

const ALL_CLIPS: &[&str] = &[
    "idle", "walking", "talking_1", "talking_2", "waving", "pointing", "thinking",
];

const SERVER_LINE: &str = "Here are the servers that run everything.";
const NETWORK_LINE: &str = "This desk is where the network comes together.";

fn point(name: &str) -> Transform {
    mentor_script().point(name).unwrap()
}

#[test]
fn requests_before_ready_are_ignored() {
    let narrator = RecordingNarrator::default();
    let mut c = CharacterController::new(Box::new(narrator.clone()), mentor_script(), test_config());
    assert_eq!(c.status(), CharacterStatus::Uninitialized);

    assert!(!c.speak("hello", 1000, None));
    assert!(!c.say_after("hello", 0));
    assert!(!c.play_animation("idle"));
    assert!(!c.move_to(point("window"), 1.0, Easing::Linear));
    c.react_to_module_change(1);
    c.update(1.0);

    c.begin_loading();
    assert_eq!(c.status(), CharacterStatus::Loading);
    assert!(!c.greet());
    c.update(1.0);

    assert!(narrator.lines().is_empty());
    assert!(!c.is_moving());
    assert_eq!(c.active_animation(), None);
}

#[test]
fn ready_character_idles_at_home() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    assert!(c.is_ready());
    assert_eq!(c.active_animation(), Some("idle"));
    assert_eq!(c.transform(), mentor_script().home);
    let events = c.drain_events();
    assert!(events.contains(&TourEvent::CharacterReady { placeholder: false }));
}

#[test]
fn load_degrades_to_placeholder_and_skips_broken_clips() {
    let narrator = RecordingNarrator::default();
    let mut c = CharacterController::new(Box::new(narrator.clone()), mentor_script(), test_config());
    let mut loader = FakeLoader::failing(&["models/mentor.glb", "animations/pointing.glb"]);
    c.load(&mut loader, &mentor_manifest());

    assert!(c.is_ready());
    assert_eq!(c.model(), Some(ModelHandle::Placeholder));
    let lib = c.blender().library();
    assert_eq!(lib.len(), 6);
    assert!(!lib.contains("pointing"));
    assert!(lib.contains("waving"));
    assert_eq!(c.active_animation(), Some("idle"));
    assert!(c
        .drain_events()
        .contains(&TourEvent::CharacterReady { placeholder: true }));

    // the server rack reaction wants "pointing"; it falls back to idle
    c.react_to_module_change(1);
    c.update(0.6);
    c.update(2.0);
    assert_eq!(c.transform(), point("server_rack"));
    assert_eq!(c.active_animation(), Some("idle"));
    assert_eq!(narrator.lines(), vec![SERVER_LINE.to_string()]);
}

#[test]
fn manifest_looping_flag_overrides_name_inference() {
    let narrator = RecordingNarrator::default();
    let mut c = CharacterController::new(Box::new(narrator), mentor_script(), test_config());
    c.load(&mut FakeLoader::default(), &mentor_manifest());
    let lib = c.blender().library();
    assert_eq!(lib.get("thinking").unwrap().mode, labtour_core::LoopMode::Loop);
    assert_eq!(lib.get("waving").unwrap().mode, labtour_core::LoopMode::Once);
    assert_eq!(lib.get("idle").unwrap().mode, labtour_core::LoopMode::Loop);
}

#[test]
fn module_change_reacts_after_the_delay() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    c.drain_events();

    c.react_to_module_change(1);
    c.update(0.4);
    assert!(!c.is_moving());

    c.update(0.2);
    assert!(c.is_moving());
    assert_eq!(c.active_animation(), Some("walking"));
    assert_eq!(c.movement_state().target, point("server_rack"));

    c.update(1.0);
    assert!(c.is_moving());
    assert!(narrator.lines().is_empty());

    c.update(1.0);
    assert!(!c.is_moving());
    assert_eq!(c.transform(), point("server_rack"));
    assert_eq!(c.active_animation(), Some("pointing"));
    assert_eq!(narrator.lines(), vec![SERVER_LINE.to_string()]);

    let events = c.drain_events();
    assert!(events.contains(&TourEvent::MovementStarted {
        point: "server_rack".into()
    }));
    assert!(events.contains(&TourEvent::MovementFinished {
        point: "server_rack".into()
    }));
    assert!(events.contains(&TourEvent::Narration {
        text: SERVER_LINE.into()
    }));

    // 41 characters at 60ms each
    c.update(2.0);
    assert_eq!(c.active_animation(), Some("pointing"));
    c.update(0.5);
    assert_eq!(c.active_animation(), Some("idle"));
}

#[test]
fn newer_module_change_replaces_a_pending_reaction() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());

    c.react_to_module_change(1);
    c.update(0.2);
    c.react_to_module_change(2);
    c.update(0.4);
    assert!(!c.is_moving());
    c.update(0.2);
    assert!(c.is_moving());
    assert_eq!(c.movement_state().target, point("network_desk"));

    c.update(2.0);
    assert_eq!(c.transform(), point("network_desk"));
    assert_eq!(c.active_animation(), Some("talking_2"));
    assert_eq!(narrator.lines(), vec![NETWORK_LINE.to_string()]);
}

#[test]
fn unscripted_module_wanders() {
    let script = mentor_script();
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());

    c.react_to_module_change(7);
    c.update(0.6);
    assert!(c.is_moving());
    let target = c.movement_state().target;
    assert!(
        script.wander.iter().any(|p| script.point(p) == Some(target)),
        "{target:?} is not a wander point"
    );

    c.update(2.0);
    assert_eq!(c.transform(), target);
    assert_eq!(c.active_animation(), Some("thinking"));
    let lines = narrator.lines();
    assert_eq!(lines.len(), 1);
    assert!(script.wander_narrations.contains(&lines[0]));
}

#[test]
fn wander_choice_is_reproducible_with_a_seed() {
    let pick = || {
        let narrator = RecordingNarrator::default();
        let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
        c.react_to_module_change(5);
        c.update(0.6);
        (c.movement_state().target, narrator.lines())
    };
    assert_eq!(pick(), pick());
}

#[test]
fn skipped_reaction_leaves_the_wander_sequence_alone() {
    let first_wander = |skip_one: bool| {
        let narrator = RecordingNarrator::default();
        let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
        if skip_one {
            let spot = Transform::from_position([9.0, 0.0, 9.0]);
            assert!(c.move_to(spot, 1.0, Easing::Linear));
            c.react_to_module_change(7);
            c.update(0.6);
            c.update(1.0);
            assert_eq!(c.transform(), spot);
            assert!(narrator.lines().is_empty());
        }
        c.react_to_module_change(5);
        c.update(0.6);
        assert!(c.is_moving());
        let target = c.movement_state().target;
        c.update(2.0);
        (target, narrator.lines())
    };
    assert_eq!(first_wander(true), first_wander(false));
}

#[test]
fn reaction_is_skipped_while_already_moving() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    let spot = Transform::from_position([9.0, 0.0, 9.0]);
    assert!(c.move_to(spot, 5.0, Easing::Linear));
    assert!(!c.move_to(point("window"), 1.0, Easing::Linear));

    c.react_to_module_change(1);
    c.update(0.6);
    assert_eq!(c.movement_state().target, spot);

    c.update(5.0);
    assert_eq!(c.transform(), spot);
    assert!(narrator.lines().is_empty());
    assert_eq!(c.active_animation(), Some("idle"));
}

#[test]
fn speak_prefers_requested_clip_then_talk_list() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, &["idle", "talking_2", "talking", "waving"], test_config());

    assert!(c.speak("hello", 1000, Some("nonexistent")));
    assert_eq!(c.active_animation(), Some("talking_2"));
    assert_eq!(narrator.lines(), vec!["hello".to_string()]);

    c.update(0.5);
    assert_eq!(c.active_animation(), Some("talking_2"));
    c.update(0.5);
    assert_eq!(c.active_animation(), Some("idle"));

    assert!(c.speak("bye", 1000, Some("waving")));
    assert_eq!(c.active_animation(), Some("waving"));
}

#[test]
fn speak_without_talk_clips_still_narrates() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, &["idle"], test_config());
    assert!(c.speak("quiet", 500, None));
    assert_eq!(c.active_animation(), Some("idle"));
    assert_eq!(narrator.lines(), vec!["quiet".to_string()]);
}

#[test]
fn later_speech_extends_the_talking_window() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    c.speak("first", 1000, None);
    c.update(0.5);
    c.speak("second", 1000, None);
    c.update(0.6);
    assert_eq!(c.active_animation(), Some("talking_1"));
    c.update(0.5);
    assert_eq!(c.active_animation(), Some("idle"));
}

#[test]
fn greet_uses_the_greeting_clip() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    assert!(c.greet());
    assert_eq!(c.active_animation(), Some("waving"));
    assert_eq!(
        narrator.lines(),
        vec!["Welcome to the lab! I'll be your guide.".to_string()]
    );
}

#[test]
fn queued_line_waits_and_is_replaced_by_newer_speech() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    assert!(c.say_after("later", 500));
    c.update(0.4);
    assert!(narrator.lines().is_empty());
    c.update(0.2);
    assert_eq!(narrator.lines(), vec!["later".to_string()]);
    assert_eq!(c.active_animation(), Some("talking_1"));

    assert!(c.say_after("dropped", 500));
    c.speak("now", 1000, None);
    c.update(1.0);
    assert_eq!(narrator.lines(), vec!["later".to_string(), "now".to_string()]);
}

#[test]
fn cancel_movement_returns_to_idle_without_arrival() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    c.move_to(point("plant"), 2.0, Easing::EaseInOutCubic);
    c.update(0.5);
    c.cancel_movement();
    assert!(!c.is_moving());
    assert_eq!(c.active_animation(), Some("idle"));
    c.update(3.0);
    assert_ne!(c.transform(), point("plant"));
    assert!(!c
        .drain_events()
        .iter()
        .any(|e| matches!(e, TourEvent::MovementFinished { .. })));
}

#[test]
fn attach_and_detach_go_through_the_renderer() {
    let narrator = RecordingNarrator::default();
    let c = ready_character(&narrator, ALL_CLIPS, test_config());
    let mut renderer = RecordingRenderer::default();
    c.attach(&mut renderer);
    assert_eq!(renderer.attached, vec![ModelHandle::Loaded(NodeHandle(1))]);
    c.detach(&mut renderer);
    assert!(renderer.attached.is_empty());
}

#[test]
fn dispose_releases_everything() {
    let narrator = RecordingNarrator::default();
    let mut c = ready_character(&narrator, ALL_CLIPS, test_config());
    c.move_to(point("plant"), 2.0, Easing::Linear);
    c.speak("hi", 1000, None);
    c.dispose();
    assert_eq!(c.status(), CharacterStatus::Uninitialized);
    assert_eq!(c.model(), None);
    assert_eq!(c.active_animation(), None);
    assert!(!c.is_moving());
    assert!(!c.speak("again", 1000, None));
}
