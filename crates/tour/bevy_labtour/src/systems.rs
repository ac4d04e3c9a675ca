use bevy::prelude::*;

use crate::components::MentorCharacter;
use crate::resources::{LastTourFrame, PanelView, TourResource};
use crate::{TourCommandEvent, TourNotification};

/// Feed queued commands to the tour before it ticks.
pub fn apply_commands_system(
    mut commands: EventReader<TourCommandEvent>,
    tour: Option<NonSendMut<TourResource>>,
) {
    let Some(mut tour) = tour else {
        commands.clear();
        return;
    };
    for TourCommandEvent(cmd) in commands.read() {
        if !tour.tour.apply(*cmd) {
            warn!("tour command {cmd:?} was not applied");
        }
    }
}

/// Advance the mentor by the frame delta, stage the frame and forward its events.
pub fn tick_tour_system(
    time: Res<Time>,
    tour: Option<NonSendMut<TourResource>>,
    mut last: ResMut<LastTourFrame>,
    mut panel: ResMut<PanelView>,
    mut out: EventWriter<TourNotification>,
) {
    let Some(mut tour) = tour else {
        return;
    };
    let frame = tour.tour.update(time.delta_seconds()).clone();
    for event in &frame.events {
        out.send(TourNotification(event.clone()));
    }
    last.0 = frame;

    match tour.take_panel() {
        Some(view) => *panel = view,
        None if !panel.notices.is_empty() => panel.notices.clear(),
        None => {}
    }
}

/// Copy the mentor transform onto every marked entity. Rotation is XYZ Euler
/// radians.
pub fn apply_mentor_transform_system(
    last: Res<LastTourFrame>,
    mut q: Query<&mut Transform, With<MentorCharacter>>,
) {
    let t = last.0.transform;
    let translation = Vec3::from_array(t.position);
    let rotation = Quat::from_euler(EulerRot::XYZ, t.rotation[0], t.rotation[1], t.rotation[2]);
    for mut tf in q.iter_mut() {
        tf.translation = translation;
        tf.rotation = rotation;
    }
}
