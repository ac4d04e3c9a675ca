use bevy::prelude::*;
use labtour_core::{TourCommand, TourEvent};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::MentorCharacter;
pub use resources::{LastTourFrame, PanelView, TourResource};

/// Navigation request from UI or gameplay code.
#[derive(Event, Copy, Clone, Debug, PartialEq, Eq)]
pub struct TourCommandEvent(pub TourCommand);

/// A core event re-published for Bevy systems.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct TourNotification(pub TourEvent);

/// Drives a [`TourResource`] once per `Update`. The resource is supplied by
/// the app via `insert_non_send_resource`; until then the systems idle.
pub struct LabTourPlugin;

impl Plugin for LabTourPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastTourFrame>()
            .init_resource::<PanelView>()
            .add_event::<TourCommandEvent>()
            .add_event::<TourNotification>()
            .add_systems(
                Update,
                (
                    systems::apply_commands_system,
                    systems::tick_tour_system,
                    systems::apply_mentor_transform_system,
                )
                    .chain(),
            );
    }
}
