use bevy::prelude::*;

/// Marker for the entity whose `Transform` follows the mentor.
#[derive(Component, Debug, Default)]
pub struct MentorCharacter;
