//! Output contracts from the tour.
//!
//! A [`TourFrame`] carries what the host needs to draw this frame (the
//! mentor's transform and clip poses) plus the semantic events raised since
//! the previous frame. Adapters (Bevy/WASM) apply the pose and forward events.

use serde::{Deserialize, Serialize};

use crate::blender::ClipPose;
use crate::transform::Transform;

/// Discrete signals raised by the progression engine and the character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TourEvent {
    Started,
    StepShown {
        module: usize,
        step: usize,
    },
    ModuleChanged {
        module: usize,
    },
    Completed,
    ActionFailed {
        label: String,
        message: String,
    },
    CharacterReady {
        placeholder: bool,
    },
    MovementStarted {
        point: String,
    },
    MovementFinished {
        point: String,
    },
    AnimationChanged {
        name: String,
    },
    Narration {
        text: String,
    },
}

/// Where the learner is. `completed` implies `module == module count`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub module: usize,
    pub step: usize,
    pub completed: bool,
}

/// Returned by `Tour::update`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TourFrame {
    pub transform: Transform,
    pub moving: bool,
    #[serde(default)]
    pub clips: Vec<ClipPose>,
    #[serde(default)]
    pub events: Vec<TourEvent>,
    pub progress: ProgressSnapshot,
}

impl TourFrame {
    #[inline]
    pub fn clear(&mut self) {
        self.clips.clear();
        self.events.clear();
    }

    pub fn has_event(&self, pred: impl Fn(&TourEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}
