//! Eased transform interpolation for the character.
//!
//! The controller owns the character's [`Transform`]. A movement carries a
//! completion payload `C` that [`MovementController::tick`] hands back exactly
//! once, on the tick that reaches the target. Callers decide what "complete"
//! means: the character uses a cue enum, tests can use a closure.

use serde::{Deserialize, Serialize};

use crate::interp::Easing;
use crate::transform::Transform;

/// Snapshot of the interpolation state. `start`, `target` and `elapsed` are
/// meaningless while `moving` is false.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    pub moving: bool,
    pub start: Transform,
    pub target: Transform,
    pub elapsed: f32,
    /// Seconds. Zero means "finish on the next tick".
    pub duration: f32,
    pub easing: Easing,
}

#[derive(Debug)]
pub struct MovementController<C = ()> {
    transform: Transform,
    state: MovementState,
    /// Elapsed time accumulated in f64 so per-frame deltas that sum to the
    /// duration actually reach it.
    elapsed: f64,
    on_complete: Option<C>,
}

impl<C> Default for MovementController<C> {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl<C> MovementController<C> {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            state: MovementState::default(),
            elapsed: 0.0,
            on_complete: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_moving(&self) -> bool {
        self.state.moving
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Place the character without interpolating. Ignored while moving.
    pub fn teleport(&mut self, transform: Transform) -> bool {
        if self.state.moving {
            log::warn!("teleport ignored: movement in progress");
            return false;
        }
        self.transform = transform;
        true
    }

    /// Start moving from the current transform to `target`.
    ///
    /// Returns `false` and leaves the running movement untouched if one is
    /// already in progress; there is no queue.
    pub fn move_to(
        &mut self,
        target: Transform,
        duration: f32,
        easing: Easing,
        on_complete: C,
    ) -> bool {
        if self.state.moving {
            log::warn!(
                "move_to rejected: already moving to {:?}",
                self.state.target.position
            );
            return false;
        }
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.state = MovementState {
            moving: true,
            start: self.transform,
            target,
            elapsed: 0.0,
            duration,
            easing,
        };
        self.elapsed = 0.0;
        self.on_complete = Some(on_complete);
        true
    }

    /// Advance by `dt` seconds. Returns the completion payload on the tick the
    /// target is reached, `None` otherwise.
    pub fn tick(&mut self, dt: f32) -> Option<C> {
        if !self.state.moving {
            return None;
        }
        let s = &mut self.state;
        let duration = f64::from(s.duration);
        self.elapsed = (self.elapsed + f64::from(dt.max(0.0))).min(duration);
        s.elapsed = self.elapsed as f32;
        let progress = if duration > 0.0 {
            (self.elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            // Snap so no interpolation residue survives.
            self.transform = s.target;
            s.moving = false;
            return self.on_complete.take();
        }

        let eased = s.easing.apply(progress as f32);
        self.transform = s.start.lerp(&s.target, eased);
        None
    }

    /// Stop where we are. The completion payload is dropped unexecuted.
    pub fn cancel(&mut self) {
        if self.state.moving {
            log::debug!("movement cancelled at {:?}", self.transform.position);
        }
        self.state.moving = false;
        self.on_complete = None;
    }
}

impl<F: FnOnce()> MovementController<F> {
    /// Tick and run the completion closure if this tick finished the movement.
    pub fn tick_and_complete(&mut self, dt: f32) -> bool {
        match self.tick(dt) {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }
}
