//! Character placement value type.

use serde::{Deserialize, Serialize};

use crate::interp::functions::lerp_vec3;

/// Position plus Euler rotation (XYZ order, radians). Copied, never shared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: [0.0; 3],
        rotation: [0.0; 3],
    };

    pub fn new(position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            rotation: [0.0; 3],
        }
    }

    /// Component-wise interpolation of position and rotation with the same `t`.
    #[inline]
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            position: lerp_vec3(self.position, other.position, t),
            rotation: lerp_vec3(self.rotation, other.rotation, t),
        }
    }
}
