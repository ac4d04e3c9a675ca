//! Easing registry and helpers.
//!
//! Each named easing maps normalized progress to eased progress. Input is
//! clamped to [0,1] and every curve maps 0 to 0 and 1 to 1.

pub mod functions;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TourError;

/// Named, stateless easing curves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
    ];

    /// Apply the curve to `t`. Input is clamped into [0,1] first.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => functions::ease_in_quad(t),
            Easing::EaseOutQuad => functions::ease_out_quad(t),
            Easing::EaseInOutQuad => functions::ease_in_out_quad(t),
            Easing::EaseInCubic => functions::ease_in_cubic(t),
            Easing::EaseOutCubic => functions::ease_out_cubic(t),
            Easing::EaseInOutCubic => functions::ease_in_out_cubic(t),
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TourError::UnknownEasing { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for e in Easing::ALL {
            assert_eq!(e.name().parse::<Easing>().unwrap(), e);
        }
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn apply_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseInQuad.apply(2.0), 1.0);
    }

    #[test]
    fn every_curve_stays_in_unit_range() {
        for e in Easing::ALL {
            assert_eq!(e.apply(-0.5), 0.0, "{e}");
            assert_eq!(e.apply(0.0), 0.0, "{e}");
            assert_eq!(e.apply(1.0), 1.0, "{e}");
            assert_eq!(e.apply(1.5), 1.0, "{e}");
            for i in 0..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!((0.0..=1.0).contains(&v), "{e} at {i}: {v}");
            }
        }
    }

    #[test]
    fn serde_uses_camel_case_names() {
        let s = serde_json::to_string(&Easing::EaseInOutCubic).unwrap();
        assert_eq!(s, "\"easeInOutCubic\"");
    }
}
