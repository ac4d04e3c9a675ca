//! Per-module mentor reactions and the wander fallback.

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TourError;
use crate::transform::Transform;

/// Scripted behaviour for one module: walk to `point`, then say `narration`
/// while playing `animation`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedReaction {
    pub module: usize,
    pub point: String,
    pub narration: String,
    #[serde(default)]
    pub animation: Option<String>,
}

/// A reaction resolved against the script's named points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub point: String,
    pub target: Transform,
    pub narration: String,
    pub animation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterScript {
    /// Where the character stands after loading.
    pub home: Transform,
    pub points: IndexMap<String, Transform>,
    pub reactions: Vec<ScriptedReaction>,
    /// Point names the wander fallback picks from.
    pub wander: Vec<String>,
    pub wander_narrations: Vec<String>,
    pub wander_animation: Option<String>,
}

impl Default for CharacterScript {
    fn default() -> Self {
        let mut points = IndexMap::new();
        points.insert("home".to_string(), Transform::IDENTITY);
        Self {
            home: Transform::IDENTITY,
            points,
            reactions: Vec::new(),
            wander: vec!["home".into()],
            wander_narrations: vec!["Let's keep exploring the lab.".into()],
            wander_animation: None,
        }
    }
}

impl CharacterScript {
    pub fn from_json(s: &str) -> Result<Self, TourError> {
        let script: CharacterScript =
            serde_json::from_str(s).map_err(|e| TourError::parse("character script", e))?;
        script.validate()?;
        Ok(script)
    }

    /// Every referenced point must exist and the wander set must be usable.
    pub fn validate(&self) -> Result<(), TourError> {
        for r in &self.reactions {
            if !self.points.contains_key(&r.point) {
                return Err(TourError::UnknownPoint {
                    module: r.module,
                    point: r.point.clone(),
                });
            }
        }
        if self.wander.is_empty() {
            return Err(TourError::NoWanderPoints);
        }
        if let Some(missing) = self.wander.iter().find(|p| !self.points.contains_key(*p)) {
            return Err(TourError::UnknownPoint {
                module: usize::MAX,
                point: missing.clone(),
            });
        }
        Ok(())
    }

    pub fn point(&self, name: &str) -> Option<Transform> {
        self.points.get(name).copied()
    }

    pub fn scripted(&self, module: usize) -> Option<Reaction> {
        let r = self.reactions.iter().find(|r| r.module == module)?;
        let target = self.point(&r.point)?;
        Some(Reaction {
            point: r.point.clone(),
            target,
            narration: r.narration.clone(),
            animation: r.animation.clone(),
        })
    }

    /// Random point from the wander set with a generic line.
    pub fn wander<R: Rng + ?Sized>(&self, rng: &mut R) -> Reaction {
        let (point, target) = self
            .wander
            .choose(rng)
            .and_then(|name| self.point(name).map(|t| (name.clone(), t)))
            .unwrap_or_else(|| ("home".to_string(), self.home));
        let narration = self
            .wander_narrations
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        Reaction {
            point,
            target,
            narration,
            animation: self.wander_animation.clone(),
        }
    }

    /// Scripted reaction for `module`, or a wander reaction when none exists.
    pub fn reaction_for<R: Rng + ?Sized>(&self, module: usize, rng: &mut R) -> Reaction {
        self.scripted(module).unwrap_or_else(|| {
            log::debug!("no scripted reaction for module {module}; wandering");
            self.wander(rng)
        })
    }
}
