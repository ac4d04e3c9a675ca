//! Named clip storage and the asset manifest it is built from.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::TourError;
use crate::host::LoadedClip;
use crate::ids::ClipHandle;

/// Playback policy fixed when the clip is loaded.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Play once and hold the final pose.
    Once,
    Loop,
}

impl LoopMode {
    /// Continuous actions loop, gestures play once.
    pub fn infer(name: &str) -> Self {
        const CONTINUOUS: [&str; 4] = ["idle", "talk", "walk", "hold"];
        let lower = name.to_ascii_lowercase();
        if CONTINUOUS.iter().any(|k| lower.contains(k)) {
            LoopMode::Loop
        } else {
            LoopMode::Once
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipEntry {
    pub handle: ClipHandle,
    /// Seconds.
    pub duration: f32,
    pub mode: LoopMode,
}

/// Name → clip lookup. Read-only once handed to the blender.
#[derive(Clone, Debug, Default)]
pub struct AnimationLibrary {
    clips: HashMap<String, ClipEntry>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ClipEntry) {
        self.clips.insert(name.into(), entry);
    }

    /// Register a loaded clip, taking the explicit mode or inferring one from the name.
    pub fn insert_loaded(&mut self, name: &str, clip: LoadedClip, mode: Option<LoopMode>) {
        let mode = mode.unwrap_or_else(|| LoopMode::infer(name));
        self.insert(
            name,
            ClipEntry {
                handle: clip.handle,
                duration: clip.duration,
                mode,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ClipEntry> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Clip names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Where the character's assets live.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterManifest {
    pub model: String,
    #[serde(default)]
    pub clips: Vec<ClipSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub name: String,
    pub path: String,
    /// Explicit policy; inferred from the name when absent.
    #[serde(default)]
    pub looping: Option<bool>,
}

impl ClipSpec {
    pub fn mode(&self) -> Option<LoopMode> {
        self.looping
            .map(|l| if l { LoopMode::Loop } else { LoopMode::Once })
    }
}

impl CharacterManifest {
    pub fn from_json(s: &str) -> Result<Self, TourError> {
        serde_json::from_str(s).map_err(|e| TourError::parse("character manifest", e))
    }
}
