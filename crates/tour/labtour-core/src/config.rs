//! Tour configuration.

use serde::{Deserialize, Serialize};

use crate::error::TourError;
use crate::interp::Easing;

/// Top-level configuration. Every field has a default, so partial JSON works.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub character: CharacterConfig,
    pub progression: ProgressionConfig,
}

impl TourConfig {
    pub fn from_json(s: &str) -> Result<Self, TourError> {
        serde_json::from_str(s).map_err(|e| TourError::parse("tour config", e))
    }
}

/// Mentor behaviour tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Crossfade length in seconds used when callers don't pass one.
    pub default_fade: f32,
    /// Resting animation; also the target of every return-to-idle.
    pub idle_animation: String,
    /// Played while a scripted movement is in flight, when loaded.
    pub walk_animation: Option<String>,
    /// Played with the welcome line on tour start, when loaded.
    pub greeting_animation: Option<String>,
    /// Talking clips in priority order.
    pub talk_animations: Vec<String>,
    /// Delay between a module change and the mentor's reaction.
    pub reaction_delay_ms: u32,
    /// Seconds a scripted movement takes.
    pub move_duration: f32,
    pub move_easing: Easing,
    /// Speech length estimate used when only the text is known.
    pub speech_ms_per_char: u32,
    pub min_speech_ms: u32,
    /// Spoken when the tour starts. Empty disables the greeting.
    pub welcome_text: String,
    /// Fixed seed for wander selection (tests, replays).
    pub wander_seed: Option<u64>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            default_fade: 0.3,
            idle_animation: "idle".into(),
            walk_animation: Some("walking".into()),
            greeting_animation: Some("waving".into()),
            talk_animations: vec!["talking_1".into(), "talking_2".into(), "talking".into()],
            reaction_delay_ms: 500,
            move_duration: 2.0,
            move_easing: Easing::EaseInOutQuad,
            speech_ms_per_char: 60,
            min_speech_ms: 1500,
            welcome_text: "Welcome to the lab! I'll be your guide.".into(),
            wander_seed: None,
        }
    }
}

impl CharacterConfig {
    /// Rough spoken duration for `text`, never below `min_speech_ms`.
    pub fn estimate_speech_ms(&self, text: &str) -> u32 {
        let chars = text.chars().count() as u32;
        chars
            .saturating_mul(self.speech_ms_per_char)
            .max(self.min_speech_ms)
    }
}

/// Panel wording and narration switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Label of the synthesized action on steps that declare none.
    pub advance_label: String,
    pub completion_title: String,
    pub completion_content: serde_json::Value,
    pub restart_label: String,
    /// Speak `Step::narration` when a step is displayed.
    pub narrate_steps: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            advance_label: "Next".into(),
            completion_title: "Tour complete".into(),
            completion_content: serde_json::Value::String(
                "You have finished every module of the lab tour.".into(),
            ),
            restart_label: "Start over".into(),
            narrate_steps: true,
        }
    }
}
