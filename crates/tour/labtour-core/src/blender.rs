//! Crossfading between named clips.
//!
//! At steady state exactly one clip plays at full weight. During a crossfade
//! the outgoing and incoming clips overlap; anything older is cut when a new
//! crossfade begins, so at most two clips ever contribute at once.

use serde::{Deserialize, Serialize};

use crate::ids::ClipHandle;
use crate::interp::functions::lerp_f32;
use crate::library::{AnimationLibrary, LoopMode};

pub const DEFAULT_FADE: f32 = 0.3;

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Runtime state of one clip on the character.
#[derive(Clone, Debug)]
pub struct ClipState {
    pub name: String,
    pub handle: ClipHandle,
    pub mode: LoopMode,
    pub duration: f32,
    /// Local clip time in seconds.
    pub time: f32,
    pub weight: f32,
    pub enabled: bool,
    fade: Option<Fade>,
}

impl ClipState {
    fn fade_to(&mut self, target: f32, duration: f32) {
        if duration <= 0.0 || !duration.is_finite() {
            self.weight = target;
            self.fade = None;
            if target <= 0.0 {
                self.enabled = false;
            }
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to: target,
            duration,
            elapsed: 0.0,
        });
    }

    fn stop(&mut self) {
        self.enabled = false;
        self.weight = 0.0;
        self.fade = None;
    }

    fn advance(&mut self, dt: f32) {
        let t = self.time + dt;
        self.time = match self.mode {
            LoopMode::Loop => fmod(t, self.duration),
            LoopMode::Once => t.clamp(0.0, self.duration.max(0.0)),
        };

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            let u = (fade.elapsed / fade.duration).min(1.0);
            self.weight = lerp_f32(fade.from, fade.to, u);
            if u >= 1.0 {
                self.weight = fade.to;
                let faded_out = fade.to <= 0.0;
                self.fade = None;
                if faded_out {
                    self.enabled = false;
                }
            }
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }
}

/// What a renderer needs to pose the character for one clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipPose {
    pub name: String,
    pub handle: ClipHandle,
    pub time: f32,
    pub weight: f32,
}

#[derive(Debug, Default)]
pub struct AnimationBlender {
    library: AnimationLibrary,
    clips: Vec<ClipState>,
    active: Option<String>,
}

impl AnimationBlender {
    pub fn new(library: AnimationLibrary) -> Self {
        Self {
            library,
            clips: Vec::new(),
            active: None,
        }
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// `play_animation(name, DEFAULT_FADE, true)`.
    pub fn play(&mut self, name: &str) -> bool {
        self.play_animation(name, DEFAULT_FADE, true)
    }

    /// Crossfade to `name`. Returns `false` if the clip is unknown; requesting
    /// the active clip again is a successful no-op.
    pub fn play_animation(&mut self, name: &str, fade: f32, reset_time: bool) -> bool {
        let Some(entry) = self.library.get(name).copied() else {
            log::warn!("animation {name:?} is not loaded");
            return false;
        };
        if self.active.as_deref() == Some(name) {
            return true;
        }

        let previous = self.active.take();
        for clip in self.clips.iter_mut() {
            let keep = clip.name == name || previous.as_deref() == Some(clip.name.as_str());
            if clip.enabled && !keep {
                clip.stop();
            }
        }
        if let Some(prev) = previous.as_deref() {
            if let Some(clip) = self.clips.iter_mut().find(|c| c.name == prev) {
                clip.fade_to(0.0, fade);
            }
        }

        let idx = match self.clips.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                self.clips.push(ClipState {
                    name: name.to_string(),
                    handle: entry.handle,
                    mode: entry.mode,
                    duration: entry.duration,
                    time: 0.0,
                    weight: 0.0,
                    enabled: false,
                    fade: None,
                });
                self.clips.len() - 1
            }
        };
        let clip = &mut self.clips[idx];
        if reset_time {
            clip.time = 0.0;
        }
        clip.enabled = true;
        clip.fade_to(1.0, fade);

        log::debug!("animation {:?} -> {name:?}", previous);
        self.active = Some(name.to_string());
        true
    }

    /// Halt every clip regardless of weight and forget the active one.
    pub fn stop_all(&mut self) {
        for clip in self.clips.iter_mut() {
            clip.stop();
        }
        self.active = None;
    }

    /// Advance clip times and fade weights by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for clip in self.clips.iter_mut().filter(|c| c.enabled) {
            clip.advance(dt);
        }
    }

    pub fn clip(&self, name: &str) -> Option<&ClipState> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Current weight of `name`, 0 when it isn't playing.
    pub fn weight_of(&self, name: &str) -> f32 {
        self.clip(name)
            .filter(|c| c.enabled)
            .map(|c| c.weight)
            .unwrap_or(0.0)
    }

    pub fn playing_count(&self) -> usize {
        self.clips.iter().filter(|c| c.enabled).count()
    }

    pub fn poses(&self) -> Vec<ClipPose> {
        self.clips
            .iter()
            .filter(|c| c.enabled)
            .map(|c| ClipPose {
                name: c.name.clone(),
                handle: c.handle,
                time: c.time,
                weight: c.weight,
            })
            .collect()
    }
}
