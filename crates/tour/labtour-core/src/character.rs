//! The mentor: one entry point for "walk there, play that, say this".
//!
//! Status runs `Uninitialized → Loading → Ready`. Requests that arrive before
//! the character is ready are logged and dropped, not queued; a missed cue in
//! a guided tour is harmless.
//!
//! Per frame, [`CharacterController::update`] advances the blender first, then
//! the movement (whose arrival may request a new clip), then due timers.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::blender::{AnimationBlender, ClipPose};
use crate::config::CharacterConfig;
use crate::error::AssetError;
use crate::host::{AssetLoader, ModelHandle, Narrator, Renderer};
use crate::ids::TimerId;
use crate::interp::Easing;
use crate::library::{AnimationLibrary, CharacterManifest};
use crate::movement::{MovementController, MovementState};
use crate::outputs::TourEvent;
use crate::script::{CharacterScript, Reaction};
use crate::timers::Timers;
use crate::transform::Transform;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterStatus {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
enum Cue {
    React { module: usize },
    Say { text: String },
    ReturnToIdle,
}

/// What to do once a movement lands.
#[derive(Clone, Debug, PartialEq)]
struct Arrival {
    point: String,
    narration: Option<String>,
    animation: Option<String>,
}

pub struct CharacterController {
    cfg: CharacterConfig,
    script: CharacterScript,
    status: CharacterStatus,
    model: Option<ModelHandle>,
    blender: AnimationBlender,
    movement: MovementController<Arrival>,
    narrator: Box<dyn Narrator>,
    timers: Timers<Cue>,
    idle_timer: Option<TimerId>,
    rng: StdRng,
    events: Vec<TourEvent>,
}

impl std::fmt::Debug for CharacterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterController")
            .field("status", &self.status)
            .field("model", &self.model)
            .field("active", &self.blender.active_name())
            .field("movement", &self.movement.state())
            .finish()
    }
}

impl CharacterController {
    pub fn new(narrator: Box<dyn Narrator>, script: CharacterScript, cfg: CharacterConfig) -> Self {
        let rng = match cfg.wander_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            movement: MovementController::new(script.home),
            script,
            cfg,
            status: CharacterStatus::Uninitialized,
            model: None,
            blender: AnimationBlender::default(),
            narrator,
            timers: Timers::new(),
            idle_timer: None,
            rng,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> CharacterStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == CharacterStatus::Ready
    }

    pub fn model(&self) -> Option<ModelHandle> {
        self.model
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.cfg
    }

    pub fn transform(&self) -> Transform {
        self.movement.transform()
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_moving()
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement.state()
    }

    pub fn active_animation(&self) -> Option<&str> {
        self.blender.active_name()
    }

    pub fn blender(&self) -> &AnimationBlender {
        &self.blender
    }

    pub fn poses(&self) -> Vec<ClipPose> {
        self.blender.poses()
    }

    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.events)
    }

    fn ready_or_log(&self, op: &str) -> bool {
        if self.status != CharacterStatus::Ready {
            log::warn!("{op} ignored: character is {:?}", self.status);
            return false;
        }
        true
    }

    pub fn begin_loading(&mut self) {
        if self.status == CharacterStatus::Ready {
            self.dispose();
        }
        self.status = CharacterStatus::Loading;
    }

    /// Install loaded assets and start idling.
    pub fn finish_loading(&mut self, model: ModelHandle, library: AnimationLibrary) {
        if library.is_empty() {
            log::warn!("character loaded without any animation clips");
        }
        log::info!(
            "character ready ({} clips{})",
            library.len(),
            if model.is_placeholder() {
                ", placeholder model"
            } else {
                ""
            }
        );
        self.blender = AnimationBlender::new(library);
        self.movement = MovementController::new(self.script.home);
        self.model = Some(model);
        self.status = CharacterStatus::Ready;
        self.events.push(TourEvent::CharacterReady {
            placeholder: model.is_placeholder(),
        });
        let idle = self.cfg.idle_animation.clone();
        self.play_tracked(&idle);
    }

    /// Load model and clips through `loader`. A failed model becomes a
    /// placeholder; failed clips are skipped.
    pub fn load(&mut self, loader: &mut dyn AssetLoader, manifest: &CharacterManifest) {
        self.begin_loading();
        let model = loader
            .load_character_model(&manifest.model)
            .unwrap_or_else(|e: AssetError| {
                log::warn!("model {:?} failed to load ({e}); using placeholder", manifest.model);
                ModelHandle::Placeholder
            });

        let mut library = AnimationLibrary::new();
        for spec in &manifest.clips {
            match loader.load_animation_clip(&spec.path) {
                Ok(clip) => library.insert_loaded(&spec.name, clip, spec.mode()),
                Err(e) => log::warn!("skipping clip {:?}: {e}", spec.name),
            }
        }
        self.finish_loading(model, library);
    }

    pub fn attach(&self, renderer: &mut dyn Renderer) {
        match self.model.as_ref() {
            Some(model) => {
                let scene = renderer.scene();
                renderer.attach_node(scene, model);
            }
            None => log::warn!("attach ignored: no model loaded"),
        }
    }

    pub fn detach(&self, renderer: &mut dyn Renderer) {
        if let Some(model) = self.model.as_ref() {
            let scene = renderer.scene();
            renderer.remove_node(scene, model);
        }
    }

    /// Halt everything and drop loaded state.
    pub fn dispose(&mut self) {
        self.blender.stop_all();
        self.movement.cancel();
        self.timers.clear();
        self.idle_timer = None;
        self.model = None;
        self.status = CharacterStatus::Uninitialized;
    }

    fn play_tracked(&mut self, name: &str) -> bool {
        let changed = self.blender.active_name() != Some(name);
        let ok = self
            .blender
            .play_animation(name, self.cfg.default_fade, true);
        if ok && changed {
            self.events.push(TourEvent::AnimationChanged {
                name: name.to_string(),
            });
        }
        ok
    }

    fn play_idle(&mut self) {
        let idle = self.cfg.idle_animation.clone();
        self.play_tracked(&idle);
    }

    pub fn play_animation(&mut self, name: &str) -> bool {
        if !self.ready_or_log("play_animation") {
            return false;
        }
        self.play_tracked(name)
    }

    pub fn move_to(&mut self, target: Transform, duration: f32, easing: Easing) -> bool {
        if !self.ready_or_log("move_to") {
            return false;
        }
        let arrival = Arrival {
            point: "custom".into(),
            narration: None,
            animation: None,
        };
        self.begin_move(target, duration, easing, arrival)
    }

    fn begin_move(
        &mut self,
        target: Transform,
        duration: f32,
        easing: Easing,
        arrival: Arrival,
    ) -> bool {
        let point = arrival.point.clone();
        if !self.movement.move_to(target, duration, easing, arrival) {
            return false;
        }
        self.events.push(TourEvent::MovementStarted { point });
        if let Some(walk) = self.cfg.walk_animation.clone() {
            if self.blender.library().contains(&walk) {
                self.cancel_idle_return();
                self.play_tracked(&walk);
            }
        }
        true
    }

    /// Stop mid-move (user interrupt). No arrival behaviour runs.
    pub fn cancel_movement(&mut self) {
        if !self.movement.is_moving() {
            return;
        }
        self.movement.cancel();
        self.play_idle();
    }

    pub fn teleport(&mut self, transform: Transform) -> bool {
        self.movement.teleport(transform)
    }

    /// Queue the reaction for `module` after the configured delay. A newer
    /// module change replaces a reaction that hasn't started yet.
    pub fn react_to_module_change(&mut self, module: usize) {
        if !self.ready_or_log("react_to_module_change") {
            return;
        }
        self.timers
            .cancel_where(|c| matches!(c, Cue::React { .. }));
        self.timers
            .schedule(self.cfg.reaction_delay_ms, Cue::React { module });
    }

    fn run_reaction(&mut self, module: usize) {
        // A skipped reaction must not consume a wander draw.
        if self.movement.is_moving() {
            log::warn!("reaction for module {module} skipped: still moving");
            return;
        }
        let Reaction {
            point,
            target,
            narration,
            animation,
        } = self.script.reaction_for(module, &mut self.rng);
        let arrival = Arrival {
            point,
            narration: Some(narration).filter(|n| !n.is_empty()),
            animation,
        };
        self.begin_move(target, self.cfg.move_duration, self.cfg.move_easing, arrival);
    }

    fn on_arrival(&mut self, arrival: Arrival) {
        self.events.push(TourEvent::MovementFinished {
            point: arrival.point,
        });

        let played = match arrival.animation.as_deref() {
            Some(name) => self.play_tracked(name).then(|| name.to_string()),
            None => None,
        };
        if played.is_none() {
            self.play_idle();
        }

        if let Some(text) = arrival.narration {
            self.narrate(&text);
            let ms = self.cfg.estimate_speech_ms(&text);
            self.schedule_idle_return(ms);
        } else if let Some(name) = played.filter(|n| *n != self.cfg.idle_animation) {
            let secs = self
                .blender
                .library()
                .get(&name)
                .map(|c| c.duration)
                .unwrap_or(0.0);
            self.schedule_idle_return((secs * 1000.0) as u32);
        }
    }

    fn narrate(&mut self, text: &str) {
        self.narrator.speak(text);
        self.events.push(TourEvent::Narration {
            text: text.to_string(),
        });
    }

    fn cancel_idle_return(&mut self) {
        if let Some(id) = self.idle_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn schedule_idle_return(&mut self, ms: u32) {
        self.cancel_idle_return();
        self.idle_timer = Some(self.timers.schedule(ms, Cue::ReturnToIdle));
    }

    /// Talk for roughly `duration_ms`, then go back to idle. The duration is
    /// the caller's estimate; the narrator reports no completion.
    pub fn speak(&mut self, text: &str, duration_ms: u32, preferred: Option<&str>) -> bool {
        if !self.ready_or_log("speak") {
            return false;
        }
        let library = self.blender.library();
        let clip = preferred
            .filter(|p| library.contains(p))
            .map(str::to_string)
            .or_else(|| {
                self.cfg
                    .talk_animations
                    .iter()
                    .find(|name| library.contains(name))
                    .cloned()
            });
        match clip {
            Some(name) => {
                self.play_tracked(&name);
            }
            None => log::debug!("no talking clip loaded; speaking without one"),
        }
        self.clear_queued_speech();
        self.narrate(text);
        self.schedule_idle_return(duration_ms);
        true
    }

    /// Speak with a duration estimated from the text length.
    pub fn say(&mut self, text: &str, preferred: Option<&str>) -> bool {
        let ms = self.cfg.estimate_speech_ms(text);
        self.speak(text, ms, preferred)
    }

    /// Say `text` once `delay_ms` has passed. Any speech started before then,
    /// or a later `say_after`, drops the waiting line.
    pub fn say_after(&mut self, text: &str, delay_ms: u32) -> bool {
        if !self.ready_or_log("say_after") {
            return false;
        }
        self.clear_queued_speech();
        self.timers.schedule(
            delay_ms,
            Cue::Say {
                text: text.to_string(),
            },
        );
        true
    }

    /// Drop a line waiting on `say_after`.
    pub fn clear_queued_speech(&mut self) {
        self.timers.cancel_where(|c| matches!(c, Cue::Say { .. }));
    }

    /// Welcome line with the greeting clip, if configured.
    pub fn greet(&mut self) -> bool {
        if self.cfg.welcome_text.is_empty() {
            return false;
        }
        let text = self.cfg.welcome_text.clone();
        let greeting = self.cfg.greeting_animation.clone();
        self.say(&text, greeting.as_deref())
    }

    /// Advance one frame. Safe to call at any status; does nothing until ready.
    pub fn update(&mut self, dt: f32) {
        if self.status != CharacterStatus::Ready {
            return;
        }
        self.blender.advance(dt);
        if let Some(arrival) = self.movement.tick(dt) {
            self.on_arrival(arrival);
        }
        for cue in self.timers.advance(dt) {
            match cue {
                Cue::React { module } => self.run_reaction(module),
                Cue::Say { text } => {
                    self.say(&text, None);
                }
                Cue::ReturnToIdle => {
                    self.idle_timer = None;
                    if !self.movement.is_moving() {
                        self.play_idle();
                    }
                }
            }
        }
    }
}
