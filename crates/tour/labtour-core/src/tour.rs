//! Coordination between the progression engine and the mentor.
//!
//! Navigation runs synchronously on the engine; the events it records are then
//! dispatched here. Module changes are forwarded to the character without
//! waiting for the reaction to play out. Step narration raised together with
//! the welcome is held back until the greeting has been spoken.

use crate::character::CharacterController;
use crate::config::TourConfig;
use crate::curriculum::CurriculumTree;
use crate::host::{AssetLoader, Narrator, PanelPresenter, Renderer};
use crate::inputs::TourCommand;
use crate::library::CharacterManifest;
use crate::outputs::{TourEvent, TourFrame};
use crate::progression::ProgressionEngine;
use crate::script::CharacterScript;

#[derive(Debug)]
pub struct Tour {
    progression: ProgressionEngine,
    character: CharacterController,
    narrate_steps: bool,
    /// Progression events not yet reported in a frame.
    pending: Vec<TourEvent>,
    frame: TourFrame,
}

impl Tour {
    pub fn new(
        tree: CurriculumTree,
        presenter: Box<dyn PanelPresenter>,
        narrator: Box<dyn Narrator>,
        script: CharacterScript,
        cfg: TourConfig,
    ) -> Self {
        let TourConfig {
            character,
            progression,
        } = cfg;
        let narrate_steps = progression.narrate_steps;
        Self {
            progression: ProgressionEngine::new(tree, presenter, progression),
            character: CharacterController::new(narrator, script, character),
            narrate_steps,
            pending: Vec::new(),
            frame: TourFrame::default(),
        }
    }

    pub fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut CharacterController {
        &mut self.character
    }

    pub fn load_character(&mut self, loader: &mut dyn AssetLoader, manifest: &CharacterManifest) {
        self.character.load(loader, manifest);
    }

    pub fn attach(&self, renderer: &mut dyn Renderer) {
        self.character.attach(renderer);
    }

    pub fn start(&mut self) {
        self.progression.start();
        self.dispatch();
    }

    pub fn advance_step(&mut self) {
        self.progression.advance_step();
        self.dispatch();
    }

    pub fn advance_module(&mut self) {
        self.progression.advance_module();
        self.dispatch();
    }

    pub fn retreat_step(&mut self) {
        self.progression.retreat_step();
        self.dispatch();
    }

    pub fn jump_to_first(&mut self) {
        self.progression.jump_to_first();
        self.dispatch();
    }

    pub fn activate_action(&mut self, index: usize) -> bool {
        let ok = self.progression.activate_action(index);
        self.dispatch();
        ok
    }

    /// Returns `false` only for an activation the panel didn't offer.
    pub fn apply(&mut self, cmd: TourCommand) -> bool {
        match cmd {
            TourCommand::Start => self.start(),
            TourCommand::Advance => self.advance_step(),
            TourCommand::Retreat => self.retreat_step(),
            TourCommand::AdvanceModule => self.advance_module(),
            TourCommand::Restart => self.jump_to_first(),
            TourCommand::Activate { index } => return self.activate_action(index),
        }
        true
    }

    fn dispatch(&mut self) {
        // Narration that arrives with the welcome waits for it to finish.
        let mut greeting_ms = None;
        for event in self.progression.drain_events() {
            match &event {
                TourEvent::Started => {
                    if self.character.greet() {
                        let cfg = self.character.config();
                        greeting_ms = Some(cfg.estimate_speech_ms(&cfg.welcome_text));
                    }
                }
                TourEvent::ModuleChanged { module } => {
                    self.character.react_to_module_change(*module);
                }
                TourEvent::StepShown { module, step } if self.narrate_steps => {
                    let narration = self
                        .progression
                        .tree()
                        .step(*module, *step)
                        .and_then(|s| s.narration.clone());
                    match (narration, greeting_ms) {
                        (Some(text), Some(ms)) => {
                            self.character.say_after(&text, ms);
                        }
                        (Some(text), None) => {
                            self.character.say(&text, None);
                        }
                        (None, _) => self.character.clear_queued_speech(),
                    }
                }
                _ => {}
            }
            self.pending.push(event);
        }
    }

    /// Advance the character one frame and report everything that happened
    /// since the previous frame.
    pub fn update(&mut self, dt: f32) -> &TourFrame {
        self.frame.clear();
        self.character.update(dt);

        self.frame.events.append(&mut self.pending);
        self.frame.events.extend(self.character.drain_events());
        self.frame.transform = self.character.transform();
        self.frame.moving = self.character.is_moving();
        self.frame.clips = self.character.poses();
        self.frame.progress = self.progression.snapshot();
        &self.frame
    }

    /// Hide the panel and release the character.
    pub fn shutdown(&mut self) {
        self.progression.hide();
        self.character.dispose();
    }
}
