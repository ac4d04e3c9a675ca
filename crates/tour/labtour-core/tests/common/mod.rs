#![allow(dead_code)]
//! Recording collaborators shared by the integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use labtour_core::{
    AnimationLibrary, AssetError, AssetLoader, CameraHandle, CharacterConfig,
    CharacterController, CharacterManifest, CharacterScript, ClipEntry, ClipHandle, LoadedClip,
    LoopMode, ModelHandle, Narrator, NodeHandle, PanelAction, PanelPresenter, Renderer,
    SceneHandle, Severity,
};

#[derive(Clone, Debug, PartialEq)]
pub enum PanelCall {
    Show {
        title: String,
        content: serde_json::Value,
        actions: Vec<String>,
    },
    Hide,
    Notify(String, Severity),
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub calls: Rc<RefCell<Vec<PanelCall>>>,
}

impl RecordingPresenter {
    pub fn last_title(&self) -> Option<String> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            PanelCall::Show { title, .. } => Some(title.clone()),
            _ => None,
        })
    }

    pub fn last_actions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find_map(|c| match c {
                PanelCall::Show { actions, .. } => Some(actions.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn show_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, PanelCall::Show { .. }))
            .count()
    }

    pub fn notices(&self) -> Vec<(String, Severity)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PanelCall::Notify(m, s) => Some((m.clone(), *s)),
                _ => None,
            })
            .collect()
    }
}

impl PanelPresenter for RecordingPresenter {
    fn show(&mut self, title: &str, content: &serde_json::Value, actions: &[PanelAction]) {
        self.calls.borrow_mut().push(PanelCall::Show {
            title: title.to_string(),
            content: content.clone(),
            actions: actions.iter().map(|a| a.label.clone()).collect(),
        });
    }

    fn hide(&mut self) {
        self.calls.borrow_mut().push(PanelCall::Hide);
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.calls
            .borrow_mut()
            .push(PanelCall::Notify(message.to_string(), severity));
    }
}

#[derive(Clone, Default)]
pub struct RecordingNarrator {
    pub lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingNarrator {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Narrator for RecordingNarrator {
    fn speak(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}

/// Loader that fails for the listed paths and hands out 1-second clips otherwise.
#[derive(Default)]
pub struct FakeLoader {
    pub missing: Vec<String>,
    next: u64,
}

impl FakeLoader {
    pub fn failing(paths: &[&str]) -> Self {
        Self {
            missing: paths.iter().map(|p| p.to_string()).collect(),
            next: 0,
        }
    }
}

impl AssetLoader for FakeLoader {
    fn load_animation_clip(&mut self, path: &str) -> Result<LoadedClip, AssetError> {
        if self.missing.iter().any(|m| m == path) {
            return Err(AssetError::NotFound {
                path: path.to_string(),
            });
        }
        self.next += 1;
        Ok(LoadedClip {
            handle: ClipHandle(self.next),
            duration: 1.0,
        })
    }

    fn load_character_model(&mut self, path: &str) -> Result<ModelHandle, AssetError> {
        if self.missing.iter().any(|m| m == path) {
            return Err(AssetError::Decode {
                path: path.to_string(),
                reason: "corrupt".into(),
            });
        }
        Ok(ModelHandle::Loaded(NodeHandle(99)))
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub attached: Vec<ModelHandle>,
}

impl Renderer for RecordingRenderer {
    fn scene(&self) -> SceneHandle {
        SceneHandle(1)
    }

    fn camera(&self) -> CameraHandle {
        CameraHandle(2)
    }

    fn attach_node(&mut self, _scene: SceneHandle, model: &ModelHandle) {
        self.attached.push(*model);
    }

    fn remove_node(&mut self, _scene: SceneHandle, model: &ModelHandle) {
        self.attached.retain(|m| m != model);
    }
}

pub fn library(names: &[&str]) -> AnimationLibrary {
    let mut lib = AnimationLibrary::new();
    for (i, name) in names.iter().enumerate() {
        lib.insert(
            *name,
            ClipEntry {
                handle: ClipHandle(i as u64),
                duration: 1.0,
                mode: LoopMode::infer(name),
            },
        );
    }
    lib
}

pub fn mentor_script() -> CharacterScript {
    let json = labtour_test_fixtures::characters::script_json("mentor").unwrap();
    CharacterScript::from_json(&json).unwrap()
}

pub fn mentor_manifest() -> CharacterManifest {
    let json = labtour_test_fixtures::characters::assets_json("mentor")
        .unwrap()
        .expect("mentor fixture lists an assets manifest");
    CharacterManifest::from_json(&json).unwrap()
}

pub fn test_config() -> CharacterConfig {
    CharacterConfig {
        wander_seed: Some(11),
        ..CharacterConfig::default()
    }
}

/// A character that is already Ready with the given clips.
pub fn ready_character(
    narrator: &RecordingNarrator,
    clips: &[&str],
    cfg: CharacterConfig,
) -> CharacterController {
    let mut c = CharacterController::new(Box::new(narrator.clone()), mentor_script(), cfg);
    c.begin_loading();
    c.finish_loading(ModelHandle::Loaded(NodeHandle(1)), library(clips));
    c
}

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}
