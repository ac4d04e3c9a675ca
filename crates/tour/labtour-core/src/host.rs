//! Collaborator contracts the core consumes.
//!
//! Adapters (Bevy/WASM/tests) implement these and hand them to the
//! [`ProgressionEngine`](crate::progression::ProgressionEngine) and
//! [`CharacterController`](crate::character::CharacterController) at
//! construction. The core never looks inside scene, camera or model handles.

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::ids::{ClipHandle, NodeHandle};

/// Opaque scene handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SceneHandle(pub u64);

/// Opaque camera handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CameraHandle(pub u64);

/// The character's visual representation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ModelHandle {
    /// Model loaded by the asset loader.
    Loaded(NodeHandle),
    /// Geometric stand-in used when the model failed to load.
    Placeholder,
}

impl ModelHandle {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ModelHandle::Placeholder)
    }
}

/// A clip as returned by the loader.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadedClip {
    pub handle: ClipHandle,
    /// Clip length in seconds.
    pub duration: f32,
}

/// Severity for panel notifications.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One activatable entry on a panel. `index` is what the host passes back to
/// `activate_action` when the user picks it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelAction {
    pub index: usize,
    pub label: String,
}

pub trait Renderer {
    fn scene(&self) -> SceneHandle;
    fn camera(&self) -> CameraHandle;
    fn attach_node(&mut self, scene: SceneHandle, model: &ModelHandle);
    fn remove_node(&mut self, scene: SceneHandle, model: &ModelHandle);
}

pub trait AssetLoader {
    fn load_animation_clip(&mut self, path: &str) -> Result<LoadedClip, AssetError>;
    fn load_character_model(&mut self, path: &str) -> Result<ModelHandle, AssetError>;
}

/// Instructional panel surface. `content` is passed through untouched.
pub trait PanelPresenter {
    fn show(&mut self, title: &str, content: &serde_json::Value, actions: &[PanelAction]);
    fn hide(&mut self);
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Speech output. Fire-and-forget: no completion signal comes back.
pub trait Narrator {
    fn speak(&mut self, text: &str);
}

/// Narrator that only writes to the log. Handy for headless hosts.
#[derive(Debug, Default)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn speak(&mut self, text: &str) {
        log::info!("narrator: {text}");
    }
}

/// Presenter that only writes to the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl PanelPresenter for LogPresenter {
    fn show(&mut self, title: &str, _content: &serde_json::Value, actions: &[PanelAction]) {
        let labels: Vec<&str> = actions.iter().map(|a| a.label.as_str()).collect();
        log::info!("panel: {title} {labels:?}");
    }

    fn hide(&mut self) {
        log::info!("panel hidden");
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("notice: {message}"),
            Severity::Warning => log::warn!("notice: {message}"),
            Severity::Error => log::error!("notice: {message}"),
        }
    }
}
