//! Lab tour core (engine-agnostic)
//!
//! A guided walkthrough controller: a module/step progression engine that
//! drives instructional panels, coupled to a mentor character whose clip
//! crossfades and eased movement advance once per frame. Rendering, asset
//! decoding, panel UI and speech are collaborators behind the traits in
//! [`host`]; adapters (Bevy/WASM) implement them.

pub mod blender;
pub mod character;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod host;
pub mod ids;
pub mod inputs;
pub mod interp;
pub mod library;
pub mod movement;
pub mod outputs;
pub mod progression;
pub mod script;
pub mod timers;
pub mod tour;
pub mod transform;

// Re-exports for consumers (adapters)
pub use blender::{AnimationBlender, ClipPose, DEFAULT_FADE};
pub use character::{CharacterController, CharacterStatus};
pub use config::{CharacterConfig, ProgressionConfig, TourConfig};
pub use curriculum::{
    Action, ActionCallback, ActionContext, ActionHandler, CurriculumTree, HandlerRegistry,
    Module, Navigation, Step,
};
pub use error::{AssetError, TourError};
pub use host::{
    AssetLoader, CameraHandle, LoadedClip, LogNarrator, LogPresenter, ModelHandle, Narrator,
    PanelAction, PanelPresenter, Renderer, SceneHandle, Severity,
};
pub use ids::{ClipHandle, NodeHandle, TimerId};
pub use inputs::TourCommand;
pub use interp::Easing;
pub use library::{AnimationLibrary, CharacterManifest, ClipEntry, ClipSpec, LoopMode};
pub use movement::{MovementController, MovementState};
pub use outputs::{ProgressSnapshot, TourEvent, TourFrame};
pub use progression::{ProgressionEngine, ProgressionState};
pub use script::{CharacterScript, Reaction, ScriptedReaction};
pub use timers::Timers;
pub use tour::Tour;
pub use transform::Transform;
