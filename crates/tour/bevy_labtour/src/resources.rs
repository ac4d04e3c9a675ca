use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use labtour_core::{
    CharacterScript, CurriculumTree, LogNarrator, Narrator, PanelAction, PanelPresenter,
    Severity, Tour, TourConfig, TourFrame,
};

/// The tour itself. Inserted with `insert_non_send_resource`: callbacks in
/// the curriculum are not thread-safe, so systems touching it run on the
/// main thread.
pub struct TourResource {
    pub tour: Tour,
    panel: Rc<RefCell<PanelMirror>>,
}

impl TourResource {
    /// Tour whose narration only goes to the log (and to frame events).
    pub fn new(tree: CurriculumTree, script: CharacterScript, cfg: TourConfig) -> Self {
        Self::with_narrator(tree, script, cfg, Box::new(LogNarrator))
    }

    pub fn with_narrator(
        tree: CurriculumTree,
        script: CharacterScript,
        cfg: TourConfig,
        narrator: Box<dyn Narrator>,
    ) -> Self {
        let panel = Rc::new(RefCell::new(PanelMirror::default()));
        let presenter = MirrorPresenter(panel.clone());
        Self {
            tour: Tour::new(tree, Box::new(presenter), narrator, script, cfg),
            panel,
        }
    }

    /// Panel state if it changed since the last call. Notices are handed out once.
    pub(crate) fn take_panel(&self) -> Option<PanelView> {
        let mut mirror = self.panel.borrow_mut();
        if !mirror.dirty {
            return None;
        }
        let view = mirror.view.clone();
        mirror.view.notices.clear();
        mirror.dirty = false;
        Some(view)
    }
}

/// What UI systems need to draw the instructional panel.
#[derive(Resource, Default, Clone, Debug, PartialEq)]
pub struct PanelView {
    pub visible: bool,
    pub title: String,
    pub content: serde_json::Value,
    pub actions: Vec<PanelAction>,
    /// Notices raised since the previous sync.
    pub notices: Vec<(String, Severity)>,
}

#[derive(Default)]
struct PanelMirror {
    view: PanelView,
    dirty: bool,
}

struct MirrorPresenter(Rc<RefCell<PanelMirror>>);

impl PanelPresenter for MirrorPresenter {
    fn show(&mut self, title: &str, content: &serde_json::Value, actions: &[PanelAction]) {
        let mut m = self.0.borrow_mut();
        m.view.visible = true;
        m.view.title = title.to_string();
        m.view.content = content.clone();
        m.view.actions = actions.to_vec();
        m.dirty = true;
    }

    fn hide(&mut self) {
        let mut m = self.0.borrow_mut();
        m.view.visible = false;
        m.view.actions.clear();
        m.dirty = true;
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        let mut m = self.0.borrow_mut();
        m.view.notices.push((message.to_string(), severity));
        m.dirty = true;
    }
}

/// Last frame produced by the core, for systems that run after the tick.
#[derive(Resource, Default, Clone, Debug)]
pub struct LastTourFrame(pub TourFrame);
