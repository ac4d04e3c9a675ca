//! Module/step state machine.
//!
//! The engine owns the curriculum and the `(module, step)` cursor, renders the
//! current step through the [`PanelPresenter`], and records [`TourEvent`]s for
//! whoever coordinates the character. Nothing in here fails hard: missing data
//! is logged and the operation becomes a no-op, and a failing custom action
//! force-advances so the tour never stalls on a broken step.

use serde::{Deserialize, Serialize};

use crate::config::ProgressionConfig;
use crate::curriculum::{Action, ActionContext, ActionHandler, CurriculumTree, Navigation, Step};
use crate::host::{PanelAction, PanelPresenter, Severity};
use crate::outputs::{ProgressSnapshot, TourEvent};

/// Cursor into the curriculum. `module == modules.len()` is the terminal
/// completed state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub module: usize,
    pub step: usize,
}

pub struct ProgressionEngine {
    tree: CurriculumTree,
    state: ProgressionState,
    cfg: ProgressionConfig,
    presenter: Box<dyn PanelPresenter>,
    /// Actions wired to the panel currently on screen.
    shown: Vec<Action>,
    events: Vec<TourEvent>,
}

impl std::fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("state", &self.state)
            .field("modules", &self.tree.len())
            .field("shown", &self.shown)
            .finish()
    }
}

impl ProgressionEngine {
    pub fn new(
        tree: CurriculumTree,
        presenter: Box<dyn PanelPresenter>,
        cfg: ProgressionConfig,
    ) -> Self {
        Self {
            tree,
            state: ProgressionState::default(),
            cfg,
            presenter,
            shown: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn tree(&self) -> &CurriculumTree {
        &self.tree
    }

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        !self.tree.is_empty() && self.state.module >= self.tree.len()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            module: self.state.module,
            step: self.state.step,
            completed: self.is_completed(),
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.tree.step(self.state.module, self.state.step)
    }

    /// Panel entries as last shown.
    pub fn shown_actions(&self) -> Vec<PanelAction> {
        panel_actions(&self.shown)
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.events)
    }

    fn guard_empty(&self, op: &str) -> bool {
        if self.tree.is_empty() {
            log::warn!("{op}: curriculum is empty");
            return true;
        }
        false
    }

    pub fn start(&mut self) {
        if self.guard_empty("start") {
            return;
        }
        self.state = ProgressionState::default();
        self.events.push(TourEvent::Started);
        self.display_current_step();
    }

    pub fn advance_step(&mut self) {
        if self.guard_empty("advance_step") {
            return;
        }
        if self.is_completed() {
            self.advance_module();
            return;
        }
        self.state.step += 1;
        match self.tree.step_count(self.state.module) {
            Some(count) if self.state.step < count => self.display_current_step(),
            _ => self.advance_module(),
        }
    }

    pub fn advance_module(&mut self) {
        if self.guard_empty("advance_module") {
            return;
        }
        if self.is_completed() {
            self.show_completion();
            return;
        }
        self.state.module += 1;
        self.state.step = 0;
        if self.state.module < self.tree.len() {
            self.display_current_step();
            self.events.push(TourEvent::ModuleChanged {
                module: self.state.module,
            });
        } else {
            self.state.module = self.tree.len();
            log::info!("tour completed");
            self.events.push(TourEvent::Completed);
            self.show_completion();
        }
    }

    pub fn retreat_step(&mut self) {
        if self.guard_empty("retreat_step") {
            return;
        }
        if self.is_completed() {
            self.enter_last_step_of(self.tree.len() - 1);
            return;
        }
        if self.state.step > 0 {
            self.state.step -= 1;
            self.display_current_step();
        } else if self.state.module > 0 {
            self.enter_last_step_of(self.state.module - 1);
        } else {
            log::debug!("retreat_step at the first step; nothing to do");
        }
    }

    fn enter_last_step_of(&mut self, module: usize) {
        let Some(count) = self.tree.step_count(module) else {
            log::warn!("module {module} missing");
            return;
        };
        self.state.module = module;
        self.state.step = count.saturating_sub(1);
        self.display_current_step();
        self.events.push(TourEvent::ModuleChanged { module });
    }

    pub fn jump_to_first(&mut self) {
        if self.guard_empty("jump_to_first") {
            return;
        }
        let previous = self.state.module;
        self.state = ProgressionState::default();
        self.display_current_step();
        if previous != 0 {
            self.events.push(TourEvent::ModuleChanged { module: 0 });
        }
    }

    pub fn navigate(&mut self, nav: Navigation) {
        match nav {
            Navigation::Advance => self.advance_step(),
            Navigation::Retreat => self.retreat_step(),
            Navigation::AdvanceModule => self.advance_module(),
            Navigation::Restart => self.jump_to_first(),
        }
    }

    /// Render the step under the cursor, synthesizing an advance action when
    /// the step declares none.
    pub fn display_current_step(&mut self) {
        if self.is_completed() {
            self.show_completion();
            return;
        }
        let ProgressionState { module, step } = self.state;
        let Some(current) = self.tree.step(module, step) else {
            log::warn!("no step at module {module} step {step}");
            return;
        };

        let actions = if current.actions.is_empty() {
            vec![Action::advance(self.cfg.advance_label.clone())]
        } else {
            current.actions.clone()
        };
        let panel = panel_actions(&actions);
        self.presenter.show(&current.title, &current.content, &panel);
        self.shown = actions;
        log::debug!("showing module {module} step {step}");
        self.events.push(TourEvent::StepShown { module, step });
    }

    fn show_completion(&mut self) {
        let actions = vec![Action::new(
            self.cfg.restart_label.clone(),
            ActionHandler::Navigate(Navigation::Restart),
        )];
        let panel = panel_actions(&actions);
        self.presenter.show(
            &self.cfg.completion_title,
            &self.cfg.completion_content,
            &panel,
        );
        self.shown = actions;
    }

    /// Run the action at `index` on the current panel. Returns `false` for an
    /// index that isn't on screen.
    pub fn activate_action(&mut self, index: usize) -> bool {
        let Some(action) = self.shown.get(index).cloned() else {
            log::warn!(
                "action {index} is not on the current panel ({} shown)",
                self.shown.len()
            );
            return false;
        };
        match action.handler {
            ActionHandler::Navigate(nav) => self.navigate(nav),
            ActionHandler::Custom { name, callback } => {
                let mut ctx = ActionContext::new(self.state.module, self.state.step);
                match callback(&mut ctx) {
                    Ok(()) => {
                        let (requests, notices) = ctx.into_parts();
                        for (message, severity) in notices {
                            self.presenter.notify(&message, severity);
                        }
                        for nav in requests {
                            self.navigate(nav);
                        }
                    }
                    Err(err) => {
                        log::warn!("action {:?} ({name}) failed: {err:#}", action.label);
                        self.presenter.notify(
                            &format!("{} could not run; moving on", action.label),
                            Severity::Warning,
                        );
                        self.events.push(TourEvent::ActionFailed {
                            label: action.label,
                            message: format!("{err:#}"),
                        });
                        self.advance_step();
                    }
                }
            }
        }
        true
    }

    pub fn hide(&mut self) {
        self.shown.clear();
        self.presenter.hide();
    }
}

fn panel_actions(actions: &[Action]) -> Vec<PanelAction> {
    actions
        .iter()
        .enumerate()
        .map(|(index, a)| PanelAction {
            index,
            label: a.label.clone(),
        })
        .collect()
}
