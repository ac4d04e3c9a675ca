//! Curriculum data model: modules → steps → actions.
//!
//! The tree is built once (from JSON or in code) and never mutated. Action
//! handlers are a tagged variant; string handler names found in JSON are
//! resolved at load time, first against the built-in navigation commands,
//! then against a [`HandlerRegistry`] of host callbacks.

use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::TourError;
use crate::host::Severity;

/// Built-in progression commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    Advance,
    Retreat,
    AdvanceModule,
    Restart,
}

impl Navigation {
    /// Resolve a handler name used in curriculum data.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "advance" | "next" | "nextstep" | "next_step" => Some(Navigation::Advance),
            "retreat" | "back" | "previous" | "prevstep" | "prev_step" => {
                Some(Navigation::Retreat)
            }
            "advance_module" | "next_module" | "nextmodule" | "skip" => {
                Some(Navigation::AdvanceModule)
            }
            "restart" | "jump_to_first" | "first" => Some(Navigation::Restart),
            _ => None,
        }
    }
}

/// What a custom handler may ask of the engine. Requests are applied in order
/// after the handler returns successfully.
#[derive(Debug, Default)]
pub struct ActionContext {
    pub module: usize,
    pub step: usize,
    requests: Vec<Navigation>,
    notices: Vec<(String, Severity)>,
}

impl ActionContext {
    pub fn new(module: usize, step: usize) -> Self {
        Self {
            module,
            step,
            ..Self::default()
        }
    }

    pub fn navigate(&mut self, nav: Navigation) {
        self.requests.push(nav);
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notices.push((message.into(), severity));
    }

    pub(crate) fn into_parts(self) -> (Vec<Navigation>, Vec<(String, Severity)>) {
        (self.requests, self.notices)
    }
}

pub type ActionCallback = Rc<dyn Fn(&mut ActionContext) -> anyhow::Result<()>>;

#[derive(Clone)]
pub enum ActionHandler {
    Navigate(Navigation),
    Custom { name: String, callback: ActionCallback },
}

impl ActionHandler {
    pub fn custom(
        name: impl Into<String>,
        f: impl Fn(&mut ActionContext) -> anyhow::Result<()> + 'static,
    ) -> Self {
        ActionHandler::Custom {
            name: name.into(),
            callback: Rc::new(f),
        }
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionHandler::Navigate(nav) => f.debug_tuple("Navigate").field(nav).finish(),
            ActionHandler::Custom { name, .. } => {
                f.debug_struct("Custom").field("name", name).finish()
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Action {
    pub label: String,
    pub handler: ActionHandler,
}

impl Action {
    pub fn new(label: impl Into<String>, handler: ActionHandler) -> Self {
        Self {
            label: label.into(),
            handler,
        }
    }

    pub fn advance(label: impl Into<String>) -> Self {
        Self::new(label, ActionHandler::Navigate(Navigation::Advance))
    }
}

#[derive(Clone, Debug)]
pub struct Step {
    pub title: String,
    /// Presentational payload, handed to the presenter untouched.
    pub content: serde_json::Value,
    pub actions: Vec<Action>,
    /// Spoken when the step is shown, if narration is enabled.
    pub narration: Option<String>,
}

impl Step {
    pub fn new(title: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            title: title.into(),
            content,
            actions: Vec::new(),
            narration: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_narration(mut self, text: impl Into<String>) -> Self {
        self.narration = Some(text.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct Module {
    pub id: u32,
    pub title: String,
    pub steps: Vec<Step>,
}

impl Module {
    pub fn new(id: u32, title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id,
            title: title.into(),
            steps,
        }
    }
}

/// Named host callbacks that curriculum JSON can refer to.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ActionCallback>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut ActionContext) -> anyhow::Result<()> + 'static,
    ) -> &mut Self {
        self.handlers.insert(name.into(), Rc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<ActionCallback> {
        self.handlers.get(name).cloned()
    }

    /// Built-in names first, then registered callbacks. Missing or unknown
    /// names fall back to advancing.
    pub fn resolve(&self, name: Option<&str>) -> ActionHandler {
        let Some(name) = name else {
            return ActionHandler::Navigate(Navigation::Advance);
        };
        if let Some(nav) = Navigation::from_name(name) {
            return ActionHandler::Navigate(nav);
        }
        match self.get(name) {
            Some(callback) => ActionHandler::Custom {
                name: name.to_string(),
                callback,
            },
            None => {
                log::warn!("unknown action handler {name:?}; using advance");
                ActionHandler::Navigate(Navigation::Advance)
            }
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}

/// Read-only module list.
#[derive(Clone, Debug, Default)]
pub struct CurriculumTree {
    modules: Vec<Module>,
}

impl CurriculumTree {
    /// Every module must have at least one step.
    pub fn new(modules: Vec<Module>) -> Result<Self, TourError> {
        for (index, m) in modules.iter().enumerate() {
            if m.steps.is_empty() {
                return Err(TourError::EmptyModule {
                    index,
                    title: m.title.clone(),
                });
            }
        }
        Ok(Self { modules })
    }

    pub fn from_json(s: &str, registry: &HandlerRegistry) -> Result<Self, TourError> {
        let raw: RawCurriculum =
            serde_json::from_str(s).map_err(|e| TourError::parse("curriculum", e))?;
        let modules = raw
            .modules
            .into_iter()
            .enumerate()
            .map(|(i, m)| Module {
                id: m.id.unwrap_or(i as u32),
                title: m.title,
                steps: m
                    .steps
                    .into_iter()
                    .map(|st| Step {
                        title: st.title,
                        content: st.content,
                        actions: st
                            .actions
                            .into_iter()
                            .map(|a| Action {
                                handler: registry.resolve(a.handler.as_deref()),
                                label: a.label,
                            })
                            .collect(),
                        narration: st.narration,
                    })
                    .collect(),
            })
            .collect();
        Self::new(modules)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn step(&self, module: usize, step: usize) -> Option<&Step> {
        self.modules.get(module)?.steps.get(step)
    }

    pub fn step_count(&self, module: usize) -> Option<usize> {
        self.modules.get(module).map(|m| m.steps.len())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[derive(Deserialize)]
struct RawCurriculum {
    modules: Vec<RawModule>,
}

#[derive(Deserialize)]
struct RawModule {
    #[serde(default)]
    id: Option<u32>,
    title: String,
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
struct RawStep {
    title: String,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    actions: Vec<RawAction>,
    #[serde(default)]
    narration: Option<String>,
}

#[derive(Deserialize)]
struct RawAction {
    label: String,
    #[serde(default)]
    handler: Option<String>,
}
