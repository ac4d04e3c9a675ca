use anyhow::anyhow;
use js_sys::{Function, Object, Reflect, JSON};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use labtour_core::{
    ActionContext, AnimationLibrary, CharacterScript, ClipHandle, CurriculumTree,
    HandlerRegistry, LoadedClip, LogNarrator, LogPresenter, LoopMode, ModelHandle, Narrator,
    Navigation, NodeHandle, PanelAction, PanelPresenter, Severity, Tour, TourCommand, TourConfig,
};

#[wasm_bindgen]
pub struct LabTour {
    core: Tour,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error_text(e: &JsValue) -> String {
    e.as_string()
        .or_else(|| {
            Reflect::get(e, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{e:?}"))
}

fn stringify(what: &str, v: &JsValue) -> Result<String, JsError> {
    JSON::stringify(v)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {}", js_error_text(&e))))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

fn to_plain<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, swb::Error> {
    v.serialize(&swb::Serializer::json_compatible())
}

fn method(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

/// Panel surface backed by a JS object with optional `show(title, content,
/// actions)`, `hide()` and `notify(message, severity)` methods.
struct JsPresenter {
    this: JsValue,
    show: Option<Function>,
    hide: Option<Function>,
    notify: Option<Function>,
}

impl JsPresenter {
    fn new(obj: JsValue) -> Self {
        Self {
            show: method(&obj, "show"),
            hide: method(&obj, "hide"),
            notify: method(&obj, "notify"),
            this: obj,
        }
    }

    fn report(op: &str, r: Result<JsValue, JsValue>) {
        if let Err(e) = r {
            log::warn!("presenter.{op} threw: {}", js_error_text(&e));
        }
    }
}

impl PanelPresenter for JsPresenter {
    fn show(&mut self, title: &str, content: &serde_json::Value, actions: &[PanelAction]) {
        let Some(f) = self.show.as_ref() else {
            return;
        };
        let content = to_plain(content).unwrap_or(JsValue::NULL);
        let actions = to_plain(actions).unwrap_or(JsValue::NULL);
        Self::report(
            "show",
            f.call3(&self.this, &JsValue::from_str(title), &content, &actions),
        );
    }

    fn hide(&mut self) {
        if let Some(f) = self.hide.as_ref() {
            Self::report("hide", f.call0(&self.this));
        }
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        let Some(f) = self.notify.as_ref() else {
            return;
        };
        let severity = to_plain(&severity).unwrap_or(JsValue::NULL);
        Self::report(
            "notify",
            f.call2(&self.this, &JsValue::from_str(message), &severity),
        );
    }
}

struct JsNarrator {
    f: Function,
}

impl Narrator for JsNarrator {
    fn speak(&mut self, text: &str) {
        if let Err(e) = self.f.call1(&JsValue::UNDEFINED, &JsValue::from_str(text)) {
            log::warn!("narrator threw: {}", js_error_text(&e));
        }
    }
}

#[derive(Serialize)]
struct JsActionContext {
    module: usize,
    step: usize,
}

/// Wrap every function on `handlers` as a curriculum action. The JS handler
/// is called with `{ module, step }` and may return a navigation name
/// (`"next"`, `"back"`, `"next_module"`, `"restart"`); throwing fails the
/// action.
fn registry_from(handlers: &JsValue) -> HandlerRegistry {
    let mut reg = HandlerRegistry::new();
    if jsvalue_is_undefined_or_null(handlers) {
        return reg;
    }
    let obj: &Object = handlers.unchecked_ref();
    for key in Object::keys(obj).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let Some(f) = method(handlers, &name) else {
            log::warn!("handler {name:?} is not a function; ignored");
            continue;
        };
        reg.register(name.clone(), move |ctx: &mut ActionContext| {
            let arg = to_plain(&JsActionContext {
                module: ctx.module,
                step: ctx.step,
            })
            .map_err(|e| anyhow!("context error: {e}"))?;
            let out = f
                .call1(&JsValue::UNDEFINED, &arg)
                .map_err(|e| anyhow!("{}", js_error_text(&e)))?;
            if let Some(nav) = out.as_string() {
                match Navigation::from_name(&nav) {
                    Some(nav) => ctx.navigate(nav),
                    None => log::warn!("handler {name:?} returned unknown navigation {nav:?}"),
                }
            }
            Ok(())
        });
    }
    reg
}

/// Clip metadata reported by the host once it has decoded the assets.
#[derive(Debug, Deserialize)]
struct JsLoadedClip {
    name: String,
    handle: u64,
    duration: f32,
    #[serde(default)]
    looping: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct JsLoadedCharacter {
    /// Absent when the model failed to load.
    #[serde(default)]
    model: Option<u64>,
    #[serde(default)]
    clips: Vec<JsLoadedClip>,
}

#[wasm_bindgen]
impl LabTour {
    /// Build a tour.
    ///
    /// `curriculum` is the module/step JSON; `script` and `config` may be
    /// null for defaults. `presenter` is an object with `show`, `hide` and
    /// `notify`; `narrator` is `(text) => void`; `handlers` maps handler names
    /// used by the curriculum to functions. Any of the last three may be null.
    #[wasm_bindgen(constructor)]
    pub fn new(
        curriculum: JsValue,
        script: JsValue,
        config: JsValue,
        presenter: JsValue,
        narrator: JsValue,
        handlers: JsValue,
    ) -> Result<LabTour, JsError> {
        console_error_panic_hook::set_once();

        if jsvalue_is_undefined_or_null(&curriculum) {
            return Err(JsError::new("curriculum is null/undefined"));
        }
        let registry = registry_from(&handlers);
        let tree = CurriculumTree::from_json(&stringify("curriculum", &curriculum)?, &registry)
            .map_err(|e| JsError::new(&e.to_string()))?;

        let script = if jsvalue_is_undefined_or_null(&script) {
            CharacterScript::default()
        } else {
            CharacterScript::from_json(&stringify("script", &script)?)
                .map_err(|e| JsError::new(&e.to_string()))?
        };

        let cfg: TourConfig = if jsvalue_is_undefined_or_null(&config) {
            TourConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let presenter: Box<dyn PanelPresenter> = if jsvalue_is_undefined_or_null(&presenter) {
            Box::new(LogPresenter)
        } else {
            Box::new(JsPresenter::new(presenter))
        };
        let narrator: Box<dyn Narrator> = match narrator.dyn_into::<Function>() {
            Ok(f) => Box::new(JsNarrator { f }),
            Err(_) => Box::new(LogNarrator),
        };

        Ok(LabTour {
            core: Tour::new(tree, presenter, narrator, script, cfg),
        })
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.core.start();
    }

    #[wasm_bindgen]
    pub fn advance(&mut self) {
        self.core.advance_step();
    }

    #[wasm_bindgen]
    pub fn retreat(&mut self) {
        self.core.retreat_step();
    }

    #[wasm_bindgen(js_name = advance_module)]
    pub fn advance_module(&mut self) {
        self.core.advance_module();
    }

    #[wasm_bindgen]
    pub fn restart(&mut self) {
        self.core.jump_to_first();
    }

    /// Trigger the action at `index` on the current panel. `false` if the
    /// panel doesn't offer it.
    #[wasm_bindgen(js_name = activate_action)]
    pub fn activate_action(&mut self, index: usize) -> bool {
        self.core.activate_action(index)
    }

    /// Apply a `{ type: "advance" | "retreat" | ... }` command object.
    #[wasm_bindgen]
    pub fn apply(&mut self, command: JsValue) -> Result<bool, JsError> {
        let cmd: TourCommand =
            swb::from_value(command).map_err(|e| JsError::new(&format!("command error: {e}")))?;
        Ok(self.core.apply(cmd))
    }

    /// Mark the character as loading while the host fetches assets.
    #[wasm_bindgen(js_name = begin_loading)]
    pub fn begin_loading(&mut self) {
        self.core.character_mut().begin_loading();
    }

    /// Hand over decoded assets: `{ model?: number, clips: [{ name, handle,
    /// duration, looping? }] }`. A missing model becomes a placeholder.
    #[wasm_bindgen(js_name = finish_loading)]
    pub fn finish_loading(&mut self, loaded: JsValue) -> Result<(), JsError> {
        let loaded: JsLoadedCharacter = swb::from_value(loaded)
            .map_err(|e| JsError::new(&format!("finish_loading parse error: {e}")))?;
        let model = match loaded.model {
            Some(id) => ModelHandle::Loaded(NodeHandle(id)),
            None => ModelHandle::Placeholder,
        };
        let mut library = AnimationLibrary::new();
        for clip in loaded.clips {
            let mode = clip.looping.map(|l| if l { LoopMode::Loop } else { LoopMode::Once });
            library.insert_loaded(
                &clip.name,
                LoadedClip {
                    handle: ClipHandle(clip.handle),
                    duration: clip.duration,
                },
                mode,
            );
        }
        self.core.character_mut().finish_loading(model, library);
        Ok(())
    }

    #[wasm_bindgen(js_name = play_animation)]
    pub fn play_animation(&mut self, name: String) -> bool {
        self.core.character_mut().play_animation(&name)
    }

    /// Speak `text`, talking for an estimated duration.
    #[wasm_bindgen]
    pub fn say(&mut self, text: String) -> bool {
        self.core.character_mut().say(&text, None)
    }

    /// Current progress `{ module, step, completed }`.
    #[wasm_bindgen]
    pub fn progress(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.progression().snapshot())
            .map_err(|e| JsError::new(&format!("progress error: {e}")))
    }

    /// Step the mentor by dt (seconds). Returns the frame JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let frame = self.core.update(dt);
        to_plain(frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
