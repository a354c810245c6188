use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod growth;
pub mod host;
pub mod math;

pub use error::RootError;
pub use growth::{GrowthConfig, GrowthState, RootGrowth, TickOutcome};
pub use host::{Anchor, Constructable, Endpoint, Scene, SceneGraph, Scheduler, TimerManager};
pub use math::{GrowthPath, Vec3};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Growing roots module initialized");
    }
}

/// Construction capability backed by a JavaScript callback
struct JsConstruction(js_sys::Function);

impl Constructable for JsConstruction {
    fn self_construct(&self) {
        if let Err(e) = self.0.call0(&JsValue::NULL) {
            log::error!("Self construction callback failed: {:?}", e);
        }
    }
}

/// Snapshot of a finished root, passed to JavaScript completion callbacks
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionReport {
    stem_count: u32,
    stem_distance: f32,
    path_length: f32,
}

#[wasm_bindgen]
impl CompletionReport {
    #[wasm_bindgen(getter)]
    pub fn stem_count(&self) -> u32 {
        self.stem_count
    }

    #[wasm_bindgen(getter)]
    pub fn stem_distance(&self) -> f32 {
        self.stem_distance
    }

    #[wasm_bindgen(getter)]
    pub fn path_length(&self) -> f32 {
        self.path_length
    }
}

/// One root with its own anchors, scene and timers, exposed to JavaScript
#[wasm_bindgen]
pub struct Roots {
    roots: RootGrowth,
    scene: SceneGraph,
    timers: TimerManager,
    main: Option<Rc<Anchor>>,
    target: Option<Rc<Anchor>>,
    completion_callbacks: Vec<js_sys::Function>,
    last_completion: Option<CompletionReport>,
}

impl Default for Roots {
    fn default() -> Self {
        Self::with_config(GrowthConfig::default())
    }
}

impl Roots {
    fn with_config(config: GrowthConfig) -> Self {
        Self {
            roots: RootGrowth::new(config),
            scene: SceneGraph::new(),
            timers: TimerManager::new(),
            main: None,
            target: None,
            completion_callbacks: Vec::new(),
            last_completion: None,
        }
    }

    /// Run due ticks; returns the report if the root completed during this frame
    fn advance_frame(&mut self, dt: f32) -> Option<CompletionReport> {
        let mut completed = false;
        for fire in self.timers.advance(dt) {
            if self.roots.timer() != Some(fire.handle) {
                continue;
            }
            let outcome = self.roots.tick(fire.elapsed, &mut self.scene, &mut self.timers);
            completed |= outcome == TickOutcome::Completed;
        }

        if !completed {
            return None;
        }
        let report = CompletionReport {
            stem_count: self.scene.stems().len() as u32,
            stem_distance: self.roots.stem_distance(),
            path_length: self.roots.path().map_or(0.0, GrowthPath::total_length),
        };
        self.last_completion = Some(report);
        Some(report)
    }

    /// Engine driven by this surface
    pub fn engine(&self) -> &RootGrowth {
        &self.roots
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }
}

#[wasm_bindgen]
impl Roots {
    /// Create roots with default growth tunables
    #[wasm_bindgen(constructor)]
    pub fn new() -> Roots {
        Self::default()
    }

    /// Create roots with tunables loaded from a YAML string
    #[wasm_bindgen]
    pub fn from_yaml(yaml: &str) -> Result<Roots, JsValue> {
        let config = GrowthConfig::from_yaml(yaml).map_err(to_js)?;
        Ok(Self::with_config(config))
    }

    /// Replace tunables; applied on the next start
    #[wasm_bindgen]
    pub fn set_config(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = GrowthConfig::from_yaml(yaml).map_err(to_js)?;
        self.roots.set_config(config);
        Ok(())
    }

    /// Place the anchor the root grows from
    #[wasm_bindgen]
    pub fn set_main_anchor(&mut self, name: &str, x: f32, y: f32, z: f32) {
        self.main = Some(Rc::new(Anchor::new(name, Vec3::new(x, y, z))));
    }

    /// Place the anchor the root grows to, with an optional construction callback
    #[wasm_bindgen]
    pub fn set_target_anchor(&mut self, name: &str, x: f32, y: f32, z: f32, on_construct: Option<js_sys::Function>) {
        let mut anchor = Anchor::new(name, Vec3::new(x, y, z));
        if let Some(callback) = on_construct {
            anchor = anchor.with_construction(JsConstruction(callback));
        }
        self.target = Some(Rc::new(anchor));
    }

    #[wasm_bindgen]
    pub fn move_target_anchor(&mut self, x: f32, y: f32, z: f32) {
        if let Some(anchor) = &self.target {
            anchor.set_position(Vec3::new(x, y, z));
        }
    }

    /// Destroy the target anchor. A growing root stops on its next tick.
    #[wasm_bindgen]
    pub fn remove_target_anchor(&mut self) {
        self.target = None;
    }

    #[wasm_bindgen]
    pub fn initialize(&mut self) -> Result<(), JsValue> {
        let main = self.main.as_ref().map(Rc::downgrade).unwrap_or_default();
        let target = self.target.as_ref().map(Rc::downgrade).unwrap_or_default();
        self.roots
            .initialize(main, target, &mut self.scene, &mut self.timers)
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn start_growing(&mut self) -> Result<(), JsValue> {
        self.roots
            .start_growing(&mut self.scene, &mut self.timers)
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn stop_growing(&mut self) {
        self.roots.stop_growing(&mut self.timers);
    }

    /// Register a callback invoked with a `CompletionReport` each time the root reaches its target.
    ///
    /// Callbacks run as microtasks after `update` returns, so they may call back into this object.
    #[wasm_bindgen]
    pub fn on_completed(&mut self, callback: js_sys::Function) {
        self.completion_callbacks.push(callback);
    }

    /// Advance the frame; returns true if the root completed during this frame
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(report) = self.advance_frame(dt) else {
            return false;
        };
        for callback in &self.completion_callbacks {
            if let Err(e) = queue_call(callback, &JsValue::from(report)) {
                log::error!("Failed to queue completion callback: {:?}", e);
            }
        }
        true
    }

    /// Report from the most recent completion, if any
    #[wasm_bindgen]
    pub fn last_completion(&self) -> Option<CompletionReport> {
        self.last_completion
    }

    /// Stem placements, 12 floats per stem
    #[wasm_bindgen]
    pub fn stem_data(&self) -> Vec<f32> {
        self.scene.stem_data()
    }

    #[wasm_bindgen]
    pub fn stem_count(&self) -> usize {
        self.scene.stems().len()
    }

    /// Path control points, 3 floats per point
    #[wasm_bindgen]
    pub fn path_points(&self) -> Vec<f32> {
        self.roots
            .path()
            .map(|p| p.points().iter().flat_map(|v| v.to_array()).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.roots.state())
    }

    /// Overall growth progress (0.0 to 1.0)
    #[wasm_bindgen]
    pub fn progress(&self) -> f32 {
        self.roots.progress()
    }
}

/// Call `callback(payload)` from a microtask, outside the current wasm borrow
fn queue_call(callback: &js_sys::Function, payload: &JsValue) -> Result<(), JsValue> {
    let queue: js_sys::Function =
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("queueMicrotask"))?.dyn_into()?;
    queue.call1(&JsValue::NULL, &callback.bind1(&JsValue::NULL, payload))?;
    Ok(())
}

fn to_js(err: RootError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
