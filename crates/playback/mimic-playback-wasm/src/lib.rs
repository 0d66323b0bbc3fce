use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect, Uint8Array};
use serde_json::Value as JsonValue;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use mimic_playback_core::{
    HumanoidSkeleton, Landmark, Landmark2D, LoadTicket, MediumHandle, PlaybackConfig,
    PlaybackError, PosePlayer, PoseSolver, RigFrame, SkeletonHandle, TimeMedium,
};
use mimic_rig_core::{ExpressionChannel, HumanoidBone, Rotation};

/// Minimum `readyState` (HAVE_CURRENT_DATA) at which a media element accepts seeks.
const HAVE_CURRENT_DATA: f64 = 2.0;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error_message(v: &JsValue) -> String {
    if let Some(s) = v.as_string() {
        return s;
    }
    if let Some(err) = v.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{v:?}")
}

fn to_js_error(err: PlaybackError) -> JsError {
    JsError::new(&err.to_string())
}

/// Look up `obj[name]` as a function, if it is one.
fn method(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

/// Solver callback: `solver(landmarks3d, landmarks2d) -> rigFrame`.
struct JsSolver {
    f: Function,
}

impl PoseSolver for JsSolver {
    fn solve(&self, landmarks: &[Landmark], projected: &[Landmark2D]) -> anyhow::Result<RigFrame> {
        let lm3d = swb::to_value(landmarks).map_err(|e| anyhow::anyhow!("landmarks: {e}"))?;
        let lm2d = swb::to_value(projected).map_err(|e| anyhow::anyhow!("landmarks2d: {e}"))?;
        let out = self
            .f
            .call2(&JsValue::UNDEFINED, &lm3d, &lm2d)
            .map_err(|e| anyhow::anyhow!("solver threw: {}", js_error_message(&e)))?;
        if jsvalue_is_undefined_or_null(&out) {
            anyhow::bail!("solver returned no rig frame");
        }
        swb::from_value(out).map_err(|e| anyhow::anyhow!("rig frame: {e}"))
    }
}

/// Skeleton object exposing `setBoneRotation(name, x, y, z) -> bool` and,
/// optionally, `setExpression(name, weight) -> bool`.
struct JsSkeleton {
    obj: JsValue,
    set_bone_rotation: Function,
    set_expression: Option<Function>,
}

impl JsSkeleton {
    fn new(obj: JsValue) -> Result<Self, JsError> {
        let set_bone_rotation = method(&obj, "setBoneRotation")
            .ok_or_else(|| JsError::new("skeleton must implement setBoneRotation(name, x, y, z)"))?;
        let set_expression = method(&obj, "setExpression");
        Ok(Self {
            obj,
            set_bone_rotation,
            set_expression,
        })
    }
}

impl HumanoidSkeleton for JsSkeleton {
    fn set_bone_rotation(&mut self, bone: HumanoidBone, rotation: Rotation) -> bool {
        let args = Array::new();
        args.push(&JsValue::from_str(bone.as_str()));
        for component in rotation.to_array() {
            args.push(&JsValue::from_f64(component as f64));
        }
        self.set_bone_rotation
            .apply(&self.obj, &args)
            .map_or(false, |v| v.is_truthy())
    }

    fn set_expression(&mut self, channel: ExpressionChannel, weight: f32) -> bool {
        let Some(f) = self.set_expression.as_ref() else {
            return false;
        };
        f.call2(
            &self.obj,
            &JsValue::from_str(channel.as_str()),
            &JsValue::from_f64(weight as f64),
        )
        .map_or(false, |v| v.is_truthy())
    }
}

/// Video-like time base. Accepts either an object with
/// `setCurrentTime(seconds)` / `isReady()` or a media element
/// (`currentTime` / `readyState`).
struct JsVideo {
    obj: JsValue,
    set_current_time: Option<Function>,
    is_ready: Option<Function>,
}

impl JsVideo {
    fn new(obj: JsValue) -> Result<Self, JsError> {
        if jsvalue_is_undefined_or_null(&obj) {
            return Err(JsError::new("bind_video: video is null/undefined"));
        }
        Ok(Self {
            set_current_time: method(&obj, "setCurrentTime"),
            is_ready: method(&obj, "isReady"),
            obj,
        })
    }
}

impl TimeMedium for JsVideo {
    fn is_ready(&self) -> bool {
        if let Some(f) = self.is_ready.as_ref() {
            return f.call0(&self.obj).map_or(false, |v| v.is_truthy());
        }
        match Reflect::get(&self.obj, &JsValue::from_str("readyState"))
            .ok()
            .and_then(|v| v.as_f64())
        {
            Some(state) => state >= HAVE_CURRENT_DATA,
            None => true,
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        let value = JsValue::from_f64(seconds);
        let _ = match self.set_current_time.as_ref() {
            Some(f) => f.call1(&self.obj, &value),
            None => Reflect::set(&self.obj, &JsValue::from_str("currentTime"), &value)
                .map(JsValue::from_bool),
        };
    }
}

/// Parse a load argument: JSON text, raw bytes (`Uint8Array`) or a plain
/// JS object / array.
enum JsLoad {
    Text(String),
    Bytes(Vec<u8>),
    Json(JsonValue),
}

impl JsLoad {
    fn from_js(data: JsValue) -> Result<Self, JsError> {
        if jsvalue_is_undefined_or_null(&data) {
            return Err(JsError::new("load: data is null/undefined"));
        }
        if let Some(text) = data.as_string() {
            return Ok(Self::Text(text));
        }
        if let Some(bytes) = data.dyn_ref::<Uint8Array>() {
            return Ok(Self::Bytes(bytes.to_vec()));
        }
        let value: JsonValue =
            swb::from_value(data).map_err(|e| JsError::new(&format!("load parse error: {e}")))?;
        Ok(Self::Json(value))
    }
}

#[wasm_bindgen]
pub struct MimicPlayer {
    core: PosePlayer<JsSolver>,
    // strong owner of the bound skeleton; the core keeps a weak reference
    skeleton: Option<SkeletonHandle>,
}

#[wasm_bindgen]
impl MimicPlayer {
    /// Create a player around a JS solver function. Pass a JSON config object
    /// or undefined/null for defaults.
    /// Example:
    ///   new MimicPlayer((lm3d, lm2d) => Kalidokit.Pose.solve(lm3d, lm2d), { debug: true })
    #[wasm_bindgen(constructor)]
    pub fn new(solver: Function, config: JsValue) -> Result<MimicPlayer, JsError> {
        console_error_panic_hook::set_once();

        let cfg: PlaybackConfig = if jsvalue_is_undefined_or_null(&config) {
            PlaybackConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(MimicPlayer {
            core: PosePlayer::with_config(JsSolver { f: solver }, cfg),
            skeleton: None,
        })
    }

    /// Load pose data (JSON string, Uint8Array or object). Returns the
    /// sequence summary `{ fps, frame_count, duration_secs }`.
    #[wasm_bindgen]
    pub fn load(&mut self, data: JsValue) -> Result<JsValue, JsError> {
        let ticket = self.core.begin_load();
        self.finish(ticket, data)
    }

    /// Start an asynchronous load; pass the returned ticket to
    /// `finish_load` or `fail_load`. Starting another load makes it stale.
    #[wasm_bindgen(js_name = begin_load)]
    pub fn begin_load(&mut self) -> f64 {
        self.core.begin_load().0 as f64
    }

    #[wasm_bindgen(js_name = finish_load)]
    pub fn finish_load(&mut self, ticket: f64, data: JsValue) -> Result<JsValue, JsError> {
        self.finish(LoadTicket(ticket as u64), data)
    }

    #[wasm_bindgen(js_name = fail_load)]
    pub fn fail_load(&mut self, ticket: f64, reason: String) -> Result<(), JsError> {
        self.core
            .fail_load(LoadTicket(ticket as u64), &reason)
            .map_err(to_js_error)
    }

    /// Returns whether playback started. With nothing loaded the status
    /// reads "No pose data loaded".
    #[wasm_bindgen]
    pub fn play(&mut self, now_ms: f64) -> bool {
        self.core.play(now_ms).is_ok()
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.core.pause();
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.core.stop();
    }

    /// Returns whether the player is playing afterwards.
    #[wasm_bindgen]
    pub fn toggle(&mut self, now_ms: f64) -> bool {
        let _ = self.core.toggle(now_ms);
        self.core.transport_state().is_playing()
    }

    /// Seek to a frame (clamped). Returns the current frame, or undefined
    /// when nothing is loaded.
    #[wasm_bindgen]
    pub fn seek(&mut self, frame: f64) -> Option<u32> {
        self.core.seek(frame as i64).map(|i| i as u32)
    }

    #[wasm_bindgen]
    pub fn step(&mut self, delta: i32) -> Option<u32> {
        self.core.step(delta as i64).map(|i| i as u32)
    }

    /// Call from `requestAnimationFrame` with its timestamp. Returns the
    /// presented frame when one was due.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> Option<u32> {
        self.core.tick(now_ms).map(|i| i as u32)
    }

    #[wasm_bindgen(js_name = bind_skeleton)]
    pub fn bind_skeleton(&mut self, skeleton: JsValue) -> Result<(), JsError> {
        let handle: SkeletonHandle = Rc::new(RefCell::new(JsSkeleton::new(skeleton)?));
        self.core.bind_skeleton(&handle);
        self.skeleton = Some(handle);
        Ok(())
    }

    #[wasm_bindgen(js_name = unbind_skeleton)]
    pub fn unbind_skeleton(&mut self) {
        self.core.unbind_skeleton();
        self.skeleton = None;
    }

    #[wasm_bindgen(js_name = has_skeleton)]
    pub fn has_skeleton(&self) -> bool {
        self.skeleton.is_some() && self.core.has_skeleton()
    }

    #[wasm_bindgen(js_name = bind_video)]
    pub fn bind_video(&mut self, video: JsValue) -> Result<(), JsError> {
        let handle: MediumHandle = Rc::new(RefCell::new(JsVideo::new(video)?));
        self.core.bind_medium(handle);
        Ok(())
    }

    #[wasm_bindgen(js_name = unbind_video)]
    pub fn unbind_video(&mut self) {
        self.core.unbind_medium();
    }

    /// `{ state, is_playing, current_frame_index, frame_count, fps, last_tick_ms }`
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.state()).map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// Summary of the loaded sequence, or undefined.
    #[wasm_bindgen]
    pub fn summary(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.summary())
            .map_err(|e| JsError::new(&format!("summary error: {e}")))
    }

    #[wasm_bindgen]
    pub fn status(&self) -> String {
        self.core.status().to_string()
    }

    /// Drain events emitted since the last call.
    #[wasm_bindgen(js_name = take_events)]
    pub fn take_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.core.take_events();
        swb::to_value(&events).map_err(|e| JsError::new(&format!("events error: {e}")))
    }
}

impl MimicPlayer {
    fn finish(&mut self, ticket: LoadTicket, data: JsValue) -> Result<JsValue, JsError> {
        let summary = match JsLoad::from_js(data) {
            Ok(JsLoad::Text(text)) => self.core.finish_load(ticket, text.as_str()),
            Ok(JsLoad::Bytes(bytes)) => self.core.finish_load(ticket, bytes.as_slice()),
            Ok(JsLoad::Json(value)) => self.core.finish_load(ticket, value),
            Err(err) => {
                let _ = self.core.fail_load(ticket, "unreadable pose data");
                return Err(err);
            }
        }
        .map_err(to_js_error)?;
        swb::to_value(&summary).map_err(|e| JsError::new(&format!("summary error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
