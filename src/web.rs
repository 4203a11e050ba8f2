//! Browser bindings
//!
//! The page owns the camera, the pose model, rendering and audio. It pushes
//! frames in, calls `update()` from its animation loop, and reads snapshots
//! and events back out as JSON.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::signal::{FrameInput, PixelFrame, PoseFrame, Sensitivity};
use crate::sim::{Game, InputStatus};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Milliseconds on the page's monotonic clock
fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now) as u64
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game from optional settings JSON.
    ///
    /// A missing or non-finite seed falls back to the wall clock.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js_error)?,
            None => Settings::default(),
        };
        let seed = seed
            .filter(|s| s.is_finite())
            .unwrap_or_else(js_sys::Date::now) as u64;
        log::info!("Game initialized with seed: {seed}");
        Ok(WebGame {
            game: Game::new(&settings, seed),
        })
    }

    pub fn start_game(&mut self) -> Result<(), JsValue> {
        self.game.start_game(now_ms()).map_err(to_js_error)
    }

    pub fn restart_game(&mut self) {
        self.game.restart_game(now_ms());
    }

    pub fn set_sensitivity(&mut self, value: u8) {
        self.game.set_sensitivity(Sensitivity::saturating(value));
    }

    pub fn camera_ready(&mut self) {
        self.game.set_input_status(InputStatus::Ready);
    }

    pub fn camera_failed(&mut self, reason: String) {
        self.game.set_input_status(InputStatus::Failed { reason });
    }

    /// Pose result as flat `[x, y, z, visibility]` per landmark
    pub fn submit_landmarks(&mut self, data: &[f32]) {
        match PoseFrame::from_flat(data) {
            Ok(pose) => self.game.submit_frame(FrameInput::Pose(pose)),
            Err(err) => self.game.reject_frame(&err),
        }
    }

    /// Mirrored RGBA frame from the capture canvas
    pub fn submit_pixels(&mut self, width: u32, height: u32, data: &[u8]) {
        match PixelFrame::new(width, height, data.to_vec()) {
            Ok(frame) => self.game.submit_frame(FrameInput::Pixels(frame)),
            Err(err) => self.game.reject_frame(&err),
        }
    }

    /// The pipeline ran but produced nothing this frame
    pub fn frame_missing(&mut self) {
        self.game.submit_frame(FrameInput::Missing);
    }

    /// Fire any timers that came due; call once per animation frame
    pub fn update(&mut self) {
        self.game.advance_to(now_ms());
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(to_js_error)
    }

    /// Events since the last call, oldest first
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(to_js_error)
    }

    pub fn sensitivity_label(&self) -> String {
        self.game.sensitivity().label().as_str().to_string()
    }
}
