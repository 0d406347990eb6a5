use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod error;
pub mod game;
pub mod input;
mod logging;

use catalog::pitch;
use catalog::scales;
use game::config::GameConfig;
use game::session::Session;
use game::types::Mode;

use serde::Serialize;
use std::cell::RefCell;

thread_local! {
    static SESSION: RefCell<Option<Session>> = RefCell::new(None);
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64 ^ js_sys::Date::now() as u64
}

/// Run `f` against the page's session, creating it on first use.
fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    SESSION.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let session = borrow.get_or_insert_with(|| Session::with_defaults(random_seed()));
        f(session)
    })
}

/// Serialize for JS; a value that cannot be represented becomes `null`.
fn to_js_or_null<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        log::warn!("Could not serialize value: {}", e);
        JsValue::NULL
    })
}

/// Route `log` output to the browser console at the given level ("debug", "info", ...).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logging::init(logging::parse_level(level));
}

/// Replace the game configuration with a (possibly partial) config object.
/// Resets the session.
#[wasm_bindgen]
pub fn configure(config_js: JsValue) -> Result<(), JsValue> {
    let config: GameConfig = serde_wasm_bindgen::from_value(config_js).map_err(js_err)?;
    with_session(|s| s.configure(config)).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_config() -> Result<JsValue, JsValue> {
    with_session(|s| serde_wasm_bindgen::to_value(s.config())).map_err(js_err)
}

/// "game" or "free". Unknown modes are ignored.
#[wasm_bindgen]
pub fn set_mode(mode: &str) {
    match mode.parse::<Mode>() {
        Ok(mode) => with_session(|s| s.set_mode(mode)),
        Err(e) => log::warn!("{}; keeping current mode", e),
    }
}

/// Select the free play scale. Returns the key that is active afterwards.
#[wasm_bindgen]
pub fn set_scale(key: &str) -> String {
    with_session(|s| {
        if let Err(e) = s.set_scale(key) {
            log::warn!("{}; keeping {}", e, s.active_scale());
        }
        s.active_scale().to_string()
    })
}

#[wasm_bindgen]
pub fn start_game() {
    with_session(|s| s.start().unwrap_or_else(|e| log::debug!("{}", e)));
}

#[wasm_bindgen]
pub fn pause_game() {
    with_session(|s| s.pause().unwrap_or_else(|e| log::debug!("{}", e)));
}

#[wasm_bindgen]
pub fn resume_game() {
    with_session(|s| s.resume().unwrap_or_else(|e| log::debug!("{}", e)));
}

#[wasm_bindgen]
pub fn toggle_pause() {
    with_session(|s| s.toggle_pause().unwrap_or_else(|e| log::debug!("{}", e)));
}

#[wasm_bindgen]
pub fn reset_game() {
    with_session(|s| s.reset());
}

/// Animation-frame callback; pass the `requestAnimationFrame` timestamp.
#[wasm_bindgen]
pub fn frame(now_ms: f64) {
    with_session(|s| s.frame(now_ms));
}

/// Advance by an explicit wall-clock delta instead of frame timestamps.
#[wasm_bindgen]
pub fn update(delta_ms: f64) {
    with_session(|s| s.update_ms(delta_ms));
}

/// A key went down. Returns the judgement outcome, or `null` when nothing was judged.
#[wasm_bindgen]
pub fn handle_press(pitch: u8) -> JsValue {
    with_session(|s| match s.handle_press(pitch) {
        Some(outcome) => to_js_or_null(&outcome),
        None => JsValue::NULL,
    })
}

#[wasm_bindgen]
pub fn handle_release(pitch: u8) {
    with_session(|s| s.handle_release(pitch));
}

/// Feed a raw Web MIDI message (`MIDIMessageEvent.data`).
#[wasm_bindgen]
pub fn handle_midi_message(data: &[u8]) -> JsValue {
    let Some(event) = input::parse_midi_message(data) else {
        return JsValue::NULL;
    };
    with_session(|s| match s.handle_input(event) {
        Some(outcome) => to_js_or_null(&outcome),
        None => JsValue::NULL,
    })
}

/// Full game state for the HUD and renderer.
#[wasm_bindgen]
pub fn snapshot() -> Result<JsValue, JsValue> {
    with_session(|s| serde_wasm_bindgen::to_value(&s.snapshot())).map_err(js_err)
}

/// Per-frame note feed as a flat Float64Array: [id, pitch, position, state] per note.
/// State is 0 in flight, 1 perfect, 2 great, 3 good, 4 missed.
#[wasm_bindgen]
pub fn note_feed() -> js_sys::Float64Array {
    with_session(|s| {
        let packed: Vec<f64> = s
            .notes()
            .iter()
            .flat_map(|n| {
                [
                    n.id as f64,
                    n.pitch as f64,
                    n.vertical_position,
                    n.state_code() as f64,
                ]
            })
            .collect();
        js_sys::Float64Array::from(packed.as_slice())
    })
}

/// Side effects queued since the last call (tones, key flashes, level ups, ...).
/// Call once per frame: only the newest 1024 events are kept between calls.
#[wasm_bindgen]
pub fn drain_events() -> Result<JsValue, JsValue> {
    with_session(|s| serde_wasm_bindgen::to_value(&s.drain_events())).map_err(js_err)
}

#[derive(Serialize)]
struct ScaleInfo {
    key: &'static str,
    name: String,
    pitches: &'static [u8],
}

/// Scales for the selector, in display order.
#[wasm_bindgen]
pub fn scale_list() -> Result<JsValue, JsValue> {
    let list: Vec<ScaleInfo> = scales::scales()
        .iter()
        .map(|s| ScaleInfo {
            key: s.key,
            name: scales::display_name(s.key),
            pitches: s.pitches,
        })
        .collect();
    serde_wasm_bindgen::to_value(&list).map_err(js_err)
}

#[wasm_bindgen]
pub fn level_list() -> Result<JsValue, JsValue> {
    with_session(|s| serde_wasm_bindgen::to_value(&s.config().levels)).map_err(js_err)
}

/// Every playable key, lowest first, for drawing the keyboard.
#[wasm_bindgen]
pub fn keyboard_pitches() -> Vec<u8> {
    pitch::all_pitches().collect()
}

/// "C#4" for 61; `undefined` outside C3..C5.
#[wasm_bindgen]
pub fn note_name(midi: u8) -> Option<String> {
    pitch::name_of(midi).ok()
}

#[wasm_bindgen]
pub fn note_pitch(name: &str) -> Option<u8> {
    pitch::pitch_of(name).ok()
}

#[wasm_bindgen]
pub fn note_frequency(midi: u8) -> f64 {
    pitch::frequency_of(midi)
}
