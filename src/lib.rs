//! Soulbit client crate.
//!
//! Single-page assistant client compiled to WebAssembly: a realtime chat
//! panel speaking JSON frames over WebSocket to the gateway, a calendar with
//! approximate lunar labels and daily advisory text, a five-elements matching
//! quiz and a settings panel persisted to browser storage.
//!
//! All decision logic (session state machine, grid derivation, almanac
//! tables, game rules, preference parsing) lives in plain modules so native
//! `cargo test` covers it; the `app` module is the only place that touches
//! the DOM.

use wasm_bindgen::prelude::*;

pub mod almanac;
pub mod calendar;
pub mod chat;
pub mod game;
pub mod i18n;
pub mod net;
pub mod prefs;

mod app;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mount the application into the host page and open the chat panel.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    app::mount()
}
