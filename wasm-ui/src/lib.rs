//! Web UI for stepviz
//!
//! A Yew front end that renders step sequences and drives playback with
//! browser timers.

mod app;
mod components;
mod session;
mod timer;

use wasm_bindgen::prelude::*;

/// Entry point for the WASM application.
#[wasm_bindgen(start)]
pub fn run_app() {
    console_error_panic_hook::set_once();
    yew::Renderer::<app::App>::new().render();
}
