//! Web UI for the compository
//!
//! A Yew front end that connects to the local Holochain conductor, binds
//! the compository elements to the running service, and routes between
//! the home, DNA detail and zome publishing views.

mod app;
mod components;
mod conductor;
mod convert;
mod elements;
mod history;

use tracing_wasm::WASMLayerConfigBuilder;
use wasm_bindgen::prelude::*;

/// Entry point for the WASM application.
#[wasm_bindgen(start)]
pub fn run_app() {
    // Initialize panic hook for better error messages
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );

    // Mount the Yew app
    yew::Renderer::<app::App>::new().render();
}
