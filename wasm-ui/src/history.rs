//! Browser history as the router's location.

use gloo::events::EventListener;
use wasm_bindgen::JsValue;

use compository::{Location, Router};

use crate::convert::js_error_message;

/// Records navigations with `history.pushState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

impl Location for BrowserLocation {
    fn push(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let pushed = window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = pushed {
            tracing::warn!(path, error = %js_error_message(&e), "pushState failed");
        }
    }
}

/// Path of the page as currently shown in the address bar.
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Resolve back/forward navigation through `router`. Dropping the listener
/// stops it.
pub fn listen_popstate(router: Router) -> Option<EventListener> {
    let window = web_sys::window()?;
    Some(EventListener::new(&window, "popstate", move |_| {
        router.resolve(&current_path());
    }))
}
