//! Conductor connections through the `@holochain/conductor-api` client.

use std::time::Duration;

use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use compository::{AdminApi, AppApi, CellId, CompositoryService, ConductorError, Connector, ZomeCall};

use crate::convert::{cell_ids_from_js, js_error_message, json_from_js, zome_call_to_js};

#[wasm_bindgen(module = "@holochain/conductor-api")]
extern "C" {
    #[derive(Debug, Clone, PartialEq)]
    pub type AdminWebsocket;

    #[wasm_bindgen(static_method_of = AdminWebsocket, js_name = connect, catch)]
    async fn open_admin(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = listCellIds, catch)]
    async fn list_cell_ids_js(this: &AdminWebsocket) -> Result<JsValue, JsValue>;

    #[derive(Debug, Clone, PartialEq)]
    pub type AppWebsocket;

    #[wasm_bindgen(static_method_of = AppWebsocket, js_name = connect, catch)]
    async fn open_app(url: &str, timeout: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = callZome, catch)]
    async fn call_zome_js(this: &AppWebsocket, request: &JsValue) -> Result<JsValue, JsValue>;
}

/// Admin connection.
#[derive(Debug, Clone, PartialEq)]
pub struct JsAdmin {
    socket: AdminWebsocket,
}

impl JsAdmin {
    pub fn socket(&self) -> &AdminWebsocket {
        &self.socket
    }
}

impl AdminApi for JsAdmin {
    async fn list_cell_ids(&self) -> Result<Vec<CellId>, ConductorError> {
        let value = self
            .socket
            .list_cell_ids_js()
            .await
            .map_err(|e| ConductorError::Request(js_error_message(&e)))?;
        cell_ids_from_js(&value)
    }
}

/// App connection.
#[derive(Debug, Clone, PartialEq)]
pub struct JsApp {
    socket: AppWebsocket,
}

impl JsApp {
    pub fn socket(&self) -> &AppWebsocket {
        &self.socket
    }
}

impl AppApi for JsApp {
    async fn call_zome(&self, call: ZomeCall) -> Result<Value, ConductorError> {
        tracing::debug!(zome = %call.zome_name, function = %call.fn_name, "calling zome");
        let request = zome_call_to_js(&call)?;
        let value = self
            .socket
            .call_zome_js(&request)
            .await
            .map_err(|e| ConductorError::Request(js_error_message(&e)))?;
        json_from_js(&value)
    }
}

/// Opens real websocket connections from the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserConnector;

impl Connector for BrowserConnector {
    type Admin = JsAdmin;
    type App = JsApp;

    async fn connect_admin(&self, url: &str) -> Result<JsAdmin, ConductorError> {
        let socket = AdminWebsocket::open_admin(url)
            .await
            .map_err(|e| ConductorError::Connect {
                url: url.to_string(),
                reason: js_error_message(&e),
            })?;
        Ok(JsAdmin {
            socket: socket.unchecked_into(),
        })
    }

    async fn connect_app(&self, url: &str, timeout: Duration) -> Result<JsApp, ConductorError> {
        let socket = AppWebsocket::open_app(url, timeout.as_millis() as f64)
            .await
            .map_err(|e| {
                let reason = js_error_message(&e);
                if reason.to_ascii_lowercase().contains("timeout") {
                    ConductorError::Timeout(timeout)
                } else {
                    ConductorError::Connect {
                        url: url.to_string(),
                        reason,
                    }
                }
            })?;
        Ok(JsApp {
            socket: socket.unchecked_into(),
        })
    }
}

/// The service the running UI hands to its child elements.
pub type UiService = CompositoryService<JsAdmin, JsApp>;
