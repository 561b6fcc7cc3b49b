//! Contracts the UI consumes from the conductor client.
//!
//! The wire protocol lives in the client library; these traits only name the
//! calls the UI makes. All futures run on the single UI thread, so none of
//! them are required to be `Send`.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cell::CellId;
use crate::error::ConductorError;
use crate::hash::AgentPubKey;

/// Administrative interface: listing and managing installed cells.
pub trait AdminApi {
    async fn list_cell_ids(&self) -> Result<Vec<CellId>, ConductorError>;
}

/// Application interface: calling zome functions inside a cell.
pub trait AppApi {
    async fn call_zome(&self, call: ZomeCall) -> Result<Value, ConductorError>;
}

/// Opens the two conductor connections.
pub trait Connector {
    type Admin: AdminApi;
    type App: AppApi;

    async fn connect_admin(&self, url: &str) -> Result<Self::Admin, ConductorError>;

    async fn connect_app(&self, url: &str, timeout: Duration)
    -> Result<Self::App, ConductorError>;
}

/// A zome function invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZomeCall {
    /// Capability secret; `None` for calls authorized by the cell's own agent.
    pub cap: Option<Vec<u8>>,
    pub cell_id: CellId,
    pub zome_name: String,
    pub fn_name: String,
    pub payload: Value,
    pub provenance: AgentPubKey,
}

impl ZomeCall {
    /// A call with no capability, a null payload, and the cell's own agent
    /// as provenance.
    pub fn new(cell_id: CellId, zome_name: impl Into<String>, fn_name: impl Into<String>) -> Self {
        let provenance = cell_id.agent_pub_key().clone();
        Self {
            cap: None,
            cell_id,
            zome_name: zome_name.into(),
            fn_name: fn_name.into(),
            payload: Value::Null,
            provenance,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HoloHash;
    use serde_json::json;

    #[test]
    fn test_zome_call_defaults() {
        let cell = CellId::new(
            HoloHash::from_bytes(vec![1; 3]),
            HoloHash::from_bytes(vec![2; 3]),
        );
        let call = ZomeCall::new(cell.clone(), "file_storage", "announce_as_provider");

        assert_eq!(call.cap, None);
        assert_eq!(call.payload, Value::Null);
        assert_eq!(&call.provenance, cell.agent_pub_key());

        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["zome_name"], json!("file_storage"));
        assert_eq!(json["fn_name"], json!("announce_as_provider"));
        assert_eq!(json["cap"], Value::Null);
        assert_eq!(json["provenance"], json!(cell.agent_pub_key().to_string()));
    }

    #[test]
    fn test_zome_call_builders() {
        let cell = CellId::new(
            HoloHash::from_bytes(vec![1; 3]),
            HoloHash::from_bytes(vec![2; 3]),
        );
        let call = ZomeCall::new(cell, "zome", "fn").with_payload(json!({ "n": 1 }));
        assert_eq!(call.payload, json!({ "n": 1 }));
    }
}
