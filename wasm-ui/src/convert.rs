//! Conversions between compository types and the JS values the conductor
//! client and the compository elements exchange.
//!
//! Hashes travel as `Uint8Array`, cell ids as two-element arrays of hashes.

use js_sys::{Array, JSON, Object, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use compository::{CellId, ConductorError, HoloHash, ZomeCall};

pub fn hash_to_js(hash: &HoloHash) -> JsValue {
    Uint8Array::from(hash.as_bytes()).into()
}

pub fn hash_from_js(value: &JsValue) -> Result<HoloHash, ConductorError> {
    value
        .dyn_ref::<Uint8Array>()
        .map(|bytes| HoloHash::from_bytes(bytes.to_vec()))
        .ok_or_else(|| malformed("hash is not a Uint8Array"))
}

pub fn cell_id_to_js(cell_id: &CellId) -> JsValue {
    let pair = Array::new();
    pair.push(&hash_to_js(cell_id.dna_hash()));
    pair.push(&hash_to_js(cell_id.agent_pub_key()));
    pair.into()
}

pub fn cell_id_from_js(value: &JsValue) -> Result<CellId, ConductorError> {
    let pair = value
        .dyn_ref::<Array>()
        .ok_or_else(|| malformed("cell id is not an array"))?;
    if pair.length() != 2 {
        return Err(malformed(&format!(
            "cell id has {} elements, expected 2",
            pair.length()
        )));
    }
    Ok(CellId::new(
        hash_from_js(&pair.get(0))?,
        hash_from_js(&pair.get(1))?,
    ))
}

/// Decode the result of `listCellIds`.
pub fn cell_ids_from_js(value: &JsValue) -> Result<Vec<CellId>, ConductorError> {
    let list = value
        .dyn_ref::<Array>()
        .ok_or_else(|| malformed("cell id list is not an array"))?;
    list.iter().map(|item| cell_id_from_js(&item)).collect()
}

/// The `cellId` carried in a child element's event detail, if any.
pub fn cell_id_from_detail(detail: &JsValue) -> Option<CellId> {
    if !detail.is_object() {
        return None;
    }
    let cell_id = Reflect::get(detail, &JsValue::from_str("cellId")).ok()?;
    cell_id_from_js(&cell_id).ok()
}

pub fn json_to_js(value: &Value) -> Result<JsValue, ConductorError> {
    if value.is_null() {
        return Ok(JsValue::NULL);
    }
    JSON::parse(&value.to_string()).map_err(|e| ConductorError::Request(js_error_message(&e)))
}

pub fn json_from_js(value: &JsValue) -> Result<Value, ConductorError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text: String = JSON::stringify(value)
        .map_err(|e| ConductorError::Request(js_error_message(&e)))?
        .into();
    serde_json::from_str(&text).map_err(|e| ConductorError::Request(e.to_string()))
}

/// Request object in the shape `callZome` expects.
pub fn zome_call_to_js(call: &ZomeCall) -> Result<JsValue, ConductorError> {
    let request = Object::new();
    let cap = match &call.cap {
        Some(secret) => Uint8Array::from(secret.as_slice()).into(),
        None => JsValue::NULL,
    };
    set(&request, "cap", &cap)?;
    set(&request, "cell_id", &cell_id_to_js(&call.cell_id))?;
    set(&request, "zome_name", &JsValue::from_str(&call.zome_name))?;
    set(&request, "fn_name", &JsValue::from_str(&call.fn_name))?;
    set(&request, "payload", &json_to_js(&call.payload)?)?;
    set(&request, "provenance", &hash_to_js(&call.provenance))?;
    Ok(request.into())
}

/// Best-effort text of a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if value.is_object()
        && let Some(message) = Reflect::get(value, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
    {
        return message;
    }
    format!("{:?}", value)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), ConductorError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| ConductorError::Request(js_error_message(&e)))
}

fn malformed(what: &str) -> ConductorError {
    ConductorError::Request(format!("malformed conductor response: {}", what))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn cell(n: u8) -> CellId {
        CellId::new(
            HoloHash::from_bytes(vec![n; 4]),
            HoloHash::from_bytes(vec![0xa0; 4]),
        )
    }

    #[wasm_bindgen_test]
    fn cell_id_survives_js_representation() {
        let js = cell_id_to_js(&cell(7));
        assert!(Array::is_array(&js));
        assert_eq!(cell_id_from_js(&js).unwrap(), cell(7));
    }

    #[wasm_bindgen_test]
    fn cell_id_list_rejects_bad_entries() {
        let list = Array::new();
        list.push(&cell_id_to_js(&cell(1)));
        list.push(&JsValue::from_str("not a cell"));

        let err = cell_ids_from_js(&list.into()).unwrap_err();
        assert!(err.to_string().contains("cell id is not an array"));
    }

    #[wasm_bindgen_test]
    fn short_cell_id_is_rejected() {
        let pair = Array::new();
        pair.push(&hash_to_js(&HoloHash::from_bytes(vec![1])));

        let err = cell_id_from_js(&pair.into()).unwrap_err();
        assert!(err.to_string().contains("1 elements"));
    }

    #[wasm_bindgen_test]
    fn event_detail_cell_id() {
        let detail = Object::new();
        Reflect::set(&detail, &"cellId".into(), &cell_id_to_js(&cell(3))).unwrap();

        assert_eq!(cell_id_from_detail(&detail.into()), Some(cell(3)));
        assert_eq!(cell_id_from_detail(&JsValue::NULL), None);
        assert_eq!(cell_id_from_detail(&Object::new().into()), None);
    }

    #[wasm_bindgen_test]
    fn zome_call_request_shape() {
        let call = ZomeCall::new(cell(2), "file_storage", "announce_as_provider")
            .with_payload(json!({ "limit": 3 }));
        let request = zome_call_to_js(&call).unwrap();

        let get = |key: &str| Reflect::get(&request, &key.into()).unwrap();
        assert!(get("cap").is_null());
        assert_eq!(get("zome_name").as_string().unwrap(), "file_storage");
        assert_eq!(get("fn_name").as_string().unwrap(), "announce_as_provider");
        assert_eq!(json_from_js(&get("payload")).unwrap(), json!({ "limit": 3 }));
        assert_eq!(hash_from_js(&get("provenance")).unwrap(), *cell(2).agent_pub_key());
    }

    #[wasm_bindgen_test]
    fn error_messages() {
        assert_eq!(js_error_message(&JsValue::from_str("refused")), "refused");
        assert_eq!(
            js_error_message(&js_sys::Error::new("socket closed").into()),
            "socket closed"
        );

        let thrown = Object::new();
        Reflect::set(&thrown, &"message".into(), &"Timeout".into()).unwrap();
        assert_eq!(js_error_message(&thrown.into()), "Timeout");
    }
}
