//! # Halyard WASM
//!
//! WebAssembly bindings for the Halyard light client verifier.
//! This crate bridges `halyard-core`'s pure Rust verification logic to
//! JavaScript via `wasm-bindgen`.
//!
//! ## Architecture
//!
//! - All signature and hash verification happens in Rust/WASM (never in JS)
//! - Inputs arrive as JSON (headers, commits, validator sets), outputs leave as JS objects
//! - Stateless: the JS side keeps the trusted header and feeds it back on every call

mod request;

pub use request::{handle_verify, VerifyRequest, VerifyResponse};

use wasm_bindgen::prelude::*;

/// Set up panic hook on WASM initialization.
/// This ensures Rust panics are logged to the browser console with full stack traces.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Verify an untrusted header against a trusted one.
///
/// `request_json` is a JSON-encoded `VerifyRequest`; `now` is an RFC 3339
/// timestamp. Returns a `VerifyResponse` object. A rejected header is not an
/// exception: check `verified` and `error_kind`.
#[wasm_bindgen(js_name = verifyHeader)]
pub fn verify_header(request_json: &str, now: &str) -> Result<JsValue, JsValue> {
    let now = request::parse_now(now).map_err(|e| JsValue::from_str(&e))?;
    respond(request_json, now)
}

/// Same as `verifyHeader`, using the browser clock (`Date.now()`) as the current time.
#[wasm_bindgen(js_name = verifyHeaderNow)]
pub fn verify_header_now(request_json: &str) -> Result<JsValue, JsValue> {
    let now = request::now_from_unix_millis(js_sys::Date::now()).map_err(|e| JsValue::from_str(&e))?;
    respond(request_json, now)
}

fn respond(request_json: &str, now: time::OffsetDateTime) -> Result<JsValue, JsValue> {
    let response = handle_verify(request_json, now).map_err(|e| JsValue::from_str(&e))?;

    if response.verified {
        log_to_console(&format!(
            "[Halyard] Header {} verified from trusted height {}",
            response.untrusted_height, response.trusted_height
        ));
    } else {
        log_to_console(&format!(
            "[Halyard] Header {} rejected: {}",
            response.untrusted_height,
            response.error.as_deref().unwrap_or("unknown error")
        ));
    }

    serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn log_to_console(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
