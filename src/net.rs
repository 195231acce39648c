//! Gateway endpoints: WebSocket address derivation and the liveness probe.

use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Realtime chat path on the gateway.
pub const WS_CHAT_PATH: &str = "/api/ws/chat";

/// Liveness probe path on the gateway.
pub const HELLO_PATH: &str = "/api/hello";

/// Body of a successful `GET /api/hello`.
#[derive(Debug, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

/// Derive the realtime endpoint from the configured HTTP base address:
/// http→ws, https→wss, same authority, fixed chat path. A base without a
/// scheme is treated as plain http.
pub fn ws_endpoint(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let (scheme, authority) = if let Some(rest) = base.strip_prefix("https://") {
        ("wss", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        ("ws", rest)
    } else {
        ("ws", base)
    };
    format!("{scheme}://{authority}{WS_CHAT_PATH}")
}

/// Probe the gateway once and return its greeting. Fire-and-forget from the
/// caller's perspective; failures map to the localized "connection failed"
/// string at the call site and are never retried.
pub async fn fetch_hello(base: &str) -> Result<String, JsValue> {
    let url = format!("{}{}", base.trim().trim_end_matches('/'), HELLO_PATH);

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(&url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str("hello probe failed"));
    }
    let body = JsFuture::from(response.text()?).await?;
    let text = body.as_string().unwrap_or_default();
    let hello: HelloResponse =
        serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(hello.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_base_maps_to_ws() {
        assert_eq!(
            ws_endpoint("http://localhost:8080"),
            "ws://localhost:8080/api/ws/chat"
        );
    }

    #[test]
    fn https_base_maps_to_wss() {
        assert_eq!(
            ws_endpoint("https://api.example.com"),
            "wss://api.example.com/api/ws/chat"
        );
    }

    #[test]
    fn bare_authority_defaults_to_ws() {
        assert_eq!(ws_endpoint("localhost:8080"), "ws://localhost:8080/api/ws/chat");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(
            ws_endpoint("http://localhost:8080/"),
            "ws://localhost:8080/api/ws/chat"
        );
    }
}
