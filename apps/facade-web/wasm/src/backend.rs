//! `fetch` calls to the report backend

use facade_form::BackendError;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Request, RequestInit, RequestMode, Response};

/// Best-effort text for a JavaScript error value.
pub fn js_error_message(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    js_sys::Reflect::get(err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}

fn network(err: JsValue) -> BackendError {
    BackendError::Network(js_error_message(&err))
}

async fn send(url: &str, method: &str, body: Option<&str>) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    response.dyn_into::<Response>()
}

/// POST a JSON body. Non-2xx responses are returned, not turned into errors.
pub async fn post_json(url: &str, body: &str) -> Result<Response, BackendError> {
    send(url, "POST", Some(body)).await.map_err(network)
}

pub async fn get(url: &str) -> Result<Response, BackendError> {
    send(url, "GET", None).await.map_err(network)
}

pub async fn response_text(response: &Response) -> Result<String, BackendError> {
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    Ok(text.as_string().unwrap_or_default())
}

pub async fn response_blob(response: &Response) -> Result<Blob, BackendError> {
    let blob = JsFuture::from(response.blob().map_err(network)?)
        .await
        .map_err(network)?;
    blob.dyn_into::<Blob>()
        .map_err(|_| BackendError::InvalidResponse("Expected a blob".to_string()))
}

/// GET a JSON document.
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, BackendError> {
    let response = get(url).await?;
    if !response.ok() {
        return Err(BackendError::Status(format!(
            "Server responded with {}",
            response.status()
        )));
    }
    let text = response_text(&response).await?;
    serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
}
