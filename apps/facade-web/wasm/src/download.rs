//! Browser downloads through a temporary object URL

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url};

/// Save `blob` as `filename` by clicking a temporary anchor.
pub fn download_blob(blob: &Blob, filename: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let body = document.body().ok_or("No body")?;

    let url = Url::create_object_url_with_blob(blob)?;
    let anchor = document.create_element("a")?;
    anchor.set_attribute("href", &url)?;
    anchor.set_attribute("download", filename)?;

    body.append_child(&anchor)?;
    anchor.dyn_ref::<HtmlElement>().ok_or("Anchor is not an HtmlElement")?.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// Save `text` as `filename` with the given MIME type.
pub fn download_text(text: &str, filename: &str, mime_type: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    download_blob(&blob, filename)
}
