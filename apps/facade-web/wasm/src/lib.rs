//! WASM bindings for the façade report form
//!
//! The form model, YAML conversion and workflow state live in Rust;
//! JavaScript renders the field descriptors and forwards DOM events.
//!
//! ## Architecture
//!
//! - Form state, hydration and YAML in `facade-form`
//! - `FacadeSession` wraps the controller and owns timers
//! - `fetch` calls and downloads through `web-sys`
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { FacadeSession } from './pkg/facade_web_wasm.js';
//!
//! await init();
//!
//! const session = new FacadeSession({ figure_refresh_interval_ms: 15000 });
//! session.setChangeCallback((part) => render(part, session));
//! await session.loadProfiles();
//! session.startFigurePolling();
//!
//! session.setDiscriminator("categories.0.glass_units", 0, "dgu");
//! session.setItemField("categories.0.glass_units", 0, "thickness1", "6", false);
//! const yaml = session.generateYaml();
//! await session.generateReport();
//! ```

pub mod backend;
pub mod download;
pub mod session;
pub mod timer;

use facade_form::{parse_document, to_yaml_string};
use wasm_bindgen::prelude::*;

pub use session::FacadeSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"facade-web wasm initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Re-serialize YAML or JSON text in the form's YAML dialect
#[wasm_bindgen]
pub fn normalize_yaml(text: &str) -> Result<String, JsValue> {
    convert(text).map_err(|e| JsValue::from_str(&e))
}

fn convert(text: &str) -> Result<String, String> {
    let document = parse_document(text).map_err(|e| e.to_string())?;
    Ok(to_yaml_string(&document))
}
