//! Browser timers
//!
//! `sleep` for awaiting a delay inside async flows, and `Timer` for
//! callbacks that must stop when the owner goes away.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window"))
}

/// Milliseconds since the epoch, for measuring elapsed time.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Resolve after `ms` milliseconds.
pub async fn sleep(ms: u32) -> Result<(), JsValue> {
    let window = window()?;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            &resolve,
            ms as i32,
        );
    });
    JsFuture::from(promise).await?;
    Ok(())
}

/// A scheduled callback, cancelled on drop.
pub struct Timer {
    handle: i32,
    repeating: bool,
    _callback: Closure<dyn FnMut()>,
}

impl Timer {
    /// Run `f` once after `ms` milliseconds.
    pub fn once(ms: u32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            ms as i32,
        )?;
        Ok(Self {
            handle,
            repeating: false,
            _callback: callback,
        })
    }

    /// Run `f` every `ms` milliseconds.
    pub fn every(ms: u32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let handle = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            ms as i32,
        )?;
        Ok(Self {
            handle,
            repeating: true,
            _callback: callback,
        })
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            if self.repeating {
                window.clear_interval_with_handle(self.handle);
            } else {
                window.clear_timeout_with_handle(self.handle);
            }
        }
    }
}
