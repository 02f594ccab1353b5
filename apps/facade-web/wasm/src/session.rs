//! Stateful form session
//!
//! Holds the form controller in Rust. JavaScript renders what the getters
//! return, forwards input events, and re-renders when the change callback
//! fires with the name of the part that changed (`form`, `status`, `yaml`,
//! `controls`, `figures`, `inputsDir`).

use crate::backend::{self, js_error_message};
use crate::download;
use crate::timer::{self, Timer};
use facade_form::api::{self, FigureReport, YamlRequest};
use facade_form::catalog::{ProfileDataResponse, ProfileNamesResponse};
use facade_form::{BackendError, ClientConfig, FormController, ListRef};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Shared handle to the optional JS change callback.
#[derive(Clone, Default)]
struct Notifier(Rc<RefCell<Option<js_sys::Function>>>);

impl Notifier {
    fn notify(&self, part: &str) {
        if let Some(callback) = self.0.borrow().as_ref() {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(part));
        }
    }
}

type Shared = Rc<RefCell<FormController>>;

/// Form session that keeps all form state in Rust memory
#[wasm_bindgen]
pub struct FacadeSession {
    inner: Shared,
    notifier: Notifier,
    startup_timers: Rc<RefCell<Vec<Timer>>>,
    poll: Rc<RefCell<Option<Timer>>>,
}

#[wasm_bindgen]
impl FacadeSession {
    /// Create a session. `config` may be `undefined` or a partial
    /// `ClientConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FacadeSession, JsValue> {
        let config: ClientConfig = if config.is_undefined() || config.is_null() {
            ClientConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Ok(Self {
            inner: Rc::new(RefCell::new(FormController::new(config))),
            notifier: Notifier::default(),
            startup_timers: Rc::new(RefCell::new(Vec::new())),
            poll: Rc::new(RefCell::new(None)),
        })
    }

    /// Callback signature: (part: string) => void
    #[wasm_bindgen(js_name = setChangeCallback)]
    pub fn set_change_callback(&self, callback: js_sys::Function) {
        *self.notifier.0.borrow_mut() = Some(callback);
    }

    // ------------------------------------------------------------------
    // State for rendering
    // ------------------------------------------------------------------

    /// Field descriptors for every group and instance
    #[wasm_bindgen(js_name = getForm)]
    pub fn get_form(&self) -> Result<JsValue, JsValue> {
        to_js_value(self.inner.borrow().form())
    }

    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.borrow().status())
    }

    #[wasm_bindgen(js_name = getFigurePanel)]
    pub fn get_figure_panel(&self) -> Result<JsValue, JsValue> {
        to_js_value(self.inner.borrow().figures())
    }

    #[wasm_bindgen(js_name = getInputsDir)]
    pub fn get_inputs_dir(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.inner.borrow().inputs_dir())
    }

    #[wasm_bindgen(js_name = getYamlOutput)]
    pub fn get_yaml_output(&self) -> String {
        self.inner.borrow().yaml_output().to_string()
    }

    #[wasm_bindgen(js_name = canDownload)]
    pub fn can_download(&self) -> bool {
        self.inner.borrow().download_yaml().is_some()
    }

    #[wasm_bindgen(js_name = controlsEnabled)]
    pub fn controls_enabled(&self) -> bool {
        self.inner.borrow().controls_enabled()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Edit a `project_info.*`, `wind.*` or `include.*` field
    #[wasm_bindgen(js_name = setSimpleField)]
    pub fn set_simple_field(&self, name: &str, value: &str, checked: bool) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_simple(name, value, checked)
            .map_err(to_js)
    }

    /// Append a blank instance to `list` (e.g. `alum_profiles`,
    /// `categories.0.glass_units`) and return its index
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&self, list: &str) -> Result<usize, JsValue> {
        let list = ListRef::parse(list).map_err(to_js)?;
        let index = self.inner.borrow_mut().add_instance(list).map_err(to_js)?;
        self.notifier.notify("form");
        Ok(index)
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, list: &str, index: usize) -> Result<(), JsValue> {
        let list = ListRef::parse(list).map_err(to_js)?;
        self.inner
            .borrow_mut()
            .remove_instance(list, index)
            .map_err(to_js)?;
        self.notifier.notify("form");
        Ok(())
    }

    /// Change a discriminator; the dependent fields are rebuilt
    #[wasm_bindgen(js_name = setDiscriminator)]
    pub fn set_discriminator(&self, list: &str, index: usize, value: &str) -> Result<(), JsValue> {
        let list = ListRef::parse(list).map_err(to_js)?;
        self.inner
            .borrow_mut()
            .set_discriminator(list, index, value)
            .map_err(to_js)?;
        self.notifier.notify("form");
        Ok(())
    }

    #[wasm_bindgen(js_name = setItemField)]
    pub fn set_item_field(
        &self,
        list: &str,
        index: usize,
        name: &str,
        value: &str,
        checked: bool,
    ) -> Result<(), JsValue> {
        let list = ListRef::parse(list).map_err(to_js)?;
        self.inner
            .borrow_mut()
            .set_field(list, index, name, value, checked)
            .map_err(to_js)?;
        if list.is_discriminator(name) {
            self.notifier.notify("form");
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = addCategory)]
    pub fn add_category(&self) -> usize {
        let index = self.inner.borrow_mut().add_category();
        self.notifier.notify("form");
        index
    }

    #[wasm_bindgen(js_name = removeCategory)]
    pub fn remove_category(&self, index: usize) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .remove_category(index)
            .map_err(to_js)?;
        self.notifier.notify("form");
        Ok(())
    }

    #[wasm_bindgen(js_name = setCategoryName)]
    pub fn set_category_name(&self, index: usize, name: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_category_name(index, name)
            .map_err(to_js)
    }

    // ------------------------------------------------------------------
    // YAML
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = generateYaml)]
    pub fn generate_yaml(&self) -> String {
        let yaml = self.inner.borrow_mut().generate_yaml();
        self.notifier.notify("yaml");
        yaml
    }

    /// Save the last generated YAML as `input.yaml`
    #[wasm_bindgen(js_name = downloadYaml)]
    pub fn download_yaml(&self) -> Result<(), JsValue> {
        let yaml = self.inner.borrow().download_yaml().map(str::to_string);
        match yaml {
            Some(text) => {
                download::download_text(&text, api::YAML_DOWNLOAD_FILENAME, api::YAML_MIME_TYPE)
            }
            None => Ok(()),
        }
    }

    /// Import YAML or JSON text into the form
    #[wasm_bindgen(js_name = loadText)]
    pub fn load_text(&self, text: &str) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().load_text(text);
        self.notifier.notify("form");
        self.notifier.notify("status");
        result.map_err(to_js)
    }

    /// Read a picked file and import it
    #[wasm_bindgen(js_name = loadFile)]
    pub async fn load_file(&self, file: web_sys::File) -> Result<(), JsValue> {
        let text = match JsFuture::from(file.text()).await {
            Ok(text) => text.as_string().unwrap_or_default(),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to read file: {}", js_error_message(&e)).into());
                self.inner.borrow_mut().file_read_failed();
                self.notifier.notify("status");
                return Err(e);
            }
        };
        self.load_text(&text)
    }

    // ------------------------------------------------------------------
    // Backend workflows
    // ------------------------------------------------------------------

    /// Post the form to `/generate_report` and download the PDF
    #[wasm_bindgen(js_name = generateReport)]
    pub async fn generate_report(&self) -> Result<(), JsValue> {
        run_report(self.inner.clone(), self.notifier.clone()).await
    }

    /// Run one figure check now
    #[wasm_bindgen(js_name = checkFigures)]
    pub async fn check_figures(&self) {
        run_figure_check(self.inner.clone(), self.notifier.clone()).await;
    }

    /// Schedule the first figure check and the periodic refresh
    #[wasm_bindgen(js_name = startFigurePolling)]
    pub fn start_figure_polling(&self) -> Result<(), JsValue> {
        self.stop_figure_polling();
        let config = self.inner.borrow().config().clone();

        let inner = self.inner.clone();
        let notifier = self.notifier.clone();
        let check = Rc::new(move || {
            spawn_local(run_figure_check(inner.clone(), notifier.clone()));
        });

        let first = check.clone();
        let first_check = Timer::once(config.initial_figure_check_delay_ms, move || (*first)())?;

        let poll = self.poll.clone();
        let interval_ms = config.figure_refresh_interval_ms;
        let start_refresh = Timer::once(config.auto_refresh_start_delay_ms, move || {
            let tick = check.clone();
            match Timer::every(interval_ms, move || (*tick)()) {
                Ok(timer) => *poll.borrow_mut() = Some(timer),
                Err(e) => web_sys::console::error_1(&e),
            }
        })?;

        self.startup_timers
            .borrow_mut()
            .extend([first_check, start_refresh]);
        Ok(())
    }

    #[wasm_bindgen(js_name = stopFigurePolling)]
    pub fn stop_figure_polling(&self) {
        self.startup_timers.borrow_mut().clear();
        self.poll.borrow_mut().take();
    }

    /// Fetch profile names and records into the catalog
    #[wasm_bindgen(js_name = loadProfiles)]
    pub async fn load_profiles(&self) {
        let config = self.inner.borrow().config().clone();

        match backend::get_json::<ProfileNamesResponse>(&config.url(api::PROFILE_NAMES)).await {
            Ok(names) => self.inner.borrow_mut().load_profile_names(names),
            Err(e) => web_sys::console::warn_1(&format!("Could not load profile names: {}", e).into()),
        }
        match backend::get_json::<ProfileDataResponse>(&config.url(api::PROFILE_DATA)).await {
            Ok(data) => self.inner.borrow_mut().load_profile_data(data),
            Err(e) => web_sys::console::warn_1(&format!("Could not load profile data: {}", e).into()),
        }
        self.notifier.notify("form");
    }

    /// Ask the backend for the preview fragment of one instance
    #[wasm_bindgen(js_name = calcPreview)]
    pub async fn calc_preview(&self, list: String, index: usize) -> Result<String, JsValue> {
        let list = ListRef::parse(&list).map_err(to_js)?;
        let (request, config) = {
            let controller = self.inner.borrow();
            let request = controller.preview_request(list, index).map_err(to_js)?;
            (request, controller.config().clone())
        };
        let body = request.to_json().map_err(to_js)?;

        let response = backend::post_json(&config.url(api::CALC_PREVIEW), &body)
            .await
            .map_err(to_js)?;
        let text = backend::response_text(&response).await.map_err(to_js)?;
        api::preview_result(response.ok(), response.status(), &text).map_err(to_js)
    }

    /// Read the current inputs directory from the backend
    #[wasm_bindgen(js_name = loadInputsDir)]
    pub async fn load_inputs_dir(&self) -> Result<JsValue, JsValue> {
        let config = self.inner.borrow().config().clone();
        let dir = fetch_inputs_dir(&config).await.map_err(to_js)?;
        if !dir.is_default {
            web_sys::console::log_1(&format!("Using inputs directory: {}", dir.directory).into());
        }
        self.inner.borrow_mut().set_inputs_dir(dir.clone());
        self.notifier.notify("inputsDir");
        to_js_value(&dir)
    }

    /// Open the backend's folder picker, then re-read the directory.
    /// Resolves to `null` when no folder was chosen.
    #[wasm_bindgen(js_name = pickInputsDir)]
    pub async fn pick_inputs_dir(&self) -> Result<JsValue, JsValue> {
        let config = self.inner.borrow().config().clone();
        let response = backend::get(&config.url(api::FOLDER_PICKER))
            .await
            .map_err(to_js)?;
        let text = backend::response_text(&response).await.map_err(to_js)?;
        if !api::folder_picker_result(&text).map_err(to_js)? {
            return Ok(JsValue::NULL);
        }
        self.load_inputs_dir().await
    }
}

async fn fetch_inputs_dir(config: &ClientConfig) -> Result<api::InputsDir, BackendError> {
    let response = backend::get(&config.url(api::INPUTS_DIR)).await?;
    let text = backend::response_text(&response).await?;
    api::inputs_dir_result(&text)
}

async fn run_report(inner: Shared, notifier: Notifier) -> Result<(), JsValue> {
    let (yaml, config) = {
        let mut controller = inner.borrow_mut();
        match controller.begin_report() {
            Some(yaml) => (yaml, controller.config().clone()),
            None => return Ok(()),
        }
    };
    notifier.notify("yaml");
    notifier.notify("status");
    notifier.notify("controls");

    let result = request_report(&config, &yaml).await;
    if let Err(e) = &result {
        web_sys::console::error_1(&format!("Error during report generation: {}", e).into());
    }
    inner.borrow_mut().finish_report(result);
    notifier.notify("status");

    // Controls are released even when the timer cannot be scheduled.
    let delayed = timer::sleep(config.controls_reenable_delay_ms).await;
    inner.borrow_mut().release_controls();
    notifier.notify("controls");
    delayed
}

async fn request_report(config: &ClientConfig, yaml: &str) -> Result<(), BackendError> {
    let body = YamlRequest::new(yaml).to_json()?;
    let response = backend::post_json(&config.url(api::GENERATE_REPORT), &body).await?;

    if !response.ok() {
        let text = backend::response_text(&response).await.ok();
        return Err(api::report_error(response.status(), text.as_deref()));
    }

    let blob = backend::response_blob(&response).await?;
    download::download_blob(&blob, &api::report_filename(yaml))
        .map_err(|e| BackendError::Network(js_error_message(&e)))
}

async fn run_figure_check(inner: Shared, notifier: Notifier) {
    let (yaml, config) = {
        let mut controller = inner.borrow_mut();
        let yaml = controller.begin_figure_check();
        (yaml, controller.config().clone())
    };
    notifier.notify("figures");
    let Some(yaml) = yaml else {
        return;
    };

    let started = timer::now_ms();
    let result = request_figures(&config, &yaml).await;

    let wait = config.spinner_remaining_ms(timer::now_ms() - started, result.is_ok());
    if wait > 0 {
        let _ = timer::sleep(wait).await;
    }
    if let Err(e) = &result {
        web_sys::console::error_1(&format!("Error checking figures: {}", e).into());
    }
    inner.borrow_mut().finish_figure_check(result);
    notifier.notify("figures");
}

async fn request_figures(config: &ClientConfig, yaml: &str) -> Result<FigureReport, BackendError> {
    let body = YamlRequest::new(yaml).to_json()?;
    let response = backend::post_json(&config.url(api::CHECK_FIGURES), &body).await?;
    let ok = response.ok();
    let text = if ok {
        backend::response_text(&response).await?
    } else {
        String::new()
    };
    api::figure_result(ok, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_paths_from_js() {
        assert!(ListRef::parse("alum_profiles").is_ok());
        assert!(ListRef::parse("categories.0.connections").is_ok());
        assert!(ListRef::parse("categories").is_err());
    }

    #[test]
    fn test_error_text_passthrough() {
        let err = facade_form::FormError::CategoryOutOfBounds(2);
        assert_eq!(err.to_string(), "Category index 2 out of bounds");
    }
}
