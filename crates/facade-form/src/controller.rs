//! Form controller
//!
//! Owns the live form, the profile catalog and the page state that reacts
//! to user actions and backend replies. The browser layer drives it: it
//! calls `begin_*` before a request, performs the request, and hands the
//! outcome to the matching `finish_*`.

use crate::api::{CalcPreviewRequest, FigureReport, InputsDir};
use crate::catalog::{ProfileCatalog, ProfileDataResponse, ProfileNamesResponse};
use crate::config::ClientConfig;
use crate::error::{BackendError, FormError, ParseError};
use crate::extract::extract;
use crate::form::{Form, ListRef};
use crate::hydrate::import_text;
use crate::yaml::to_yaml_string;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const STATUS_YAML_LOADED: &str = "YAML loaded into form";
pub const STATUS_PROCESSING: &str = "Processing...";
pub const STATUS_REPORT_DONE: &str = "Report generated successfully!";
pub const STATUS_FILE_UNREADABLE: &str = "Could not read the file.";
pub const FIGURE_NO_YAML: &str = "Error: Could not generate YAML from form data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// What the figure status panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FigureContent {
    Empty,
    Report { report: FigureReport },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigurePanel {
    /// Spinner visibility; the previous content stays on screen meanwhile
    pub checking: bool,
    pub content: FigureContent,
}

pub struct FormController {
    form: Form,
    catalog: ProfileCatalog,
    config: ClientConfig,
    status: Option<Status>,
    yaml_output: String,
    download_yaml: Option<String>,
    controls_enabled: bool,
    figures: FigurePanel,
    inputs_dir: Option<InputsDir>,
}

impl FormController {
    pub fn new(config: ClientConfig) -> Self {
        let catalog = ProfileCatalog::new();
        Self {
            form: Form::new(&catalog),
            catalog,
            config,
            status: None,
            yaml_output: String::new(),
            download_yaml: None,
            controls_enabled: true,
            figures: FigurePanel {
                checking: false,
                content: FigureContent::Empty,
            },
            inputs_dir: None,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// YAML text currently shown in the output pane.
    pub fn yaml_output(&self) -> &str {
        &self.yaml_output
    }

    /// Text offered by the download button, if it is enabled.
    pub fn download_yaml(&self) -> Option<&str> {
        self.download_yaml.as_deref()
    }

    /// Whether generate and report buttons accept clicks.
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn figures(&self) -> &FigurePanel {
        &self.figures
    }

    pub fn inputs_dir(&self) -> Option<&InputsDir> {
        self.inputs_dir.as_ref()
    }

    fn render_yaml(&self) -> String {
        to_yaml_string(&extract(&self.form))
    }

    // ------------------------------------------------------------------
    // YAML generation and import
    // ------------------------------------------------------------------

    /// Extract and serialize the form, show the text and arm the download
    /// button when the text is not blank.
    pub fn generate_yaml(&mut self) -> String {
        let yaml = self.render_yaml();
        self.yaml_output = yaml.clone();
        self.download_yaml = if yaml.trim().is_empty() {
            None
        } else {
            Some(yaml.clone())
        };
        debug!(bytes = yaml.len(), "YAML generated");
        yaml
    }

    /// Load imported file text. The form is untouched on failure.
    pub fn load_text(&mut self, text: &str) -> Result<(), ParseError> {
        match import_text(&mut self.form, text, &self.catalog) {
            Ok(()) => {
                info!("YAML loaded into form");
                self.status = Some(Status::new(STATUS_YAML_LOADED, StatusKind::Success));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load file");
                self.status = Some(Status::new(
                    format!("Failed to load file: {}", e),
                    StatusKind::Error,
                ));
                Err(e)
            }
        }
    }

    pub fn file_read_failed(&mut self) {
        self.status = Some(Status::new(STATUS_FILE_UNREADABLE, StatusKind::Error));
    }

    // ------------------------------------------------------------------
    // Report workflow
    // ------------------------------------------------------------------

    /// Start a report: returns the YAML to post, or `None` while a report
    /// is already pending.
    pub fn begin_report(&mut self) -> Option<String> {
        if !self.controls_enabled {
            debug!("report already pending");
            return None;
        }
        let yaml = self.render_yaml();
        self.yaml_output = yaml.clone();
        self.status = Some(Status::new(STATUS_PROCESSING, StatusKind::Processing));
        self.controls_enabled = false;
        Some(yaml)
    }

    pub fn finish_report(&mut self, result: Result<(), BackendError>) {
        self.status = Some(match result {
            Ok(()) => {
                info!("report generated");
                Status::new(STATUS_REPORT_DONE, StatusKind::Success)
            }
            Err(e) => {
                warn!(error = %e, "report generation failed");
                Status::new(format!("Failed: {}", e), StatusKind::Error)
            }
        });
    }

    /// Called once the re-enable delay has passed after `finish_report`.
    pub fn release_controls(&mut self) {
        self.controls_enabled = true;
    }

    // ------------------------------------------------------------------
    // Figure check
    // ------------------------------------------------------------------

    /// Start a figure check: returns the YAML to post, or `None` when the
    /// form produced no YAML (the panel then shows an error).
    pub fn begin_figure_check(&mut self) -> Option<String> {
        let yaml = self.render_yaml();
        if yaml.is_empty() {
            self.figures = FigurePanel {
                checking: false,
                content: FigureContent::Error {
                    message: FIGURE_NO_YAML.to_string(),
                },
            };
            return None;
        }
        self.figures.checking = true;
        Some(yaml)
    }

    pub fn finish_figure_check(&mut self, result: Result<FigureReport, BackendError>) {
        let content = match result {
            Ok(report) => {
                debug!(total = report.total, missing = report.missing, "figures checked");
                FigureContent::Report { report }
            }
            Err(e) => {
                warn!(error = %e, "figure check failed");
                FigureContent::Error {
                    message: format!("Error checking figures: {}", e),
                }
            }
        };
        self.figures = FigurePanel {
            checking: false,
            content,
        };
    }

    // ------------------------------------------------------------------
    // Catalog, preview and inputs directory
    // ------------------------------------------------------------------

    pub fn load_profile_names(&mut self, names: ProfileNamesResponse) {
        self.catalog.load_names(names);
        self.refresh_catalog_options();
    }

    pub fn load_profile_data(&mut self, data: ProfileDataResponse) {
        self.catalog.load_data(data);
        self.refresh_catalog_options();
    }

    fn refresh_catalog_options(&mut self) {
        for profile in &mut self.form.alum_profiles {
            profile.refresh_catalog_options(&self.catalog);
        }
    }

    /// Preview request for one instance, with catalog properties filled in.
    pub fn preview_request(
        &self,
        list: ListRef,
        index: usize,
    ) -> Result<CalcPreviewRequest, FormError> {
        let instance = self.form.instance(list, index)?;
        let mut payload = instance.to_mapping();
        self.catalog
            .fill_preview_payload(instance.kind(), &mut payload);
        Ok(CalcPreviewRequest::new(instance.kind(), payload))
    }

    pub fn set_inputs_dir(&mut self, dir: InputsDir) {
        self.inputs_dir = Some(dir);
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn add_instance(&mut self, list: ListRef) -> Result<usize, FormError> {
        self.form.add_instance(list, &self.catalog)
    }

    pub fn remove_instance(&mut self, list: ListRef, index: usize) -> Result<(), FormError> {
        self.form.remove_instance(list, index).map(|_| ())
    }

    pub fn set_discriminator(
        &mut self,
        list: ListRef,
        index: usize,
        value: &str,
    ) -> Result<(), FormError> {
        self.form
            .set_discriminator(list, index, value, &self.catalog)
    }

    pub fn set_field(
        &mut self,
        list: ListRef,
        index: usize,
        name: &str,
        value: &str,
        checked: bool,
    ) -> Result<(), FormError> {
        self.form
            .set_field(list, index, name, value, checked, &self.catalog)
    }

    pub fn set_simple(&mut self, name: &str, value: &str, checked: bool) -> Result<(), FormError> {
        self.form.set_simple(name, value, checked)
    }

    pub fn add_category(&mut self) -> usize {
        self.form.add_category(&self.catalog)
    }

    pub fn remove_category(&mut self, index: usize) -> Result<(), FormError> {
        self.form.remove_category(index).map(|_| ())
    }

    pub fn set_category_name(&mut self, index: usize, name: &str) -> Result<(), FormError> {
        self.form.set_category_name(index, name)
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Figure;
    use crate::templates::GroupKind;

    #[test]
    fn test_generate_arms_download() {
        let mut controller = FormController::default();
        assert!(controller.download_yaml().is_none());
        let yaml = controller.generate_yaml();
        assert!(yaml.starts_with("project_info:\n"));
        assert_eq!(controller.download_yaml(), Some(yaml.as_str()));
        assert_eq!(controller.yaml_output(), yaml);
    }

    #[test]
    fn test_load_text_status() {
        let mut controller = FormController::default();
        controller
            .load_text("project_info:\n  project_name: Tower A\n")
            .unwrap();
        assert_eq!(
            controller.status(),
            Some(&Status::new(STATUS_YAML_LOADED, StatusKind::Success))
        );

        assert!(controller.load_text("- not\n- a mapping\n").is_err());
        let status = controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.message.starts_with("Failed to load file: "));
        assert_eq!(
            controller
                .form()
                .simple_field("project_info.project_name")
                .unwrap()
                .value,
            "Tower A"
        );
    }

    #[test]
    fn test_report_workflow() {
        let mut controller = FormController::default();
        let yaml = controller.begin_report().unwrap();
        assert!(!yaml.is_empty());
        assert!(!controller.controls_enabled());
        assert_eq!(controller.status().unwrap().message, STATUS_PROCESSING);
        assert!(controller.begin_report().is_none());

        controller.finish_report(Err(BackendError::Rejected("Template missing".into())));
        assert_eq!(controller.status().unwrap().message, "Failed: Template missing");
        assert!(!controller.controls_enabled());

        controller.release_controls();
        assert!(controller.controls_enabled());
        controller.begin_report().unwrap();
        controller.finish_report(Ok(()));
        assert_eq!(
            controller.status(),
            Some(&Status::new(STATUS_REPORT_DONE, StatusKind::Success))
        );
    }

    #[test]
    fn test_figure_check_keeps_content_while_checking() {
        let mut controller = FormController::default();
        controller.begin_figure_check().unwrap();
        controller.finish_figure_check(Ok(FigureReport::from_figures(vec![Figure {
            name: "mwfrs.png".into(),
            category: "Wind".into(),
            exists: true,
        }])));

        controller.begin_figure_check().unwrap();
        assert!(controller.figures().checking);
        assert!(matches!(controller.figures().content, FigureContent::Report { .. }));

        controller.finish_figure_check(Err(BackendError::Status("Failed to check figures".into())));
        assert_eq!(
            controller.figures().content,
            FigureContent::Error {
                message: "Error checking figures: Failed to check figures".into()
            }
        );
        assert!(!controller.figures().checking);
    }

    #[test]
    fn test_preview_request_uses_catalog() {
        let mut controller = FormController::default();
        let data: ProfileDataResponse = serde_json::from_str(
            r#"{"alum_profiles": {"M 125x60x3": {"area": 1010}}}"#,
        )
        .unwrap();
        controller.load_profile_data(data);

        let list = ListRef::Top(GroupKind::AlumProfile);
        controller.set_discriminator(list, 0, "Pre-defined").unwrap();
        controller
            .set_field(list, 0, "profile_name", "M 125x60x3", false)
            .unwrap();

        let request = controller.preview_request(list, 0).unwrap();
        assert_eq!(request.item_type, "alum_profile");
        assert_eq!(request.payload["area"].to_field_text(), "1010");
    }

    #[test]
    fn test_catalog_load_updates_predefined_select() {
        let mut controller = FormController::default();
        let list = ListRef::Top(GroupKind::AlumProfile);
        controller.set_discriminator(list, 0, "Pre-defined").unwrap();
        controller.load_profile_names(ProfileNamesResponse {
            alum_profiles: vec!["Only One".into()],
            steel_profiles: vec![],
        });
        let field = controller
            .form()
            .instance(list, 0)
            .unwrap()
            .field("profile_name")
            .unwrap()
            .clone();
        assert_eq!(field.value, "Only One");
    }
}
