//! Backend wire types and response interpretation
//!
//! The browser crate performs the HTTP calls; everything that decides what a
//! response means for the page lives here so it can be tested natively.

use crate::document::Mapping;
use crate::error::BackendError;
use crate::templates::GroupKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const GENERATE_REPORT: &str = "/generate_report";
pub const CHECK_FIGURES: &str = "/check_figures";
pub const CALC_PREVIEW: &str = "/calc_preview";
pub const PROFILE_NAMES: &str = "/get_profile_names";
pub const PROFILE_DATA: &str = "/get_profile_data";
pub const INPUTS_DIR: &str = "/get_inputs_dir";
pub const FOLDER_PICKER: &str = "/open_folder_picker";

pub const DEFAULT_REPORT_FILENAME: &str = "report.pdf";
pub const YAML_DOWNLOAD_FILENAME: &str = "input.yaml";
pub const YAML_MIME_TYPE: &str = "text/yaml";

/// Body of `/generate_report` and `/check_figures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlRequest {
    pub yaml_content: String,
}

impl YamlRequest {
    pub fn new(yaml_content: impl Into<String>) -> Self {
        Self {
            yaml_content: yaml_content.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, BackendError> {
        serde_json::to_string(self).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Error for a failed `/generate_report` call: the JSON `error` field when
/// the body carries one, otherwise the HTTP status.
pub fn report_error(status: u16, body: Option<&str>) -> BackendError {
    let message = body
        .and_then(|text| serde_json::from_str::<ErrorBody>(text).ok())
        .and_then(|body| body.error)
        .filter(|msg| !msg.is_empty());
    match message {
        Some(msg) => BackendError::Rejected(msg),
        None => BackendError::Status(format!("Server responded with {}", status)),
    }
}

/// Download name for the report PDF, taken from the project name in the
/// YAML text.
pub fn report_filename(yaml: &str) -> String {
    let Some(raw) = find_project_name(yaml) else {
        return DEFAULT_REPORT_FILENAME.to_string();
    };
    let name = raw.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        return DEFAULT_REPORT_FILENAME.to_string();
    }
    if name.to_lowercase().ends_with(".pdf") {
        name
    } else {
        format!("{}_report.pdf", name)
    }
}

fn find_project_name(yaml: &str) -> Option<String> {
    let lines: Vec<&str> = yaml.lines().collect();

    if let Some(value) = lines
        .iter()
        .find_map(|line| line.trim().strip_prefix("project_info.project_name:"))
    {
        return Some(unquote(value.trim()));
    }

    let start = lines
        .iter()
        .position(|line| line.trim_end() == "project_info:")?;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(' ') {
            break;
        }
        let Some(value) = line.trim().strip_prefix("project_name:") else {
            continue;
        };
        let value = value.trim();
        if value == "|-" || value == "|" {
            return lines.get(i + 1).map(|next| next.trim().to_string());
        }
        return Some(unquote(value));
    }
    None
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].replace("''", "'")
    } else if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

// ============================================================================
// Figure check
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CheckFiguresResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub figures: Option<Vec<Figure>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureGroup {
    pub category: String,
    pub figures: Vec<Figure>,
}

/// Grouped figure list with its summary counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureReport {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
    pub groups: Vec<FigureGroup>,
}

/// Categories shown first, in this order; the rest follow in first-seen order.
const FIGURE_CATEGORY_ORDER: [&str; 3] = ["Wind", "Profiles", "Categories"];

impl FigureReport {
    pub fn from_figures(figures: Vec<Figure>) -> Self {
        let total = figures.len();
        let found = figures.iter().filter(|f| f.exists).count();

        let mut grouped: IndexMap<String, Vec<Figure>> = IndexMap::new();
        for figure in figures {
            grouped
                .entry(figure.category.clone())
                .or_default()
                .push(figure);
        }

        let mut groups = Vec::with_capacity(grouped.len());
        for category in FIGURE_CATEGORY_ORDER {
            if let Some(figures) = grouped.shift_remove(category) {
                groups.push(FigureGroup {
                    category: category.to_string(),
                    figures,
                });
            }
        }
        groups.extend(
            grouped
                .into_iter()
                .map(|(category, figures)| FigureGroup { category, figures }),
        );

        Self {
            total,
            found,
            missing: total - found,
            groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Interpret a `/check_figures` exchange.
pub fn figure_result(status_ok: bool, body: &str) -> Result<FigureReport, BackendError> {
    if !status_ok {
        return Err(BackendError::Status("Failed to check figures".to_string()));
    }
    let response: CheckFiguresResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    match response {
        CheckFiguresResponse {
            success: true,
            figures: Some(figures),
            ..
        } => Ok(FigureReport::from_figures(figures)),
        CheckFiguresResponse { error, .. } => Err(BackendError::Rejected(
            error.unwrap_or_else(|| "Unknown error".to_string()),
        )),
    }
}

// ============================================================================
// Calculation preview
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcPreviewRequest {
    pub item_type: String,
    pub payload: Mapping,
}

impl CalcPreviewRequest {
    pub fn new(kind: GroupKind, payload: Mapping) -> Self {
        Self {
            item_type: preview_item_type(kind).to_string(),
            payload,
        }
    }

    pub fn to_json(&self) -> Result<String, BackendError> {
        serde_json::to_string(self).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// `item_type` sent for each group.
pub fn preview_item_type(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::AlumProfile => "alum_profile",
        GroupKind::SteelProfile => "steel_profile",
        GroupKind::GlassUnit => "glass_unit",
        GroupKind::Frame => "frame",
        GroupKind::Connection => "connection",
        GroupKind::Anchorage => "anchorage",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalcPreviewResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Server-rendered preview fragment.
pub fn preview_result(status_ok: bool, status: u16, body: &str) -> Result<String, BackendError> {
    let parsed = serde_json::from_str::<CalcPreviewResponse>(body);
    match (status_ok, parsed) {
        (
            true,
            Ok(CalcPreviewResponse {
                success: true,
                html: Some(html),
                ..
            }),
        ) => Ok(html),
        (_, Ok(CalcPreviewResponse { error: Some(e), .. })) => Err(BackendError::Rejected(e)),
        (true, Ok(_)) => Err(BackendError::Rejected("Unknown error".to_string())),
        (true, Err(e)) => Err(BackendError::InvalidResponse(e.to_string())),
        (false, _) => Err(BackendError::Status(format!(
            "Server responded with {}",
            status
        ))),
    }
}

// ============================================================================
// Inputs directory
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputsDirResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Where figure assets are read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputsDir {
    pub directory: String,
    pub is_default: bool,
}

pub fn inputs_dir_result(body: &str) -> Result<InputsDir, BackendError> {
    let response: InputsDirResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    match response {
        InputsDirResponse {
            success: true,
            directory: Some(directory),
            is_default,
            ..
        } if !directory.is_empty() => Ok(InputsDir {
            directory,
            is_default,
        }),
        InputsDirResponse { error, .. } => Err(BackendError::Rejected(
            error.unwrap_or_else(|| "No inputs directory".to_string()),
        )),
    }
}

/// `/open_folder_picker` only reports whether a folder was chosen; the new
/// directory is read back from `/get_inputs_dir`.
pub fn folder_picker_result(body: &str) -> Result<bool, BackendError> {
    let response: InputsDirResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    match (response.success, response.error) {
        (true, _) => Ok(true),
        (false, Some(error)) => Err(BackendError::Rejected(error)),
        (false, None) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_filename_from_nested_key() {
        let yaml = "project_info:\n  client_name: ACME\n  project_name: Tower A\ninclude:\n";
        assert_eq!(report_filename(yaml), "Tower_A_report.pdf");
    }

    #[test]
    fn test_report_filename_from_dotted_line() {
        assert_eq!(
            report_filename("project_info.project_name:   Site   B  \n"),
            "Site_B_report.pdf"
        );
        assert_eq!(report_filename("project_info.project_name: final.PDF\n"), "final.PDF");
    }

    #[test]
    fn test_report_filename_unquotes() {
        let yaml = "project_info:\n  project_name: 'Block 7 (East)'\n";
        assert_eq!(report_filename(yaml), "Block_7_(East)_report.pdf");
    }

    #[test]
    fn test_report_filename_default() {
        assert_eq!(report_filename("wind:\n  project_name: nope\n"), "report.pdf");
        assert_eq!(report_filename("project_info:\n  project_name: \n"), "report.pdf");
        assert_eq!(report_filename(""), "report.pdf");
    }

    #[test]
    fn test_report_error_messages() {
        assert_eq!(
            report_error(500, Some(r#"{"error": "Template missing"}"#)).to_string(),
            "Template missing"
        );
        assert_eq!(
            report_error(502, Some("<html>bad gateway</html>")).to_string(),
            "Server responded with 502"
        );
        assert_eq!(report_error(404, None).to_string(), "Server responded with 404");
    }

    #[test]
    fn test_figures_grouped_in_fixed_order() {
        let figure = |name: &str, category: &str, exists| Figure {
            name: name.into(),
            category: category.into(),
            exists,
        };
        let report = FigureReport::from_figures(vec![
            figure("1-ref-elev.png", "Category 1", false),
            figure("profile.png", "Profiles", true),
            figure("mwfrs.png", "Wind", true),
            figure("sap.png", "Category 1", true),
            figure("rfem.png", "Glass", false),
        ]);
        let order: Vec<&str> = report.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(order, vec!["Wind", "Profiles", "Category 1", "Glass"]);
        assert_eq!((report.total, report.found, report.missing), (5, 3, 2));
        assert_eq!(report.groups[2].figures.len(), 2);
    }

    #[test]
    fn test_figure_result_errors() {
        assert_eq!(
            figure_result(false, "").unwrap_err().to_string(),
            "Failed to check figures"
        );
        assert_eq!(
            figure_result(true, r#"{"success": false}"#).unwrap_err().to_string(),
            "Unknown error"
        );
        assert_eq!(
            figure_result(true, r#"{"success": false, "error": "Invalid YAML"}"#)
                .unwrap_err()
                .to_string(),
            "Invalid YAML"
        );
        let report = figure_result(true, r#"{"success": true, "figures": []}"#).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_preview_result() {
        assert_eq!(
            preview_result(true, 200, r#"{"success": true, "html": "<p>ok</p>"}"#).unwrap(),
            "<p>ok</p>"
        );
        assert_eq!(
            preview_result(false, 400, r#"{"success": false, "error": "Bad payload"}"#)
                .unwrap_err()
                .to_string(),
            "Bad payload"
        );
        assert_eq!(
            preview_result(false, 500, "oops").unwrap_err().to_string(),
            "Server responded with 500"
        );
    }

    #[test]
    fn test_inputs_dir_responses() {
        let dir = inputs_dir_result(r#"{"success": true, "directory": "/data/in", "is_default": true}"#)
            .unwrap();
        assert_eq!(
            dir,
            InputsDir {
                directory: "/data/in".into(),
                is_default: true
            }
        );
        assert!(inputs_dir_result(r#"{"success": false, "error": "no dir"}"#).is_err());
        assert_eq!(folder_picker_result(r#"{"success": true}"#), Ok(true));
        assert_eq!(folder_picker_result(r#"{"success": false}"#), Ok(false));
        assert!(folder_picker_result(r#"{"success": false, "error": "cancelled"}"#).is_err());
    }

    #[test]
    fn test_request_bodies() {
        assert_eq!(
            YamlRequest::new("a: 1\n").to_json().unwrap(),
            r#"{"yaml_content":"a: 1\n"}"#
        );
        let mut payload = Mapping::new();
        payload.insert("length".into(), "1200".into());
        assert_eq!(
            CalcPreviewRequest::new(GroupKind::GlassUnit, payload).to_json().unwrap(),
            r#"{"item_type":"glass_unit","payload":{"length":"1200"}}"#
        );
    }
}
