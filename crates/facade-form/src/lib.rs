//! Façade report form builder
//!
//! This crate holds the form model behind the report input page:
//! - `extract` walks the live form into an ordered document
//! - `yaml` writes that document as YAML and reads YAML/JSON back
//! - `hydrate` redistributes an imported document onto the form
//! - `controller` ties it to the report and figure-check workflow

pub mod api;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod extract;
pub mod field;
pub mod form;
pub mod group;
pub mod hydrate;
pub mod templates;
pub mod yaml;

pub use catalog::ProfileCatalog;
pub use config::ClientConfig;
pub use controller::{FormController, Status, StatusKind};
pub use document::{Mapping, Value};
pub use error::{BackendError, FormError, ParseError};
pub use extract::extract;
pub use field::{Control, Field};
pub use form::{Category, Form, ListRef};
pub use group::GroupInstance;
pub use hydrate::{hydrate, import_text};
pub use templates::GroupKind;
pub use yaml::{parse_document, to_yaml_string};

/// Build the YAML text for a form.
pub fn form_to_yaml(form: &Form) -> String {
    to_yaml_string(&extract(form))
}
