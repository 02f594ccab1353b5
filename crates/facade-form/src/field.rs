//! Live form fields
//!
//! A field is the Rust-side state behind one rendered control. JavaScript
//! receives these as descriptors and reports edits back by name.

use crate::document::{parse_number, Value};
use serde::{Deserialize, Serialize};

/// Input kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Text,
    Number,
    /// Text input holding `YYYY-MM-DD`
    Date,
    TextArea,
    Checkbox,
    Select { options: Vec<String> },
}

impl Control {
    pub fn select(options: &[&str]) -> Self {
        Control::Select {
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub label: String,
    pub control: Control,
    pub value: String,
    pub checked: bool,
}

impl Field {
    /// New blank field. Selects start on their first option, like a
    /// freshly rendered `<select>`.
    pub fn new(name: &str, label: &str, control: Control) -> Self {
        let value = match &control {
            Control::Select { options } => options.first().cloned().unwrap_or_default(),
            _ => String::new(),
        };
        Self {
            name: name.to_string(),
            label: label.to_string(),
            control,
            value,
            checked: false,
        }
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self.control, Control::Checkbox)
    }

    /// Value written into the document: checkboxes become `yes`/`no`,
    /// everything else is the raw text.
    pub fn extracted_value(&self) -> Value {
        if self.is_checkbox() {
            Value::from(if self.checked { "yes" } else { "no" })
        } else {
            Value::String(self.value.clone())
        }
    }

    /// Direct assignment, as a script setting `.value` on the control.
    ///
    /// A select given text that is not one of its options ends up empty.
    pub fn assign(&mut self, value: &Value) {
        if self.is_checkbox() {
            self.checked = value.is_checked_flag();
            return;
        }
        let text = value.to_field_text();
        self.value = match &self.control {
            Control::Select { options } if !options.contains(&text) => String::new(),
            _ => text,
        };
    }

    /// Assignment used for simple groups.
    ///
    /// Selects try an exact match first, then a numeric match so `3` picks
    /// an option `3.0`. With no match the current selection stays; `null`
    /// clears it.
    pub fn apply_simple(&mut self, value: &Value) {
        match &self.control {
            Control::Checkbox => self.checked = value.is_checked_flag(),
            Control::Select { .. } if value.is_null() => self.value.clear(),
            Control::Select { options } => {
                if let Some(option) = match_option(options, value) {
                    self.value = option;
                }
            }
            _ => self.value = value.to_field_text(),
        }
    }

    /// Edit coming from the page.
    pub fn set_from_input(&mut self, value: &str, checked: bool) {
        if self.is_checkbox() {
            self.checked = checked;
        } else {
            self.value = value.to_string();
        }
    }
}

fn match_option(options: &[String], value: &Value) -> Option<String> {
    let text = value.to_field_text();
    if let Some(exact) = options.iter().find(|o| **o == text) {
        return Some(exact.clone());
    }
    let wanted = value.as_f64()?;
    options
        .iter()
        .find(|o| parse_number(o) == Some(wanted))
        .cloned()
}
