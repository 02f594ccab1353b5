//! Form to document extraction

use crate::document::{Mapping, Value};
use crate::field::Field;
use crate::form::{Category, Form};
use crate::group::GroupInstance;
use tracing::debug;

/// Walk the live form and build a fresh document.
///
/// Top-level order is `project_info`, `include`, `alum_profiles`,
/// `steel_profiles`, `wind`, `categories`. Simple groups only appear when
/// the form has fields for them.
pub fn extract(form: &Form) -> Mapping {
    let mut doc = Mapping::new();

    insert_simple_group(&mut doc, form.simple_fields(), "project_info");
    insert_simple_group(&mut doc, form.simple_fields(), "include");

    doc.insert(
        "alum_profiles".to_string(),
        instances_to_value(form.alum_profiles()),
    );
    doc.insert(
        "steel_profiles".to_string(),
        instances_to_value(form.steel_profiles()),
    );

    insert_simple_group(&mut doc, form.simple_fields(), "wind");

    let categories = form.categories().iter().map(category_to_value).collect();
    doc.insert("categories".to_string(), Value::Sequence(categories));

    debug!(
        alum = form.alum_profiles().len(),
        steel = form.steel_profiles().len(),
        categories = form.categories().len(),
        "form extracted"
    );
    doc
}

fn insert_simple_group(doc: &mut Mapping, fields: &[Field], group: &str) {
    let prefix = format!("{}.", group);
    for field in fields.iter().filter(|f| f.name.starts_with(&prefix)) {
        insert_path(doc, &field.name, field.extracted_value());
    }
}

/// Assign `value` at a dot-delimited path, creating intermediate mappings.
///
/// An intermediate that already holds a scalar is replaced by a mapping.
pub fn insert_path(doc: &mut Mapping, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = doc;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !matches!(slot, Value::Mapping(_)) {
            *slot = Value::Mapping(Mapping::new());
        }
        current = match slot {
            Value::Mapping(inner) => inner,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}

fn instances_to_value(instances: &[GroupInstance]) -> Value {
    Value::Sequence(
        instances
            .iter()
            .map(|instance| Value::Mapping(instance.to_mapping()))
            .collect(),
    )
}

fn category_to_value(category: &Category) -> Value {
    let mut map = Mapping::new();
    map.insert(
        "category_name".to_string(),
        Value::String(category.name.value.clone()),
    );
    map.insert("glass_units".to_string(), instances_to_value(&category.glass_units));
    map.insert("frames".to_string(), instances_to_value(&category.frames));
    map.insert("connections".to_string(), instances_to_value(&category.connections));
    map.insert("anchorage".to_string(), instances_to_value(&category.anchorage));
    Value::Mapping(map)
}
