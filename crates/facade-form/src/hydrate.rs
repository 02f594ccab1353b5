//! Document to form hydration

use crate::catalog::ProfileCatalog;
use crate::document::{Mapping, Value};
use crate::error::ParseError;
use crate::form::{Category, Form};
use crate::group::GroupInstance;
use crate::templates::{GroupKind, SIMPLE_GROUPS};
use crate::yaml;
use tracing::{debug, warn};

/// Parse `text` and load it into `form`. On a parse error the form is not
/// touched.
pub fn import_text(form: &mut Form, text: &str, catalog: &ProfileCatalog) -> Result<(), ParseError> {
    let doc = yaml::parse_document(text)?;
    hydrate(form, &doc, catalog);
    Ok(())
}

/// Load a parsed document into the form.
///
/// Simple groups are written field by field; fields the document does not
/// mention keep their values. Every repeated list is discarded and rebuilt
/// with one instance per incoming item, never fewer than one.
pub fn hydrate(form: &mut Form, doc: &Mapping, catalog: &ProfileCatalog) {
    for group in SIMPLE_GROUPS {
        match doc.get(group) {
            Some(Value::Mapping(values)) => hydrate_simple_group(form, group, values),
            Some(Value::Null) | None => {}
            Some(other) => warn!(group, found = other.kind_name(), "simple group is not a mapping"),
        }
    }

    form.alum_profiles = rebuild_list(GroupKind::AlumProfile, doc.get("alum_profiles"), catalog);
    form.steel_profiles = rebuild_list(GroupKind::SteelProfile, doc.get("steel_profiles"), catalog);
    form.categories = list_items(doc.get("categories"))
        .iter()
        .map(|data| rebuild_category(data, catalog))
        .collect();

    debug!(
        alum = form.alum_profiles.len(),
        steel = form.steel_profiles.len(),
        categories = form.categories.len(),
        "form hydrated"
    );
}

fn hydrate_simple_group(form: &mut Form, group: &str, values: &Mapping) {
    for (key, value) in values {
        let name = format!("{}.{}", group, key);
        match form.simple_field_mut(&name) {
            Some(field) => field.apply_simple(value),
            None => debug!(field = %name, "no simple field for imported key"),
        }
    }
}

/// Items of an incoming list. Anything that is not a non-empty sequence
/// yields one blank item; non-mapping items count as blank.
fn list_items(value: Option<&Value>) -> Vec<Mapping> {
    let items = match value {
        Some(Value::Sequence(items)) if !items.is_empty() => items,
        _ => return vec![Mapping::new()],
    };
    items
        .iter()
        .map(|item| match item {
            Value::Mapping(map) => map.clone(),
            other => {
                warn!(found = other.kind_name(), "list item is not a mapping, using a blank item");
                Mapping::new()
            }
        })
        .collect()
}

fn rebuild_list(kind: GroupKind, value: Option<&Value>, catalog: &ProfileCatalog) -> Vec<GroupInstance> {
    list_items(value)
        .iter()
        .map(|data| {
            let mut instance = GroupInstance::new(kind, catalog);
            instance.hydrate(data, catalog);
            instance
        })
        .collect()
}

fn rebuild_category(data: &Mapping, catalog: &ProfileCatalog) -> Category {
    let mut category = Category::new(catalog);

    let name = data
        .get("category_name")
        .map(Value::to_field_text)
        .unwrap_or_default();
    if !name.is_empty() {
        category.name.value = name;
    }

    for kind in GroupKind::CATEGORY_ITEMS {
        if let Some(list) = category.list_mut(kind) {
            *list = rebuild_list(kind, data.get(kind.list_key()), catalog);
        }
    }
    category
}
