//! Repeatable group instances
//!
//! An instance is a small state machine: its state is the discriminator
//! value and every transition replaces the dependent field set with the one
//! the template table gives for the new value.

use crate::catalog::ProfileCatalog;
use crate::document::{Mapping, Value};
use crate::error::FormError;
use crate::field::{Control, Field};
use crate::templates::GroupKind;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInstance {
    kind: GroupKind,
    /// Rendered first, ahead of the dependent fields
    discriminator: Option<Field>,
    fields: Vec<Field>,
}

impl GroupInstance {
    /// Blank instance on the template's default variant.
    pub fn new(kind: GroupKind, catalog: &ProfileCatalog) -> Self {
        let discriminator = kind.discriminator().map(|name| {
            let label = discriminator_label(name);
            Field::new(name, label, Control::select(kind.variants()))
        });
        let variant = kind.default_variant().unwrap_or_default();
        Self {
            kind,
            discriminator,
            fields: kind.build_fields(variant, catalog),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Current discriminator value, if the group has one.
    pub fn variant(&self) -> Option<&str> {
        self.discriminator.as_ref().map(|f| f.value.as_str())
    }

    /// Dependent fields in rendered order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.discriminator
            .iter()
            .chain(self.fields.iter())
            .find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Switch variant and rebuild the dependent fields, dropping their values.
    ///
    /// An unknown value clears the selection and leaves no dependent fields.
    /// Re-selecting the current value still rebuilds.
    pub fn set_discriminator(&mut self, value: &str, catalog: &ProfileCatalog) {
        let Some(discriminator) = self.discriminator.as_mut() else {
            debug!(kind = ?self.kind, "group has no discriminator, ignoring");
            return;
        };
        discriminator.assign(&Value::from(value));
        if discriminator.value.is_empty() {
            warn!(kind = ?self.kind, value, "unknown variant, dependent fields cleared");
        }
        self.fields = self.kind.build_fields(&discriminator.value, catalog);
    }

    /// Swap in the catalog's option list on catalog-backed selects, keeping
    /// the selection when the new list still offers it.
    pub fn refresh_catalog_options(&mut self, catalog: &ProfileCatalog) {
        if self.kind != GroupKind::AlumProfile || self.variant() != Some("Pre-defined") {
            return;
        }
        let options = catalog.alum_options();
        if let Some(field) = self.field_mut("profile_name") {
            if !options.contains(&field.value) {
                field.value = options.first().cloned().unwrap_or_default();
            }
            field.control = Control::Select { options };
        }
    }

    /// Edit from the page. Editing the discriminator goes through
    /// [`set_discriminator`](Self::set_discriminator).
    pub fn set_field(
        &mut self,
        name: &str,
        value: &str,
        checked: bool,
        catalog: &ProfileCatalog,
    ) -> Result<(), FormError> {
        if self.kind.discriminator() == Some(name) {
            self.set_discriminator(value, catalog);
            return Ok(());
        }
        let field = self
            .field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.set_from_input(value, checked);
        Ok(())
    }

    /// Document form: every field keyed by its own name, in rendered order.
    pub fn to_mapping(&self) -> Mapping {
        self.discriminator
            .iter()
            .chain(self.fields.iter())
            .map(|f| (f.name.clone(), f.extracted_value()))
            .collect()
    }

    /// Load imported data.
    ///
    /// The discriminator goes first so the fields named by the data exist
    /// before values are written. Keys without a matching field are skipped.
    pub fn hydrate(&mut self, data: &Mapping, catalog: &ProfileCatalog) {
        let discriminator = self.kind.discriminator();

        if let Some(name) = discriminator {
            let variant = data.get(name).map(Value::to_field_text).unwrap_or_default();
            if !variant.is_empty() {
                self.set_discriminator(&variant, catalog);
            }
        }

        for (key, value) in data {
            if Some(key.as_str()) == discriminator {
                continue;
            }
            match self.field_mut(key) {
                Some(field) => field.assign(value),
                None => debug!(kind = ?self.kind, key = %key, "no field for imported key"),
            }
        }
    }
}

fn discriminator_label(name: &str) -> &'static str {
    match name {
        "profile_type" => "Profile Type",
        "glass_type" => "Glass Type",
        "mullion_type" => "Mullion Type",
        "clump_type" => "Clump Type",
        _ => "Type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(entries: &[(&str, &str)]) -> Mapping {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_default_variant_fields() {
        let catalog = ProfileCatalog::default();
        let glass = GroupInstance::new(GroupKind::GlassUnit, &catalog);
        assert_eq!(glass.variant(), Some("sgu"));
        assert!(glass.field("thickness").is_some());
        assert!(glass.field("thickness1").is_none());
    }

    #[test]
    fn test_set_discriminator_replaces_fields() {
        let catalog = ProfileCatalog::default();
        let mut glass = GroupInstance::new(GroupKind::GlassUnit, &catalog);
        glass.set_field("length", "1200", false, &catalog).unwrap();
        glass.set_discriminator("dgu", &catalog);
        assert!(glass.field("thickness").is_none());
        assert!(glass.field("thickness2").is_some());
        assert_eq!(glass.field("length").unwrap().value, "");
    }

    #[test]
    fn test_same_variant_still_rebuilds() {
        let catalog = ProfileCatalog::default();
        let mut frame = GroupInstance::new(GroupKind::Frame, &catalog);
        frame.set_field("length", "3000", false, &catalog).unwrap();
        frame.set_discriminator("Aluminum Only", &catalog);
        assert_eq!(frame.field("length").unwrap().value, "");
    }

    #[test]
    fn test_unknown_variant_empties_fields() {
        let catalog = ProfileCatalog::default();
        let mut anchor = GroupInstance::new(GroupKind::Anchorage, &catalog);
        anchor.set_discriminator("Z Clump", &catalog);
        assert_eq!(anchor.variant(), Some(""));
        assert!(anchor.fields().is_empty());
    }

    #[test]
    fn test_hydrate_sets_discriminator_first() {
        let catalog = ProfileCatalog::default();
        let mut glass = GroupInstance::new(GroupKind::GlassUnit, &catalog);
        // Dependent keys ahead of the discriminator must still land
        glass.hydrate(
            &data(&[("thickness1", "6"), ("thickness2", "8"), ("glass_type", "dgu")]),
            &catalog,
        );
        assert_eq!(glass.variant(), Some("dgu"));
        assert_eq!(glass.field("thickness1").unwrap().value, "6");
        assert_eq!(glass.field("thickness2").unwrap().value, "8");
    }

    #[test]
    fn test_hydrate_skips_unknown_keys() {
        let catalog = ProfileCatalog::default();
        let mut connection = GroupInstance::new(GroupKind::Connection, &catalog);
        connection.hydrate(&data(&[("screw_nos", "4"), ("bogus", "1")]), &catalog);
        assert_eq!(connection.field("screw_nos").unwrap().value, "4");
        assert!(connection.field("bogus").is_none());
    }

    #[test]
    fn test_to_mapping_order() {
        let catalog = ProfileCatalog::default();
        let mut profile = GroupInstance::new(GroupKind::AlumProfile, &catalog);
        profile.set_discriminator("Pre-defined", &catalog);
        profile
            .set_field("profile_name", "M 145x67x3", false, &catalog)
            .unwrap();
        let mapping = profile.to_mapping();
        assert_eq!(
            mapping.keys().collect::<Vec<_>>(),
            vec!["profile_type", "profile_name"]
        );
        assert_eq!(mapping["profile_name"], Value::from("M 145x67x3"));
    }

    #[test]
    fn test_refresh_catalog_options() {
        use crate::catalog::ProfileNamesResponse;

        let mut catalog = ProfileCatalog::default();
        let mut profile = GroupInstance::new(GroupKind::AlumProfile, &catalog);
        profile.set_discriminator("Pre-defined", &catalog);
        profile
            .set_field("profile_name", "M 150x80x3", false, &catalog)
            .unwrap();

        catalog.load_names(ProfileNamesResponse {
            alum_profiles: vec!["M 150x80x3".into(), "M 200x80x4".into()],
            steel_profiles: vec![],
        });
        profile.refresh_catalog_options(&catalog);
        let field = profile.field("profile_name").unwrap();
        assert_eq!(field.value, "M 150x80x3");
        assert_eq!(field.control, Control::select(&["M 150x80x3", "M 200x80x4"]));
    }

    #[test]
    fn test_set_unknown_field_errors() {
        let catalog = ProfileCatalog::default();
        let mut steel = GroupInstance::new(GroupKind::SteelProfile, &catalog);
        assert_eq!(
            steel.set_field("web_thk", "3", false, &catalog),
            Err(FormError::UnknownField("web_thk".to_string()))
        );
    }
}
