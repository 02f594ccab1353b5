//! Profile catalog cache
//!
//! Filled once from the backend's profile endpoints and owned by the form
//! controller. Group templates borrow it for the pre-defined profile option
//! list; preview requests borrow it to auto-fill section properties.

use crate::document::{Mapping, Value};
use crate::templates::{GroupKind, ALUM_PROFILE_OPTIONS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `GET /get_profile_names`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileNamesResponse {
    #[serde(default)]
    pub alum_profiles: Vec<String>,
    #[serde(default)]
    pub steel_profiles: Vec<String>,
}

/// `GET /get_profile_data`: property records keyed by profile name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDataResponse {
    #[serde(default)]
    pub alum_profiles: IndexMap<String, Mapping>,
    #[serde(default)]
    pub steel_profiles: IndexMap<String, Mapping>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    alum_names: Vec<String>,
    steel_names: Vec<String>,
    alum_records: IndexMap<String, Mapping>,
    steel_records: IndexMap<String, Mapping>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_names(&mut self, names: ProfileNamesResponse) {
        debug!(
            alum = names.alum_profiles.len(),
            steel = names.steel_profiles.len(),
            "profile names loaded"
        );
        self.alum_names = names.alum_profiles;
        self.steel_names = names.steel_profiles;
    }

    pub fn load_data(&mut self, data: ProfileDataResponse) {
        debug!(
            alum = data.alum_profiles.len(),
            steel = data.steel_profiles.len(),
            "profile records loaded"
        );
        self.alum_records = data.alum_profiles;
        self.steel_records = data.steel_profiles;
    }

    pub fn is_loaded(&self) -> bool {
        !self.alum_names.is_empty() || !self.alum_records.is_empty()
    }

    /// Options for the pre-defined aluminum profile select.
    ///
    /// Fetched names win, then record keys, then the built-in list.
    pub fn alum_options(&self) -> Vec<String> {
        if !self.alum_names.is_empty() {
            self.alum_names.clone()
        } else if !self.alum_records.is_empty() {
            self.alum_records.keys().cloned().collect()
        } else {
            ALUM_PROFILE_OPTIONS.iter().map(|s| s.to_string()).collect()
        }
    }

    pub fn steel_names(&self) -> &[String] {
        &self.steel_names
    }

    pub fn alum_record(&self, name: &str) -> Option<&Mapping> {
        self.alum_records.get(name.trim())
    }

    pub fn steel_record(&self, name: &str) -> Option<&Mapping> {
        self.steel_records.get(name.trim())
    }

    /// Fill blank or missing entries of a preview payload from the record
    /// of the named profile. Returns how many entries were filled.
    pub fn fill_preview_payload(&self, kind: GroupKind, payload: &mut Mapping) -> usize {
        let name = payload
            .get("profile_name")
            .map(Value::to_field_text)
            .unwrap_or_default();

        let record = match kind {
            GroupKind::AlumProfile => {
                let predefined = payload
                    .get("profile_type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t == "Pre-defined");
                if !predefined {
                    return 0;
                }
                self.alum_record(&name)
            }
            GroupKind::SteelProfile => self.steel_record(&name),
            _ => None,
        };
        let Some(record) = record else {
            return 0;
        };

        let mut filled = 0;
        for (key, value) in record {
            let blank = payload
                .get(key)
                .map_or(true, |v| v.to_field_text().trim().is_empty());
            if blank {
                payload.insert(key.clone(), value.clone());
                filled += 1;
            }
        }
        debug!(profile = %name, filled, "preview payload auto-filled");
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProfileCatalog {
        let data: ProfileDataResponse = serde_json::from_str(
            r#"{
                "alum_profiles": {
                    "M 125x60x2.5": {"web_length": 125, "flange_length": 60, "area": 912.5}
                },
                "steel_profiles": {
                    "St. M 100x50x3": {"web_length": 100, "thk": 3}
                }
            }"#,
        )
        .unwrap();
        let mut catalog = ProfileCatalog::new();
        catalog.load_data(data);
        catalog
    }

    #[test]
    fn test_builtin_options_when_empty() {
        let options = ProfileCatalog::new().alum_options();
        assert_eq!(options.len(), ALUM_PROFILE_OPTIONS.len());
        assert_eq!(options[0], "M 125x60x2.5");
    }

    #[test]
    fn test_fetched_names_replace_builtin() {
        let mut catalog = ProfileCatalog::new();
        catalog.load_names(ProfileNamesResponse {
            alum_profiles: vec!["X 1".into()],
            steel_profiles: vec!["S 1".into()],
        });
        assert_eq!(catalog.alum_options(), vec!["X 1".to_string()]);
        assert_eq!(catalog.steel_names(), ["S 1".to_string()]);
        assert!(catalog.is_loaded());
    }

    #[test]
    fn test_fill_predefined_payload() {
        let catalog = catalog();
        let mut payload = Mapping::new();
        payload.insert("profile_type".into(), "Pre-defined".into());
        payload.insert("profile_name".into(), "M 125x60x2.5".into());
        payload.insert("area".into(), "900".into());

        assert_eq!(catalog.fill_preview_payload(GroupKind::AlumProfile, &mut payload), 2);
        assert_eq!(payload["web_length"].to_field_text(), "125");
        assert_eq!(payload["area"].to_field_text(), "900");
    }

    #[test]
    fn test_manual_payload_untouched() {
        let catalog = catalog();
        let mut payload = Mapping::new();
        payload.insert("profile_type".into(), "Manual".into());
        payload.insert("profile_name".into(), "M 125x60x2.5".into());
        assert_eq!(catalog.fill_preview_payload(GroupKind::AlumProfile, &mut payload), 0);
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_fill_steel_payload() {
        let catalog = catalog();
        let mut payload = Mapping::new();
        payload.insert("profile_name".into(), "St. M 100x50x3".into());
        payload.insert("thk".into(), "".into());
        assert_eq!(catalog.fill_preview_payload(GroupKind::SteelProfile, &mut payload), 2);
        assert_eq!(payload["thk"].to_field_text(), "3");
    }
}
