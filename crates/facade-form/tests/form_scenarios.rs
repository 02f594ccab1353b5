//! End-to-end form scenarios: build, serialize, import

use facade_form::{
    extract, form_to_yaml, import_text, to_yaml_string, Form, GroupKind, ListRef, Mapping,
    ProfileCatalog, Value,
};
use pretty_assertions::assert_eq;

fn new_form() -> (Form, ProfileCatalog) {
    let catalog = ProfileCatalog::new();
    (Form::new(&catalog), catalog)
}

// ============================================================
// Discriminators
// ============================================================

#[test]
fn glass_type_is_applied_before_dependent_values() {
    let (mut form, catalog) = new_form();
    let yaml = "\
categories:
- category_name: Lobby
  glass_units:
  - length: 2400
    thickness1: 6
    thickness2: 8
    glass_type: dgu
";
    import_text(&mut form, yaml, &catalog).unwrap();

    let list = ListRef::parse("categories.0.glass_units").unwrap();
    let glass = form.instance(list, 0).unwrap();
    assert_eq!(glass.variant(), Some("dgu"));
    assert_eq!(glass.field("thickness1").unwrap().value, "6");
    assert_eq!(glass.field("thickness2").unwrap().value, "8");
    assert_eq!(glass.field("length").unwrap().value, "2400");
    assert!(glass.field("thickness").is_none());
}

#[test]
fn changing_discriminator_drops_old_values() {
    let (mut form, catalog) = new_form();
    let list = ListRef::parse("categories.0.anchorage").unwrap();
    form.set_field(list, 0, "h_a", "300", false, &catalog).unwrap();
    form.set_discriminator(list, 0, "U Clump", &catalog).unwrap();

    let doc = extract(&form);
    let anchorage = doc["categories"].as_sequence().unwrap()[0]
        .as_mapping()
        .unwrap()["anchorage"]
        .as_sequence()
        .unwrap()[0]
        .as_mapping()
        .unwrap()
        .clone();
    assert_eq!(anchorage["clump_type"], Value::from("U Clump"));
    assert!(!anchorage.contains_key("h_a"));
    assert!(anchorage.contains_key("bp_d"));
}

// ============================================================
// Checkboxes and quoting
// ============================================================

#[test]
fn include_checkboxes_extract_as_yes_no() {
    let (mut form, _) = new_form();
    form.set_simple("include.wind_section", "", true).unwrap();
    let yaml = form_to_yaml(&form);
    assert!(yaml.contains("include:\n  wind_section: yes\n  profile_section: no\n"));
}

#[test]
fn note_with_colon_becomes_block_literal() {
    let (mut form, catalog) = new_form();
    form.set_simple("wind.note", "Note: see Fig. 1", false).unwrap();
    let yaml = form_to_yaml(&form);
    assert!(yaml.contains("  note: |-\n    Note: see Fig. 1\n"));

    let (mut imported, _) = new_form();
    import_text(&mut imported, &yaml, &catalog).unwrap();
    assert_eq!(
        imported.simple_field("wind.note").unwrap().value,
        "Note: see Fig. 1"
    );
}

// ============================================================
// List cardinality
// ============================================================

#[test]
fn empty_glass_list_imports_as_one_blank_unit() {
    let (mut form, catalog) = new_form();
    let glass = ListRef::parse("categories.0.glass_units").unwrap();
    form.remove_instance(glass, 0).unwrap();
    assert!(form.list(glass).unwrap().is_empty());

    let yaml = form_to_yaml(&form);
    assert!(yaml.contains("  glass_units: []\n"));

    let (mut imported, _) = new_form();
    import_text(&mut imported, &yaml, &catalog).unwrap();
    let units = imported.list(glass).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].variant(), Some("sgu"));
    assert_eq!(units[0].field("length").unwrap().value, "");
}

#[test]
fn existing_instances_are_discarded_on_import() {
    let (mut form, catalog) = new_form();
    let alum = ListRef::Top(GroupKind::AlumProfile);
    form.add_instance(alum, &catalog).unwrap();
    form.add_instance(alum, &catalog).unwrap();
    assert_eq!(form.alum_profiles().len(), 3);

    import_text(&mut form, "alum_profiles:\n- profile_type: Stick\n", &catalog).unwrap();
    assert_eq!(form.alum_profiles().len(), 1);
    assert_eq!(form.alum_profiles()[0].variant(), Some("Stick"));
}

// ============================================================
// End-to-end
// ============================================================

#[test]
fn tower_a_document_round_trips_through_the_form() {
    let mut info = Mapping::new();
    info.insert("project_name".into(), "Tower A".into());
    let mut profile = Mapping::new();
    profile.insert("profile_type".into(), "Pre-defined".into());
    profile.insert("profile_name".into(), "M 125x60x2.5".into());

    let mut doc = Mapping::new();
    doc.insert("project_info".into(), Value::Mapping(info));
    doc.insert(
        "alum_profiles".into(),
        Value::Sequence(vec![Value::Mapping(profile)]),
    );
    doc.insert("categories".into(), Value::Sequence(vec![]));

    let yaml = to_yaml_string(&doc);
    assert!(yaml.contains("project_info:\n  project_name: Tower A\n"));
    assert!(yaml.contains("alum_profiles:\n- profile_type: Pre-defined\n  profile_name: M 125x60x2.5\n"));

    let (mut form, catalog) = new_form();
    import_text(&mut form, &yaml, &catalog).unwrap();

    assert_eq!(
        form.simple_field("project_info.project_name").unwrap().value,
        "Tower A"
    );
    assert_eq!(form.alum_profiles().len(), 1);
    let profile = &form.alum_profiles()[0];
    assert_eq!(profile.variant(), Some("Pre-defined"));
    assert_eq!(profile.field("profile_name").unwrap().value, "M 125x60x2.5");

    assert_eq!(form.categories().len(), 1);
    let category = &form.categories()[0];
    assert_eq!(category.name.value, "");
    assert_eq!(category.glass_units.len(), 1);
    assert_eq!(category.frames.len(), 1);
    assert_eq!(category.connections.len(), 1);
    assert_eq!(category.anchorage.len(), 1);
}

#[test]
fn generated_form_yaml_reimports_identically() {
    let (mut form, catalog) = new_form();
    form.set_simple("project_info.project_name", "Harbour View", false)
        .unwrap();
    form.set_simple("project_info.date", "2025-12-10", false).unwrap();
    form.set_simple("wind.K_d", "0.85", false).unwrap();
    form.set_simple("include.frame_section", "", true).unwrap();
    form.set_category_name(0, "Podium").unwrap();

    let frames = ListRef::parse("categories.0.frames").unwrap();
    form.set_discriminator(frames, 0, "Aluminum + Steel", &catalog)
        .unwrap();
    form.set_field(frames, 0, "mullion", "M 150x80x3 [+RHS 3]", false, &catalog)
        .unwrap();
    form.set_field(frames, 0, "wind_neg", "-2.4", false, &catalog)
        .unwrap();

    let yaml = form_to_yaml(&form);
    assert!(yaml.contains("  date: '2025-12-10'\n"));
    assert!(yaml.contains("  - mullion_type: 'Aluminum + Steel'\n"));

    let (mut imported, _) = new_form();
    import_text(&mut imported, &yaml, &catalog).unwrap();
    assert_eq!(imported, form);
    assert_eq!(form_to_yaml(&imported), yaml);
}

#[test]
fn json_import_is_accepted() {
    let (mut form, catalog) = new_form();
    let json = r#"{
        "project_info": {"project_name": "Tower B"},
        "wind": {"wind_speed": 65.7, "occupancy_cat": "III"},
        "steel_profiles": [{"profile_name": "St. M 100x50x3", "thk": 3}]
    }"#;
    import_text(&mut form, json, &catalog).unwrap();
    assert_eq!(form.simple_field("wind.wind_speed").unwrap().value, "65.7");
    assert_eq!(form.simple_field("wind.occupancy_cat").unwrap().value, "III");
    assert_eq!(
        form.steel_profiles()[0].field("thk").unwrap().value,
        "3"
    );
}
