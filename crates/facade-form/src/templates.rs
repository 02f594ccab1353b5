//! Static field tables for every group template
//!
//! Each repeatable group either has a fixed field list or a discriminator
//! whose value picks one of several field lists. The tables also decide the
//! control used for each field and its placeholder label.

use crate::catalog::ProfileCatalog;
use crate::field::{Control, Field};
use serde::{Deserialize, Serialize};

/// Repeatable group archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    AlumProfile,
    SteelProfile,
    GlassUnit,
    Frame,
    Connection,
    Anchorage,
}

impl GroupKind {
    /// Sub-lists of a category, in document order.
    pub const CATEGORY_ITEMS: [GroupKind; 4] = [
        GroupKind::GlassUnit,
        GroupKind::Frame,
        GroupKind::Connection,
        GroupKind::Anchorage,
    ];

    /// Key of the sequence holding instances of this group.
    pub fn list_key(self) -> &'static str {
        match self {
            GroupKind::AlumProfile => "alum_profiles",
            GroupKind::SteelProfile => "steel_profiles",
            GroupKind::GlassUnit => "glass_units",
            GroupKind::Frame => "frames",
            GroupKind::Connection => "connections",
            GroupKind::Anchorage => "anchorage",
        }
    }

    pub fn from_list_key(key: &str) -> Option<Self> {
        match key {
            "alum_profiles" => Some(GroupKind::AlumProfile),
            "steel_profiles" => Some(GroupKind::SteelProfile),
            "glass_units" => Some(GroupKind::GlassUnit),
            "frames" => Some(GroupKind::Frame),
            "connections" => Some(GroupKind::Connection),
            "anchorage" => Some(GroupKind::Anchorage),
            _ => None,
        }
    }

    /// Name of the field selecting the variant, if the group has one.
    pub fn discriminator(self) -> Option<&'static str> {
        match self {
            GroupKind::AlumProfile => Some("profile_type"),
            GroupKind::GlassUnit => Some("glass_type"),
            GroupKind::Frame => Some("mullion_type"),
            GroupKind::Anchorage => Some("clump_type"),
            GroupKind::SteelProfile | GroupKind::Connection => None,
        }
    }

    /// Discriminator options; the first one is the default selection.
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            GroupKind::AlumProfile => &["Manual", "Pre-defined", "Stick"],
            GroupKind::GlassUnit => &["sgu", "dgu", "lgu", "ldgu"],
            GroupKind::Frame => &["Aluminum Only", "Aluminum + Steel"],
            GroupKind::Anchorage => &["Box Clump", "U Clump", "L Clump Top", "L Clump Front"],
            GroupKind::SteelProfile | GroupKind::Connection => &[],
        }
    }

    pub fn default_variant(self) -> Option<&'static str> {
        self.variants().first().copied()
    }

    /// Field names for `variant`. Groups without a discriminator ignore it.
    pub fn field_names(self, variant: &str) -> &'static [&'static str] {
        match self {
            GroupKind::AlumProfile => match variant {
                "Manual" => ALUM_MANUAL,
                "Pre-defined" => &["profile_name"],
                "Stick" => ALUM_STICK,
                _ => &[],
            },
            GroupKind::SteelProfile => STEEL_FIELDS,
            GroupKind::GlassUnit => match variant {
                "sgu" => GLASS_SGU,
                "dgu" => GLASS_DGU,
                "lgu" => GLASS_LGU,
                "ldgu" => GLASS_LDGU,
                _ => &[],
            },
            GroupKind::Frame => match variant {
                "Aluminum Only" => FRAME_ALUMINUM,
                "Aluminum + Steel" => FRAME_COMPOSITE,
                _ => &[],
            },
            GroupKind::Connection => CONNECTION_FIELDS,
            GroupKind::Anchorage => match variant {
                "Box Clump" => ANCHOR_BOX,
                "U Clump" => ANCHOR_U,
                "L Clump Top" => ANCHOR_L_TOP,
                "L Clump Front" => ANCHOR_L_FRONT,
                _ => &[],
            },
        }
    }

    /// Build the live fields for `variant`.
    pub fn build_fields(self, variant: &str, catalog: &ProfileCatalog) -> Vec<Field> {
        self.field_names(variant)
            .iter()
            .map(|name| self.build_field(name, variant, catalog))
            .collect()
    }

    fn build_field(self, name: &str, variant: &str, catalog: &ProfileCatalog) -> Field {
        let label = self.label(name);
        let control = match self {
            GroupKind::AlumProfile if name == "profile_name" && variant == "Pre-defined" => {
                Control::Select {
                    options: catalog.alum_options(),
                }
            }
            GroupKind::AlumProfile | GroupKind::SteelProfile => {
                if name == "profile_name" {
                    Control::Text
                } else {
                    Control::Number
                }
            }
            GroupKind::GlassUnit => {
                if name.starts_with("grade") {
                    Control::select(GLASS_GRADES)
                } else if name == "support_type" {
                    Control::select(SUPPORT_TYPES)
                } else if ["thickness", "def", "load", "gap", "nfl", "gtf"]
                    .iter()
                    .any(|p| name.contains(p))
                {
                    Control::Number
                } else {
                    Control::Text
                }
            }
            GroupKind::Frame => {
                if ["_type", "zone", "mullion", "transom"]
                    .iter()
                    .any(|p| name.contains(p))
                {
                    Control::Text
                } else {
                    Control::Number
                }
            }
            GroupKind::Connection | GroupKind::Anchorage => Control::Number,
        };
        Field::new(name, label, control)
    }

    /// Placeholder label; unknown names fall back to the field name.
    pub fn label(self, name: &str) -> &'static str {
        let table: &[(&str, &str)] = match self {
            GroupKind::AlumProfile => ALUM_LABELS,
            GroupKind::SteelProfile => STEEL_LABELS,
            GroupKind::GlassUnit => GLASS_LABELS,
            GroupKind::Frame => FRAME_LABELS,
            GroupKind::Connection => CONNECTION_LABELS,
            GroupKind::Anchorage => ANCHOR_LABELS,
        };
        table
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, label)| *label)
            .unwrap_or("")
    }
}

// ------------------------------------------------------------------
// Option lists
// ------------------------------------------------------------------

/// Built-in aluminum profiles, used until the catalog is fetched.
pub const ALUM_PROFILE_OPTIONS: &[&str] = &[
    "M 125x60x2.5",
    "M 125x60x3",
    "M 140x60x2.5",
    "M 135x67x4",
    "M 145x67x2.5",
    "M 145x67x3",
    "M 145x67x3.5",
    "M 145x80x3",
    "M 150x80x3",
    "M 160x80x8",
    "M 240x80x12",
    "M 145x90x3",
    "M 185x90x3",
    "M 200x72x3",
    "T 125x60x2.5",
    "T 135x67x2.5",
    "T 145x67x2",
    "T 125x80x2.5",
    "T 125x90x2.5",
    "T 65x72x3",
];

pub const GLASS_GRADES: &[&str] = &["FT", "HS", "AN"];

pub const SUPPORT_TYPES: &[&str] = &[
    "Four Edges",
    "Three Edges",
    "Two Edges",
    "One Edge",
    "Point Fixed",
];

// ------------------------------------------------------------------
// Field lists
// ------------------------------------------------------------------

const ALUM_MANUAL: &[&str] = &[
    "profile_name", "web_length", "flange_length", "web_thk", "flange_thk", "tor_constant",
    "area", "I_xx", "I_yy", "Y", "X", "plastic_x", "plastic_y", "F_y", "Mn_yield", "Mn_lb",
];

const ALUM_STICK: &[&str] = &[
    "profile_name", "web_length", "flange_length", "web_thk", "flange_thk", "F_y",
];

const STEEL_FIELDS: &[&str] = &["profile_name", "web_length", "flange_length", "thk"];

const GLASS_SGU: &[&str] = &[
    "length", "width", "thickness", "grade", "wind_load", "support_type", "nfl", "gtf",
    "load_x_area2", "def",
];

const GLASS_DGU: &[&str] = &[
    "length", "width", "thickness1", "gap", "thickness2", "grade1", "grade2", "wind_load",
    "support_type", "nfl1", "nfl2", "gtf1", "gtf2", "load1_x_area2", "load2_x_area2", "def1",
    "def2",
];

const GLASS_LGU: &[&str] = &[
    "length", "width", "thickness1", "thickness_inner", "thickness2", "chart_thickness", "grade",
    "wind_load", "support_type", "nfl", "gtf", "load_x_area2", "def",
];

const GLASS_LDGU: &[&str] = &[
    "length", "width", "thickness1_1", "thickness_inner", "thickness1_2", "chart_thickness",
    "gap", "thickness2", "grade1", "grade2", "wind_load", "support_type", "nfl1", "nfl2", "gtf1",
    "gtf2", "load1_x_area2", "load2_x_area2", "def1", "def2",
];

const FRAME_ALUMINUM: &[&str] = &[
    "length", "width", "tran_spacing", "glass_thk", "wind_pos", "wind_neg", "mullion", "mul_mu",
    "mul_vu", "mul_def", "mul_phi_Mn", "transom", "tran_mu", "tran_vu", "tran_def_wind",
    "tran_def_dead", "tran_phi_Mn",
];

const FRAME_COMPOSITE: &[&str] = &[
    "length", "width", "tran_spacing", "glass_thk", "wind_pos", "wind_neg", "mullion", "I_xa",
    "I_xs", "mul_mu", "mul_vu", "mul_def", "mul_phi_Mn_a", "mul_phi_Mn_s", "transom", "tran_mu",
    "tran_vu", "tran_def_wind", "tran_def_dead", "tran_phi_Mn",
];

const CONNECTION_FIELDS: &[&str] = &["screw_nos", "screw_dia", "head_dia", "t1", "t2", "tc"];

const ANCHOR_BOX: &[&str] = &[
    "reaction_Ry", "reaction_Rz", "anchor_nos", "anchor_dia", "embed_depth", "C_a1", "h_a",
    "bp_length_N", "bp_width_B", "bp_thk", "bp_b",
];

const ANCHOR_U: &[&str] = &[
    "reaction_Ry", "reaction_Rz", "anchor_nos", "anchor_dia", "embed_depth", "C_a1",
    "thr_bolt_dia", "fin_thk", "fin_e", "bp_length_N", "bp_width_B", "bp_thk", "bp_d",
];

const ANCHOR_L_TOP: &[&str] = &[
    "reaction_Ry", "reaction_Rz", "anchor_nos", "anchor_dia", "embed_depth", "C_a1", "h_a",
    "bp_length_N", "bp_width_B", "bp_thk",
];

const ANCHOR_L_FRONT: &[&str] = &[
    "anchor_nos", "anchor_dia", "embed_depth", "C_a1", "thr_bolt_dia", "fin_thk", "fin_e",
    "bp_length_N", "bp_width_B", "bp_thk", "bp_d",
];

// ------------------------------------------------------------------
// Labels
// ------------------------------------------------------------------

const ALUM_LABELS: &[(&str, &str)] = &[
    ("profile_name", "Profile Name (e.g. M or St. M 125x60x2.5)"),
    ("web_length", "Web Length (mm)"),
    ("flange_length", "Flange Length (mm)"),
    ("web_thk", "Web Thickness (mm)"),
    ("flange_thk", "Flange Thickness (mm)"),
    ("tor_constant", "Torsional Constant (mm⁴)"),
    ("area", "Area (mm²)"),
    ("I_xx", "Moment of Inertia about Major Axis, Ixx (mm⁴)"),
    ("I_yy", "Moment of Inertia about Minor Axis, Iyy (mm⁴)"),
    ("Y", "Extreme Fibre Distance, Y (mm)"),
    ("X", "Extreme Fibre Distance, X (mm)"),
    ("plastic_x", "Upper Region Centroid Distance, Plastic X"),
    ("plastic_y", "Lower Region Centroid Distance, Plastic Y"),
    ("F_y", "Yield Strength, Fy (MPa)"),
    ("Mn_yield", "Moment Capacity by Yielding, Mn (kNm)"),
    ("Mn_lb", "Moment Capacity by Local Buckling, Mn (kNm)"),
];

const STEEL_LABELS: &[(&str, &str)] = &[
    ("profile_name", "Profile Name (e.g. St. M 100x50x3)"),
    ("web_length", "Web Length (mm)"),
    ("flange_length", "Flange Length (mm)"),
    ("thk", "Thickness (mm)"),
];

const GLASS_LABELS: &[(&str, &str)] = &[
    ("length", "Glass Length (mm)"),
    ("width", "Glass Width (mm)"),
    ("thickness", "Thickness (mm)"),
    ("thickness1", "Outer Panel Thickness (mm)"),
    ("thickness2", "Inner Panel Thickness (mm)"),
    ("thickness1_1", "1st Lite Thickness of Outer panel (mm)"),
    ("thickness1_2", "2nd Lite Thickness of Outer panel (mm)"),
    ("thickness_inner", "Interlayer Thickness (mm)"),
    ("chart_thickness", "Chart Thickness (mm)"),
    ("grade", "Glass Grade"),
    ("grade1", "Outer Panel Grade"),
    ("grade2", "Inner Panel Grade"),
    ("support_type", "Support Type"),
    ("wind_load", "Wind Load (kPa)"),
    ("gap", "Gap Between Panels (mm)"),
    ("nfl", "Non-factored Load, NFL (kPa)"),
    ("nfl1", "Non-factored Load of Outer Panel, NFL1 (kPa)"),
    ("nfl2", "Non-factored Load of Inner Panel, NFL2 (kPa)"),
    ("gtf", "Glass Type Factor, GTF"),
    ("gtf1", "Glass Type Factor of Outer Panel, GTF1"),
    ("gtf2", "Glass Type Factor of Inner Panel, GTF2"),
    ("load_x_area2", "Load × Area², 0.7Pz x A² (kNm²)"),
    ("load1_x_area2", "Load × Area², 0.7q1 x A² (kNm²)"),
    ("load2_x_area2", "Load × Area², 0.7q2 x A² (kNm²)"),
    ("def", "Deflection (mm)"),
    ("def1", "Outer Panel Deflection (mm)"),
    ("def2", "Inner Panel Deflection (mm)"),
];

const FRAME_LABELS: &[(&str, &str)] = &[
    ("length", "Mullion Length (mm)"),
    ("width", "Transom Length (mm)"),
    ("tran_spacing", "Transom Spacing (mm)"),
    ("glass_thk", "Glass Thickness (mm)"),
    ("wind_pos", "Wind Load (+ve) (kPa)"),
    ("wind_neg", "Wind Load (-ve) (kPa)"),
    ("mullion", "Mullion Name (e.g. M 125x60x2.5 or [+RHS 3])"),
    ("I_xa", "Moment of Inertia of Aluminum, Ixa (mm⁴)"),
    ("I_xs", "Moment of Inertia of Steel, Ixs (mm⁴)"),
    ("mul_mu", "Mullion Max. Moment, Mu (kNm)"),
    ("mul_vu", "Mullion Max. Shear, Vu (kN)"),
    ("mul_def", "Mullion Max. Deflection, δ (mm)"),
    ("mul_phi_Mn", "Mullion Moment Capacity, φMn (kNm)"),
    ("mul_phi_Mn_a", "Mullion (Aluminum) Moment Capacity, φMna (kNm)"),
    ("mul_phi_Mn_s", "Mullion (Steel) Moment Capacity, φMns (kNm)"),
    ("transom", "Transom Name (e.g. T 125x60x2.5)"),
    ("tran_mu", "Transom Max. Moment, Mu (kNm)"),
    ("tran_vu", "Transom Max. Shear, Vu (kN)"),
    ("tran_def_wind", "Transom Max. Deflection (wind), δw (mm)"),
    ("tran_def_dead", "Transom Max. Deflection (dead), δd (mm)"),
    ("tran_phi_Mn", "Transom Moment Capacity, φMn (kNm)"),
];

const CONNECTION_LABELS: &[(&str, &str)] = &[
    ("screw_nos", "No. of Screws, n"),
    ("screw_dia", "Screw Diameter, d (mm)"),
    ("head_dia", "Screw Head Diameter, dh (mm)"),
    ("t1", "Thickness of Member in Contact with Screw Head, t1 (mm)"),
    ("t2", "Thickness of Member not in Contact with Screw Head, t2 (mm)"),
    ("tc", "Thickness of Clip, tc (mm)"),
];

const ANCHOR_LABELS: &[(&str, &str)] = &[
    ("reaction_Ry", "Horizontal Reaction, Ry (kN)"),
    ("reaction_Rz", "Vertical Reaction, Rz (kN)"),
    ("anchor_nos", "No. of Anchor bolt, n"),
    ("anchor_dia", "Diameter of Anchor bolt, da (mm)"),
    ("embed_depth", "Embed. Depth of Anchor, hef (mm)"),
    ("C_a1", "Edge Distance, Ca1 (mm)"),
    ("h_a", "Depth of Concrete Member, ha (mm)"),
    ("thr_bolt_dia", "Diameter of Through bolt, db (mm)"),
    ("fin_thk", "Thickness of Fin Plate (mm)"),
    ("fin_e", "Eccentricity, e (mm)"),
    ("bp_length_N", "Length of Base Plate, N (mm)"),
    ("bp_width_B", "Width of Base Plate, B (mm)"),
    ("bp_thk", "Thickness of Base Plate, t (mm)"),
    ("bp_d", "Fin-to-fin distance, d (mm)"),
    ("bp_b", "Width of flange, b"),
];

// ------------------------------------------------------------------
// Simple groups
// ------------------------------------------------------------------

/// Prefixes of the flat dot-path groups, in document order.
pub const SIMPLE_GROUPS: [&str; 3] = ["project_info", "include", "wind"];

/// Fields of the `project_info`, `include` and `wind` groups.
pub fn simple_fields() -> Vec<Field> {
    let mut fields = vec![
        Field::new("project_info.project_name", "Project Name", Control::Text),
        Field::new("project_info.client_name", "Client Name", Control::Text),
        Field::new("project_info.project_location", "Project Location", Control::Text),
        Field::new("project_info.prepared_by", "Prepared By", Control::Text),
        Field::new("project_info.date", "Date", Control::Date),
        Field::new("project_info.revision", "Revision", Control::Text),
    ];

    for (section, label) in [
        ("wind_section", "Wind Load Calculation"),
        ("profile_section", "Profile Properties"),
        ("glass_section", "Glass Design"),
        ("frame_section", "Frame Design"),
        ("connection_section", "Connection Design"),
        ("anchorage_section", "Anchorage Design"),
    ] {
        fields.push(Field::new(
            &format!("include.{}", section),
            label,
            Control::Checkbox,
        ));
    }

    fields.extend([
        Field::new("wind.location", "Location", Control::Text),
        Field::new("wind.floor_heights", "Floor Heights (m, e.g. 4.5 3.2 3.2)", Control::Text),
        Field::new("wind.occupancy_cat", "Occupancy Category", Control::select(&["I", "II", "III", "IV"])),
        Field::new("wind.wind_speed", "Basic Wind Speed, V (m/s)", Control::Number),
        Field::new("wind.K_d", "Directionality Factor, Kd", Control::select(&["0.85", "0.90", "0.95", "1.00"])),
        Field::new("wind.exposure_cat", "Exposure Category", Control::select(&["A", "B", "C"])),
        Field::new("wind.topography_type", "Topography", Control::select(&["Homogeneous", "Ridge", "Escarpment", "Hill"])),
        Field::new("wind.topo_height", "Hill Height, H (m)", Control::Number),
        Field::new("wind.topo_length", "Half Hill Length, Lh (m)", Control::Number),
        Field::new("wind.topo_distance", "Distance from Crest, x (m)", Control::Number),
        Field::new("wind.topo_crest_side", "Side of Crest", Control::select(&["Upwind", "Downwind"])),
        Field::new("wind.b_height", "Building Height (m)", Control::Number),
        Field::new("wind.b_length", "Building Length (m)", Control::Number),
        Field::new("wind.b_width", "Building Width (m)", Control::Number),
        Field::new("wind.b_freq", "Natural Frequency (Hz)", Control::Number),
        Field::new("wind.damping", "Damping Ratio", Control::Number),
        Field::new("wind.note", "Note", Control::TextArea),
    ]);

    fields
}
