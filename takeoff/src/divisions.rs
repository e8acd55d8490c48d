//! Construction division taxonomy.
//!
//! Static CSI MasterFormat-style reference data mapping a division code to
//! its name and allowed subcategories. The table is read-only; consumers must
//! tolerate unknown codes by falling back to the raw code as the label.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// One division of the cost-classification taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Division {
    pub code: &'static str,
    pub name: &'static str,
    pub subcategories: &'static [&'static str],
}

static DIVISIONS: &[Division] = &[
    Division {
        code: "01",
        name: "General Requirements",
        subcategories: &[
            "Summary of Work",
            "Allowances",
            "Temporary Facilities",
            "Project Management",
        ],
    },
    Division {
        code: "02",
        name: "Site Construction",
        subcategories: &[
            "Demolition",
            "Earthwork",
            "Utilities",
            "Paving and Surfacing",
            "Landscaping",
        ],
    },
    Division {
        code: "03",
        name: "Concrete",
        subcategories: &[
            "Cast-in-Place Concrete",
            "Precast Concrete",
            "Concrete Reinforcement",
            "Concrete Finishing",
        ],
    },
    Division {
        code: "04",
        name: "Masonry",
        subcategories: &["Brick", "Concrete Masonry Units", "Stone", "Masonry Restoration"],
    },
    Division {
        code: "05",
        name: "Metals",
        subcategories: &[
            "Structural Steel",
            "Metal Joists",
            "Metal Decking",
            "Metal Fabrications",
        ],
    },
    Division {
        code: "06",
        name: "Wood and Plastics",
        subcategories: &["Rough Carpentry", "Finish Carpentry", "Architectural Woodwork"],
    },
    Division {
        code: "07",
        name: "Thermal and Moisture Protection",
        subcategories: &["Waterproofing", "Insulation", "Roofing", "Siding", "Sealants"],
    },
    Division {
        code: "08",
        name: "Doors and Windows",
        subcategories: &[
            "Metal Doors and Frames",
            "Wood Doors",
            "Windows",
            "Hardware",
            "Glazing",
        ],
    },
    Division {
        code: "09",
        name: "Finishes",
        subcategories: &[
            "Gypsum Board",
            "Tile",
            "Flooring",
            "Painting",
            "Acoustical Ceilings",
        ],
    },
    Division {
        code: "10",
        name: "Specialties",
        subcategories: &["Signage", "Partitions", "Lockers", "Toilet Accessories"],
    },
    Division {
        code: "11",
        name: "Equipment",
        subcategories: &[
            "Kitchen Equipment",
            "Laboratory Equipment",
            "Loading Dock Equipment",
        ],
    },
    Division {
        code: "12",
        name: "Furnishings",
        subcategories: &["Casework", "Window Treatments", "Furniture"],
    },
    Division {
        code: "13",
        name: "Special Construction",
        subcategories: &["Pre-Engineered Structures", "Swimming Pools", "Security Systems"],
    },
    Division {
        code: "14",
        name: "Conveying Systems",
        subcategories: &["Elevators", "Escalators", "Material Handling"],
    },
    Division {
        code: "15",
        name: "Mechanical",
        subcategories: &["Plumbing", "HVAC", "Fire Protection", "Controls"],
    },
    Division {
        code: "16",
        name: "Electrical",
        subcategories: &["Service and Distribution", "Lighting", "Communications", "Low Voltage"],
    },
];

static INDEX: Lazy<HashMap<&'static str, &'static Division>> =
    Lazy::new(|| DIVISIONS.iter().map(|d| (d.code, d)).collect());

/// All divisions in ascending code order.
pub fn divisions() -> &'static [Division] {
    DIVISIONS
}

/// Human-readable name for a division code.
pub fn division_name(code: &str) -> Option<&'static str> {
    INDEX.get(code).map(|d| d.name)
}

/// Subcategories allowed under `code`; empty when the code is unknown.
pub fn subcategories(code: &str) -> &'static [&'static str] {
    INDEX.get(code).map(|d| d.subcategories).unwrap_or(&[])
}

/// Display label for a division: `"03 - Concrete"`, or the raw code when the
/// taxonomy does not know it.
pub fn display_label(code: &str) -> String {
    match division_name(code) {
        Some(name) => format!("{code} - {name}"),
        None => {
            log::warn!("unknown division code {code:?}; using raw code as label");
            code.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(division_name("03"), Some("Concrete"));
        assert!(subcategories("03").contains(&"Cast-in-Place Concrete"));
        assert_eq!(display_label("09"), "09 - Finishes");
    }

    #[test]
    fn unknown_codes_fall_back_to_raw() {
        assert_eq!(division_name("99"), None);
        assert!(subcategories("99").is_empty());
        assert_eq!(display_label("99"), "99");
    }

    #[test]
    fn table_is_sorted_by_code() {
        let codes: Vec<&str> = divisions().iter().map(|d| d.code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
