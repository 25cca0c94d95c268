//! core::catalog
//!
//! GPC reference numbers rolled up into the categories CDP asks for.
//!
//! # Design
//!
//! Every table is written out literally so it can be audited line by line
//! against the GPC protocol. Nothing here is computed: the CDP questionnaire
//! expects exact category membership.
//!
//! The sector/scope categories are mutually exclusive. The totals
//! ([`Category::TotalScope1ExcludingGeneration`], [`Category::Basic`], ...)
//! roll several of them up and therefore overlap them.
//!
//! # Example
//!
//! ```
//! use citycatalyst_cdp::core::catalog::{reference_numbers, Category};
//!
//! let refs = reference_numbers(Category::TransportationScope2);
//! assert!(refs.contains(&"II.1.2"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An emissions category reported to CDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TotalScope1ExcludingGeneration,
    Scope1FromGeneration,
    TotalScope2,
    TotalScope3,
    StationaryEnergyScope1,
    StationaryEnergyScope2,
    StationaryEnergyScope3,
    TransportationScope1,
    TransportationScope2,
    TransportationScope3,
    WasteWithinScope1,
    WasteWithinScope3,
    WasteOutsideScope1,
    Basic,
}

impl Category {
    /// Every category, in questionnaire row order.
    pub const ALL: [Category; 14] = [
        Category::TotalScope1ExcludingGeneration,
        Category::Scope1FromGeneration,
        Category::TotalScope2,
        Category::TotalScope3,
        Category::StationaryEnergyScope1,
        Category::StationaryEnergyScope2,
        Category::StationaryEnergyScope3,
        Category::TransportationScope1,
        Category::TransportationScope2,
        Category::TransportationScope3,
        Category::WasteWithinScope1,
        Category::WasteWithinScope3,
        Category::WasteOutsideScope1,
        Category::Basic,
    ];

    /// The sector/scope categories. Pairwise disjoint.
    pub const SECTOR_SCOPES: [Category; 9] = [
        Category::StationaryEnergyScope1,
        Category::StationaryEnergyScope2,
        Category::StationaryEnergyScope3,
        Category::TransportationScope1,
        Category::TransportationScope2,
        Category::TransportationScope3,
        Category::WasteWithinScope1,
        Category::WasteWithinScope3,
        Category::WasteOutsideScope1,
    ];

    /// The categories [`Category::Basic`] is made of.
    pub const BASIC_PARTS: [Category; 6] = [
        Category::StationaryEnergyScope1,
        Category::StationaryEnergyScope2,
        Category::TransportationScope1,
        Category::TransportationScope2,
        Category::WasteWithinScope1,
        Category::WasteOutsideScope1,
    ];

    /// Machine name, as used in config files and JSON output.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::TotalScope1ExcludingGeneration => "total_scope1_excluding_generation",
            Category::Scope1FromGeneration => "scope1_from_generation",
            Category::TotalScope2 => "total_scope2",
            Category::TotalScope3 => "total_scope3",
            Category::StationaryEnergyScope1 => "stationary_energy_scope1",
            Category::StationaryEnergyScope2 => "stationary_energy_scope2",
            Category::StationaryEnergyScope3 => "stationary_energy_scope3",
            Category::TransportationScope1 => "transportation_scope1",
            Category::TransportationScope2 => "transportation_scope2",
            Category::TransportationScope3 => "transportation_scope3",
            Category::WasteWithinScope1 => "waste_within_scope1",
            Category::WasteWithinScope3 => "waste_within_scope3",
            Category::WasteOutsideScope1 => "waste_outside_scope1",
            Category::Basic => "basic",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::TotalScope1ExcludingGeneration => {
                "Total scope 1 (excluding grid-supplied energy generation)"
            }
            Category::Scope1FromGeneration => "Scope 1 from grid-supplied energy generation",
            Category::TotalScope2 => "Total scope 2",
            Category::TotalScope3 => "Total scope 3",
            Category::StationaryEnergyScope1 => "Stationary energy, scope 1",
            Category::StationaryEnergyScope2 => "Stationary energy, scope 2",
            Category::StationaryEnergyScope3 => "Stationary energy, scope 3",
            Category::TransportationScope1 => "Transportation, scope 1",
            Category::TransportationScope2 => "Transportation, scope 2",
            Category::TransportationScope3 => "Transportation, scope 3",
            Category::WasteWithinScope1 => "Waste treated within the city, scope 1",
            Category::WasteWithinScope3 => "Waste generated in the city treated outside, scope 3",
            Category::WasteOutsideScope1 => "Waste generated outside treated within, scope 1",
            Category::Basic => "BASIC (stationary energy, transportation, waste)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == s.trim())
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

const TOTAL_SCOPE1_EXCLUDING_GENERATION: &[&str] = &[
    "I.1.1", "I.2.1", "I.3.1", "I.4.1", "I.5.1", "I.6.1", "I.7.1", "I.8.1", //
    "II.1.1", "II.2.1", "II.3.1", "II.4.1", "II.5.1", //
    "III.1.1", "III.2.1", "III.3.1", "III.4.1", //
    "III.1.3", "III.2.3", "III.3.3", "III.4.3", //
    "IV.1", "IV.2", //
    "V.1", "V.2", "V.3",
];

const SCOPE1_FROM_GENERATION: &[&str] = &["I.4.4"];

const TOTAL_SCOPE2: &[&str] = &[
    "I.1.2", "I.2.2", "I.3.2", "I.4.2", "I.5.2", "I.6.2", //
    "II.1.2", "II.2.2", "II.3.2", "II.4.2", "II.5.2",
];

const TOTAL_SCOPE3: &[&str] = &[
    "I.1.3", "I.2.3", "I.3.3", "I.4.3", "I.5.3", "I.6.3", //
    "II.1.3", "II.2.3", "II.3.3", "II.4.3", //
    "III.1.2", "III.2.2", "III.3.2", "III.4.2", //
    "VI.1",
];

const STATIONARY_ENERGY_SCOPE1: &[&str] = &[
    "I.1.1", "I.2.1", "I.3.1", "I.4.1", "I.5.1", "I.6.1", "I.7.1", "I.8.1",
];

const STATIONARY_ENERGY_SCOPE2: &[&str] = &["I.1.2", "I.2.2", "I.3.2", "I.4.2", "I.5.2", "I.6.2"];

const STATIONARY_ENERGY_SCOPE3: &[&str] = &["I.1.3", "I.2.3", "I.3.3", "I.4.3", "I.5.3", "I.6.3"];

const TRANSPORTATION_SCOPE1: &[&str] = &["II.1.1", "II.2.1", "II.3.1", "II.4.1", "II.5.1"];

const TRANSPORTATION_SCOPE2: &[&str] = &["II.1.2", "II.2.2", "II.3.2", "II.4.2", "II.5.2"];

const TRANSPORTATION_SCOPE3: &[&str] = &["II.1.3", "II.2.3", "II.3.3", "II.4.3"];

const WASTE_WITHIN_SCOPE1: &[&str] = &["III.1.1", "III.2.1", "III.3.1", "III.4.1"];

const WASTE_WITHIN_SCOPE3: &[&str] = &["III.1.2", "III.2.2", "III.3.2", "III.4.2"];

const WASTE_OUTSIDE_SCOPE1: &[&str] = &["III.1.3", "III.2.3", "III.3.3", "III.4.3"];

const BASIC: &[&str] = &[
    // stationary energy, scope 1
    "I.1.1", "I.2.1", "I.3.1", "I.4.1", "I.5.1", "I.6.1", "I.7.1", "I.8.1", //
    // stationary energy, scope 2
    "I.1.2", "I.2.2", "I.3.2", "I.4.2", "I.5.2", "I.6.2", //
    // transportation, scope 1
    "II.1.1", "II.2.1", "II.3.1", "II.4.1", "II.5.1", //
    // transportation, scope 2
    "II.1.2", "II.2.2", "II.3.2", "II.4.2", "II.5.2", //
    // waste, scope 1
    "III.1.1", "III.2.1", "III.3.1", "III.4.1", //
    "III.1.3", "III.2.3", "III.3.3", "III.4.3",
];

/// The GPC reference numbers that make up `category`.
///
/// Total over [`Category`]; every set is non-empty.
pub fn reference_numbers(category: Category) -> &'static [&'static str] {
    match category {
        Category::TotalScope1ExcludingGeneration => TOTAL_SCOPE1_EXCLUDING_GENERATION,
        Category::Scope1FromGeneration => SCOPE1_FROM_GENERATION,
        Category::TotalScope2 => TOTAL_SCOPE2,
        Category::TotalScope3 => TOTAL_SCOPE3,
        Category::StationaryEnergyScope1 => STATIONARY_ENERGY_SCOPE1,
        Category::StationaryEnergyScope2 => STATIONARY_ENERGY_SCOPE2,
        Category::StationaryEnergyScope3 => STATIONARY_ENERGY_SCOPE3,
        Category::TransportationScope1 => TRANSPORTATION_SCOPE1,
        Category::TransportationScope2 => TRANSPORTATION_SCOPE2,
        Category::TransportationScope3 => TRANSPORTATION_SCOPE3,
        Category::WasteWithinScope1 => WASTE_WITHIN_SCOPE1,
        Category::WasteWithinScope3 => WASTE_WITHIN_SCOPE3,
        Category::WasteOutsideScope1 => WASTE_OUTSIDE_SCOPE1,
        Category::Basic => BASIC,
    }
}
