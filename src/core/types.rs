//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`InventoryId`] - Identifier of a city GHG inventory
//! - [`Co2eq`] - Exact CO2-equivalent mass
//! - [`InventoryLineItem`] - One recorded emission entry
//! - [`Inventory`] - The city an inventory belongs to
//! - [`ReportingMode`] - Which CDP environment submissions target
//!
//! # Validation
//!
//! These types enforce validity at construction time. An inventory id that
//! is not a UUID, or a quantity that is not an integer, cannot be represented.
//!
//! # Examples
//!
//! ```
//! use citycatalyst_cdp::core::types::{Co2eq, InventoryId};
//!
//! let id: InventoryId = "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11".parse().unwrap();
//! assert_eq!(id.to_string(), "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11");
//!
//! let total = Co2eq::new(100).checked_add(Co2eq::new(23)).unwrap();
//! assert_eq!(total, Co2eq::new(123));
//!
//! assert!("not-a-uuid".parse::<InventoryId>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid inventory id: {0}")]
    InvalidInventoryId(String),

    #[error("invalid CO2eq quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid reporting mode '{0}', must be one of: disabled, test, production")]
    InvalidMode(String),
}

/// Identifier of a city GHG inventory.
///
/// Inventories are keyed by UUID. Anything else is rejected at parse time so
/// the HTTP layer can answer 400 before touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryId(Uuid);

impl InventoryId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for InventoryId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::InvalidInventoryId(s.to_string()))
    }
}

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An exact CO2-equivalent mass.
///
/// Gas masses are normalized to integral units upstream, so quantities are
/// integers. Arithmetic is checked: a sum that does not fit is an error,
/// never a wrapped or rounded value.
///
/// Serialized as a decimal string so values beyond the range of a JSON
/// double survive transport. Deserialization also accepts plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Co2eq(i128);

impl Co2eq {
    /// Zero emissions.
    pub const ZERO: Co2eq = Co2eq(0);

    /// Create a quantity from an integer mass.
    pub const fn new(value: i128) -> Self {
        Self(value)
    }

    /// The raw integer mass.
    pub const fn value(self) -> i128 {
        self.0
    }

    /// Add two quantities, returning `None` on overflow.
    pub fn checked_add(self, other: Co2eq) -> Option<Co2eq> {
        self.0.checked_add(other.0).map(Co2eq)
    }
}

impl From<i64> for Co2eq {
    fn from(value: i64) -> Self {
        Self(i128::from(value))
    }
}

impl FromStr for Co2eq {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i128>()
            .map(Self)
            .map_err(|_| TypeError::InvalidQuantity(s.to_string()))
    }
}

impl fmt::Display for Co2eq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Co2eq {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Wire forms accepted for a quantity.
#[derive(Deserialize)]
#[serde(untagged)]
enum Co2eqRepr {
    Integer(i64),
    Unsigned(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Co2eq {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Co2eqRepr::deserialize(deserializer)? {
            Co2eqRepr::Integer(v) => Ok(Co2eq::from(v)),
            Co2eqRepr::Unsigned(v) => Ok(Co2eq::new(i128::from(v))),
            Co2eqRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One recorded activity or emission entry of an inventory.
///
/// Created by the data-entry side of CityCatalyst; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLineItem {
    /// Owning inventory
    pub inventory_id: InventoryId,
    /// GPC reference number, e.g. `II.1.3`
    #[serde(rename = "gpcReferenceNumber")]
    pub reference_number: String,
    /// CO2-equivalent quantity; absent when not yet calculated
    #[serde(default)]
    pub co2eq: Option<Co2eq>,
}

/// The city an inventory reports for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: InventoryId,
    pub city_name: String,
    pub country: String,
}

/// Which CDP environment submissions target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingMode {
    /// Submissions are refused
    #[default]
    Disabled,
    /// Submissions go to the CDP test API
    Test,
    /// Submissions would go to the live CDP API (not available)
    Production,
}

impl ReportingMode {
    /// The mode name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingMode::Disabled => "disabled",
            ReportingMode::Test => "test",
            ReportingMode::Production => "production",
        }
    }
}

impl FromStr for ReportingMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disabled" => Ok(ReportingMode::Disabled),
            "test" => Ok(ReportingMode::Test),
            "production" => Ok(ReportingMode::Production),
            _ => Err(TypeError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ReportingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod inventory_id {
        use super::*;

        #[test]
        fn parses_uuid() {
            let id: InventoryId = "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11".parse().unwrap();
            assert_eq!(id.to_string(), "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11");
        }

        #[test]
        fn trims_whitespace() {
            let id: InventoryId = " 1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11\n".parse().unwrap();
            assert_eq!(id.to_string(), "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11");
        }

        #[test]
        fn rejects_garbage() {
            assert_eq!(
                "inventory-1".parse::<InventoryId>(),
                Err(TypeError::InvalidInventoryId("inventory-1".into()))
            );
            assert!("".parse::<InventoryId>().is_err());
        }

        #[test]
        fn serializes_as_plain_string() {
            let id: InventoryId = "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11".parse().unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11\"");
        }
    }

    mod co2eq {
        use super::*;

        #[test]
        fn checked_add_overflow_is_none() {
            assert_eq!(Co2eq::new(i128::MAX).checked_add(Co2eq::new(1)), None);
            assert_eq!(
                Co2eq::new(2).checked_add(Co2eq::new(3)),
                Some(Co2eq::new(5))
            );
        }

        #[test]
        fn serializes_as_string() {
            let json = serde_json::to_string(&Co2eq::new(170_000_000_000_000_000_000)).unwrap();
            assert_eq!(json, "\"170000000000000000000\"");
        }

        #[test]
        fn deserializes_integer_and_string() {
            let from_int: Co2eq = serde_json::from_str("42").unwrap();
            let from_str: Co2eq = serde_json::from_str("\"170000000000000000000\"").unwrap();
            assert_eq!(from_int, Co2eq::new(42));
            assert_eq!(from_str, Co2eq::new(170_000_000_000_000_000_000));
        }

        #[test]
        fn deserializes_integers_above_i64() {
            let above: Co2eq = serde_json::from_str("10000000000000000000").unwrap();
            let max: Co2eq = serde_json::from_str("18446744073709551615").unwrap();
            assert_eq!(above, Co2eq::new(10_000_000_000_000_000_000));
            assert_eq!(max, Co2eq::new(i128::from(u64::MAX)));
        }

        #[test]
        fn rejects_fractional_text() {
            assert!(serde_json::from_str::<Co2eq>("\"1.5\"").is_err());
            assert!("12.0".parse::<Co2eq>().is_err());
        }
    }

    mod line_item {
        use super::*;

        #[test]
        fn missing_quantity_defaults_to_none() {
            let json = r#"{
                "inventoryId": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11",
                "gpcReferenceNumber": "I.1.1"
            }"#;
            let item: InventoryLineItem = serde_json::from_str(json).unwrap();
            assert_eq!(item.reference_number, "I.1.1");
            assert!(item.co2eq.is_none());
        }
    }

    mod reporting_mode {
        use super::*;

        #[test]
        fn default_is_disabled() {
            assert_eq!(ReportingMode::default(), ReportingMode::Disabled);
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!("TEST".parse::<ReportingMode>(), Ok(ReportingMode::Test));
            assert_eq!(
                "production".parse::<ReportingMode>(),
                Ok(ReportingMode::Production)
            );
            assert!("staging".parse::<ReportingMode>().is_err());
        }

        #[test]
        fn display_matches_config_name() {
            assert_eq!(format!("{}", ReportingMode::Disabled), "disabled");
            assert_eq!(format!("{}", ReportingMode::Test), "test");
        }
    }
}
