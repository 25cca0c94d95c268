//! store::memory
//!
//! In-memory inventory store.
//!
//! # Fixture Format
//!
//! ```json
//! {
//!   "inventories": [
//!     { "id": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11", "cityName": "Lagos", "country": "Nigeria" }
//!   ],
//!   "values": [
//!     { "inventoryId": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11", "gpcReferenceNumber": "I.1.1", "co2eq": "1200" }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use citycatalyst_cdp::core::types::{Co2eq, Inventory, InventoryId, InventoryLineItem};
//! use citycatalyst_cdp::store::{InventoryStore, MemoryInventoryStore};
//!
//! # tokio_test::block_on(async {
//! let id = InventoryId::new_v4();
//! let store = MemoryInventoryStore::new()
//!     .with_inventory(Inventory { id, city_name: "Lagos".into(), country: "Nigeria".into() })
//!     .with_item(InventoryLineItem {
//!         inventory_id: id,
//!         reference_number: "I.1.1".into(),
//!         co2eq: Some(Co2eq::new(5)),
//!     });
//!
//! let items = store.line_items(&id, &["I.1.1", "I.2.1"]).await.unwrap();
//! assert_eq!(items.len(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{InventoryStore, StoreError};
use crate::core::types::{Inventory, InventoryId, InventoryLineItem};

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryData {
    pub inventories: Vec<Inventory>,
    pub values: Vec<InventoryLineItem>,
}

/// In-memory inventory store.
///
/// Immutable once built, so it is shared without locking.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventoryStore {
    inventories: HashMap<InventoryId, Inventory>,
    items: HashMap<InventoryId, Vec<InventoryLineItem>>,
}

impl MemoryInventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fixture contents.
    pub fn from_data(data: InventoryData) -> Self {
        let mut store = Self::new();
        for inventory in data.inventories {
            store.inventories.insert(inventory.id, inventory);
        }
        for item in data.values {
            store.items.entry(item.inventory_id).or_default().push(item);
        }
        store
    }

    /// Load a store from a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` or `StoreError::Parse` with the path.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let data: InventoryData =
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_data(data))
    }

    /// Add an inventory.
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventories.insert(inventory.id, inventory);
        self
    }

    /// Add a line item.
    pub fn with_item(mut self, item: InventoryLineItem) -> Self {
        self.items.entry(item.inventory_id).or_default().push(item);
        self
    }

    /// Number of inventories held.
    pub fn inventory_count(&self) -> usize {
        self.inventories.len()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn inventory(&self, id: &InventoryId) -> Result<Option<Inventory>, StoreError> {
        Ok(self.inventories.get(id).cloned())
    }

    async fn line_items(
        &self,
        id: &InventoryId,
        reference_numbers: &[&str],
    ) -> Result<Vec<InventoryLineItem>, StoreError> {
        let items = match self.items.get(id) {
            Some(items) => items,
            None => return Ok(Vec::new()),
        };

        Ok(items
            .iter()
            .filter(|item| reference_numbers.contains(&item.reference_number.as_str()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Co2eq;

    fn item(id: InventoryId, refno: &str, value: Option<i128>) -> InventoryLineItem {
        InventoryLineItem {
            inventory_id: id,
            reference_number: refno.to_string(),
            co2eq: value.map(Co2eq::new),
        }
    }

    #[tokio::test]
    async fn filters_by_inventory_and_reference_number() {
        let a = InventoryId::new_v4();
        let b = InventoryId::new_v4();
        let store = MemoryInventoryStore::new()
            .with_item(item(a, "I.1.1", Some(1)))
            .with_item(item(a, "II.1.1", Some(2)))
            .with_item(item(b, "I.1.1", Some(4)));

        let items = store.line_items(&a, &["I.1.1"]).await.unwrap();

        assert_eq!(items, vec![item(a, "I.1.1", Some(1))]);
    }

    #[tokio::test]
    async fn unknown_inventory_has_no_items() {
        let store = MemoryInventoryStore::new();
        let items = store
            .line_items(&InventoryId::new_v4(), &["I.1.1"])
            .await
            .unwrap();
        assert!(items.is_empty());
        assert!(store.inventory(&InventoryId::new_v4()).await.unwrap().is_none());
    }

    #[test]
    fn load_reads_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{
                "inventories": [
                    {"id": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11", "cityName": "Lagos", "country": "Nigeria"}
                ],
                "values": [
                    {"inventoryId": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11", "gpcReferenceNumber": "I.1.1", "co2eq": "12"},
                    {"inventoryId": "1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11", "gpcReferenceNumber": "I.2.1", "co2eq": null}
                ]
            }"#,
        )
        .unwrap();

        let store = MemoryInventoryStore::load(&path).unwrap();

        assert_eq!(store.inventory_count(), 1);
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            MemoryInventoryStore::load(&path),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MemoryInventoryStore::load(&dir.path().join("nope.json")),
            Err(StoreError::Read { .. })
        ));
    }
}
