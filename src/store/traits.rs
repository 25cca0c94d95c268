//! store::traits
//!
//! The inventory store trait.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{Inventory, InventoryId, InventoryLineItem};

/// Errors from inventory store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("inventory store unavailable: {0}")]
    Unavailable(String),

    /// A fixture file could not be read.
    #[error("failed to read inventory data '{path}': {message}")]
    Read { path: PathBuf, message: String },

    /// A fixture file is malformed.
    #[error("failed to parse inventory data '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Read-only access to inventories and their line items.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one store is shared by every
/// request handler.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Look up an inventory.
    ///
    /// Returns `None` if no inventory has this id.
    async fn inventory(&self, id: &InventoryId) -> Result<Option<Inventory>, StoreError>;

    /// List the line items of `id` whose reference number is one of
    /// `reference_numbers`.
    ///
    /// Unknown inventories and unmatched reference numbers yield an empty list.
    async fn line_items(
        &self,
        id: &InventoryId,
        reference_numbers: &[&str],
    ) -> Result<Vec<InventoryLineItem>, StoreError>;
}
