//! aggregate
//!
//! CO2-equivalent roll-up of inventory line items.
//!
//! # Design
//!
//! [`EmissionsAggregator::total_for`] is a read followed by a reduce: fetch
//! the inventory's line items for a set of GPC reference numbers, then add
//! their quantities with checked integer arithmetic. A line item without a
//! quantity counts as zero, and an inventory with no matching items totals
//! zero. Neither is an error.
//!
//! Summation is exact, so totals are additive: for disjoint reference sets
//! A and B, `total(A) + total(B) == total(A ∪ B)`.
//!
//! [`EmissionsAggregator::totals_for`] computes several categories at once.
//! The queries are independent reads and run concurrently.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use citycatalyst_cdp::aggregate::EmissionsAggregator;
//! use citycatalyst_cdp::core::types::{Co2eq, InventoryId, InventoryLineItem};
//! use citycatalyst_cdp::store::MemoryInventoryStore;
//!
//! # tokio_test::block_on(async {
//! let id = InventoryId::new_v4();
//! let store = MemoryInventoryStore::new().with_item(InventoryLineItem {
//!     inventory_id: id,
//!     reference_number: "I.1.1".into(),
//!     co2eq: Some(Co2eq::new(100)),
//! });
//! let aggregator = EmissionsAggregator::new(Arc::new(store));
//!
//! let total = aggregator.total_for(&id, &["I.1.1", "I.2.1"]).await.unwrap();
//! assert_eq!(total, Co2eq::new(100));
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use thiserror::Error;

use crate::core::catalog::{reference_numbers, Category};
use crate::core::types::{Co2eq, InventoryId, InventoryLineItem};
use crate::store::{InventoryStore, StoreError};

/// Errors from aggregation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// No reference numbers were given.
    #[error("reference number set is empty")]
    EmptyReferenceSet,

    /// The sum does not fit in the quantity type.
    #[error("CO2eq total overflowed after {items} line items")]
    Overflow { items: usize },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sum the quantities of `items`, counting absent quantities as zero.
///
/// # Errors
///
/// Returns `AggregateError::Overflow` if the sum does not fit.
pub fn sum_line_items<'a>(
    items: impl IntoIterator<Item = &'a InventoryLineItem>,
) -> Result<Co2eq, AggregateError> {
    let mut total = Co2eq::ZERO;
    for (index, item) in items.into_iter().enumerate() {
        if let Some(value) = item.co2eq {
            total = total
                .checked_add(value)
                .ok_or(AggregateError::Overflow { items: index + 1 })?;
        }
    }
    Ok(total)
}

/// Totals per category for one inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowTotals(BTreeMap<Category, Co2eq>);

impl RowTotals {
    /// Total for a category, if it was computed.
    pub fn get(&self, category: Category) -> Option<Co2eq> {
        self.0.get(&category).copied()
    }

    /// Iterate totals in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Co2eq)> + '_ {
        self.0.iter().map(|(c, v)| (*c, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Category, Co2eq)> for RowTotals {
    fn from_iter<I: IntoIterator<Item = (Category, Co2eq)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Sums CO2eq for one inventory over reference-number sets.
#[derive(Clone)]
pub struct EmissionsAggregator {
    store: Arc<dyn InventoryStore>,
}

impl std::fmt::Debug for EmissionsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmissionsAggregator").finish_non_exhaustive()
    }
}

impl EmissionsAggregator {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Total CO2eq of `inventory_id` over `reference_numbers`.
    ///
    /// Returns zero when nothing matches.
    ///
    /// # Errors
    ///
    /// - `EmptyReferenceSet` if `reference_numbers` is empty
    /// - `Overflow` if the total does not fit
    /// - `Store` if the store query fails
    pub async fn total_for(
        &self,
        inventory_id: &InventoryId,
        reference_numbers: &[&str],
    ) -> Result<Co2eq, AggregateError> {
        if reference_numbers.is_empty() {
            return Err(AggregateError::EmptyReferenceSet);
        }

        let items = self
            .store
            .line_items(inventory_id, reference_numbers)
            .await?;
        let total = sum_line_items(&items)?;

        tracing::debug!(
            inventory_id = %inventory_id,
            reference_numbers = reference_numbers.len(),
            items = items.len(),
            total = %total,
            "aggregated line items"
        );
        Ok(total)
    }

    /// Total CO2eq of `inventory_id` for one catalog category.
    pub async fn total_for_category(
        &self,
        inventory_id: &InventoryId,
        category: Category,
    ) -> Result<Co2eq, AggregateError> {
        self.total_for(inventory_id, reference_numbers(category))
            .await
    }

    /// Totals for several categories, computed concurrently.
    pub async fn totals_for(
        &self,
        inventory_id: &InventoryId,
        categories: &[Category],
    ) -> Result<RowTotals, AggregateError> {
        let totals = try_join_all(categories.iter().map(|&category| async move {
            let total = self.total_for_category(inventory_id, category).await?;
            Ok::<_, AggregateError>((category, total))
        }))
        .await?;

        Ok(totals.into_iter().collect())
    }
}
