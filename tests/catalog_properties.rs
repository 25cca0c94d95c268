//! Property-based tests for the catalog and the aggregator.
//!
//! These tests use proptest to check that totals are additive over
//! disjoint reference-number sets and that roll-ups equal their parts.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use citycatalyst_cdp::aggregate::{sum_line_items, EmissionsAggregator};
use citycatalyst_cdp::core::catalog::{reference_numbers, Category};
use citycatalyst_cdp::core::types::{Co2eq, InventoryId, InventoryLineItem};
use citycatalyst_cdp::store::MemoryInventoryStore;

/// Every reference number the catalog knows, deduplicated.
fn all_reference_numbers() -> Vec<&'static str> {
    Category::ALL
        .iter()
        .flat_map(|c| reference_numbers(*c).iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Strategy for one line item quantity: absent, or a non-negative mass.
fn quantity() -> impl Strategy<Value = Option<i128>> {
    prop_oneof![
        1 => Just(None),
        6 => (0i64..1_000_000_000_000).prop_map(|v| Some(v as i128)),
    ]
}

/// Strategy for line items spread over catalog reference numbers.
fn line_items() -> impl Strategy<Value = Vec<(usize, Option<i128>)>> {
    let n = all_reference_numbers().len();
    prop::collection::vec((0..n, quantity()), 0..60)
}

fn build(
    id: InventoryId,
    raw: &[(usize, Option<i128>)],
) -> (MemoryInventoryStore, Vec<InventoryLineItem>) {
    let refnos = all_reference_numbers();
    let items: Vec<InventoryLineItem> = raw
        .iter()
        .map(|(i, value)| InventoryLineItem {
            inventory_id: id,
            reference_number: refnos[*i].to_string(),
            co2eq: value.map(Co2eq::new),
        })
        .collect();
    let store = items
        .iter()
        .cloned()
        .fold(MemoryInventoryStore::new(), |s, item| s.with_item(item));
    (store, items)
}

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(fut)
}

proptest! {
    #[test]
    fn total_is_additive_over_disjoint_sets(raw in line_items(), split in 1usize..60) {
        let id = InventoryId::new_v4();
        let (store, _) = build(id, &raw);
        let aggregator = EmissionsAggregator::new(Arc::new(store));

        let refnos = all_reference_numbers();
        let split = split.min(refnos.len() - 1);
        let (a, b) = refnos.split_at(split);

        let (ta, tb, tab) = block_on(async {
            (
                aggregator.total_for(&id, a).await.unwrap(),
                aggregator.total_for(&id, b).await.unwrap(),
                aggregator.total_for(&id, &refnos).await.unwrap(),
            )
        });

        prop_assert_eq!(ta.checked_add(tb), Some(tab));
    }

    #[test]
    fn basic_equals_sum_of_its_parts(raw in line_items()) {
        let id = InventoryId::new_v4();
        let (store, _) = build(id, &raw);
        let aggregator = EmissionsAggregator::new(Arc::new(store));

        let (basic, parts) = block_on(async {
            let basic = aggregator.total_for_category(&id, Category::Basic).await.unwrap();
            let mut parts = Co2eq::ZERO;
            for part in Category::BASIC_PARTS {
                let total = aggregator.total_for_category(&id, part).await.unwrap();
                parts = parts.checked_add(total).unwrap();
            }
            (basic, parts)
        });

        prop_assert_eq!(basic, parts);
    }

    #[test]
    fn sector_scopes_never_double_count(raw in line_items()) {
        let id = InventoryId::new_v4();
        let (store, items) = build(id, &raw);
        let aggregator = EmissionsAggregator::new(Arc::new(store));

        let sector_refnos: BTreeSet<&str> = Category::SECTOR_SCOPES
            .iter()
            .flat_map(|c| reference_numbers(*c).iter().copied())
            .collect();
        let expected = sum_line_items(
            items
                .iter()
                .filter(|i| sector_refnos.contains(i.reference_number.as_str())),
        )
        .unwrap();

        let summed = block_on(async {
            let totals = aggregator
                .totals_for(&id, &Category::SECTOR_SCOPES)
                .await
                .unwrap();
            let sum = totals
                .iter()
                .try_fold(Co2eq::ZERO, |acc, (_, v)| acc.checked_add(v))
                .unwrap();
            sum
        });

        prop_assert_eq!(summed, expected);
    }
}

#[tokio::test]
async fn basic_over_literal_items_equals_literal_sum() {
    let id = InventoryId::new_v4();
    let basic = reference_numbers(Category::Basic);
    let store = basic
        .iter()
        .enumerate()
        .fold(MemoryInventoryStore::new(), |store, (i, refno)| {
            store.with_item(InventoryLineItem {
                inventory_id: id,
                reference_number: refno.to_string(),
                co2eq: Some(Co2eq::new(10 * (i as i128 + 1))),
            })
        });
    let aggregator = EmissionsAggregator::new(Arc::new(store));

    let n = basic.len() as i128;
    let expected = 10 * n * (n + 1) / 2;

    assert_eq!(
        aggregator.total_for_category(&id, Category::Basic).await,
        Ok(Co2eq::new(expected))
    );
}

#[tokio::test]
async fn small_literal_sum_is_exact() {
    let id = InventoryId::new_v4();
    let store = [1, 2, 3]
        .into_iter()
        .fold(MemoryInventoryStore::new(), |store, v| {
            store.with_item(InventoryLineItem {
                inventory_id: id,
                reference_number: "I.1.1".to_string(),
                co2eq: Some(Co2eq::new(v)),
            })
        });
    let aggregator = EmissionsAggregator::new(Arc::new(store));

    assert_eq!(
        aggregator.total_for(&id, &["I.1.1"]).await,
        Ok(Co2eq::new(6))
    );
}
