//! CityCatalyst CDP - emissions roll-up and CDP questionnaire submission
//!
//! A city's greenhouse-gas inventory is a set of line items, each tagged with
//! a GPC reference number and carrying a CO2-equivalent quantity. This crate
//! sums those quantities into the fourteen rows of the CDP cities
//! questionnaire and submits them.
//!
//! # Architecture
//!
//! - [`core`] - Domain types, the reference-number catalog, configuration
//! - [`store`] - Read access to inventories and line items
//! - [`aggregate`] - Exact CO2eq totals over reference-number sets
//! - [`reporting`] - The CDP service trait, HTTP client and mock
//! - [`report`] - Orchestrates one submission (gate, resolve, locate, submit)
//! - [`api`] - axum HTTP surface
//! - [`cli`] - Command-line interface
//! - [`ui`] - Terminal output
//!
//! # Invariants
//!
//! 1. Totals are exact integers; overflow is an error, never a wrap
//! 2. Nothing is sent to CDP unless the mode is `test`
//! 3. The emissions matrix is only sent after the inventory answer succeeded

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod core;
pub mod report;
pub mod reporting;
pub mod store;
pub mod ui;
