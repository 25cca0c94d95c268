//! core
//!
//! Core domain types, catalog and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: InventoryId, Co2eq, line items, reporting mode
//! - [`catalog`] - GPC reference numbers per reported category
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Domain constants are literal tables, never derived
//! - Quantities use exact integer arithmetic

pub mod catalog;
pub mod config;
pub mod types;
