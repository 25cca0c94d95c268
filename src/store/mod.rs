//! store
//!
//! Read access to inventory data.
//!
//! # Architecture
//!
//! The roll-up never writes inventory data; it needs two queries: look up an
//! inventory, and list its line items for a set of GPC reference numbers.
//! The `InventoryStore` trait captures exactly that, so the database behind
//! CityCatalyst stays an external collaborator.
//!
//! # Modules
//!
//! - `traits`: The `InventoryStore` trait and `StoreError`
//! - [`memory`]: In-memory store, loadable from a JSON fixture file

pub mod memory;
mod traits;

pub use memory::MemoryInventoryStore;
pub use traits::*;
