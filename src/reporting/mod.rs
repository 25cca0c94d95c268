//! reporting
//!
//! Abstraction for the external CDP reporting service.
//!
//! # Architecture
//!
//! The `ReportingService` trait defines the four operations the roll-up
//! needs from CDP: resolve a city, fetch its questionnaire, submit a
//! single-select answer, and submit a matrix. The report builder only ever
//! sees the trait; [`create_reporting_service`] picks the implementation.
//!
//! # Modules
//!
//! - `traits`: Core `ReportingService` trait and questionnaire types
//! - [`cdp`]: JSON/HTTP client for the CDP API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Client selection from configuration

pub mod cdp;
mod factory;
pub mod mock;
mod traits;

pub use factory::create_reporting_service;
pub use traits::*;
