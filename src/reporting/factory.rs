//! reporting::factory
//!
//! Reporting service selection and creation.
//!
//! # Design
//!
//! Only [`ReportingMode::Test`] talks to the network. Other modes get an
//! unconfigured client: the report builder refuses those modes before any
//! call is made, and the unconfigured client fails loudly if that ever
//! changes.

use std::sync::Arc;

use super::cdp::CdpClient;
use super::traits::ReportingService;
use crate::core::config::Config;
use crate::core::types::ReportingMode;

/// Create the reporting service described by `config`.
///
/// # Example
///
/// ```
/// use citycatalyst_cdp::core::config::Config;
/// use citycatalyst_cdp::reporting::create_reporting_service;
///
/// let service = create_reporting_service(&Config::default());
/// assert_eq!(service.name(), "cdp");
/// ```
pub fn create_reporting_service(config: &Config) -> Arc<dyn ReportingService> {
    match (config.mode(), config.api_base()) {
        (ReportingMode::Test, Some(base)) => {
            Arc::new(CdpClient::new(base, config.api_token().map(str::to_string)))
        }
        _ => Arc::new(CdpClient::unconfigured()),
    }
}
