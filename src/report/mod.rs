//! report
//!
//! Builds and submits the CDP emissions report for one inventory.
//!
//! # Lifecycle
//!
//! [`CdpReportBuilder::submit`] runs a single pass with no retries:
//!
//! 1. **Gate**: only [`ReportingMode::Test`] proceeds. `Disabled` and
//!    `Production` fail with [`ReportError::Config`] before any I/O.
//! 2. **Resolve target**: load the inventory, resolve its CDP city id.
//! 3. **Fetch schema**: fetch the questionnaire for that city.
//! 4. **Locate anchors**: match the questionnaire against the layout.
//! 5. **Aggregate**: total every [`Category`] (concurrently).
//! 6. **Submit**: the "yes" answer, then, only once it succeeded, the matrix.
//!
//! Every CDP call runs under the configured timeout. Service errors,
//! timeouts and layout mismatches all become [`ReportError::Dependency`].
//! A service with no endpoint is a [`ReportError::Config`] instead.
//!
//! # Example
//!
//! ```ignore
//! let builder = CdpReportBuilder::new(ReportingMode::Test, store, service)
//!     .with_timeout(Duration::from_secs(10));
//! let report = builder.submit(&inventory_id).await?;
//! println!("submitted for CDP city {}", report.city_id);
//! ```

pub mod layout;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::aggregate::{AggregateError, EmissionsAggregator, RowTotals};
use crate::core::catalog::Category;
use crate::core::config::DEFAULT_TIMEOUT_SECS;
use crate::core::types::{Inventory, InventoryId, ReportingMode};
use crate::reporting::{
    CityId, MatrixAnswer, MatrixCell, ReportingError, ReportingService, SingleSelectAnswer,
};
use crate::store::{InventoryStore, StoreError};

pub use layout::{Anchors, LayoutError, QuestionnaireLayout};

/// A step of the submission that talks to CDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResolveCity,
    FetchQuestionnaire,
    LocateAnchors,
    SubmitAnswer,
    SubmitMatrix,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolveCity => "resolve city",
            Stage::FetchQuestionnaire => "fetch questionnaire",
            Stage::LocateAnchors => "locate questionnaire anchors",
            Stage::SubmitAnswer => "submit inventory answer",
            Stage::SubmitMatrix => "submit emissions matrix",
        };
        write!(f, "{}", name)
    }
}

/// Errors from building or submitting a report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Reporting is switched off, the mode is not available, or the
    /// reporting service has no endpoint.
    #[error("CDP reporting misconfigured: {0}")]
    Config(String),

    /// The inventory does not exist.
    #[error("inventory {0} not found")]
    InventoryNotFound(InventoryId),

    /// CDP failed, timed out, or returned a questionnaire we cannot map.
    #[error("CDP {stage} failed: {detail}")]
    Dependency { stage: Stage, detail: String },

    /// Totals could not be computed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The inventory store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReportError {
    /// HTTP status code that represents this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ReportError::Config(_) => 500,
            ReportError::InventoryNotFound(_) => 404,
            ReportError::Dependency { .. } => 424,
            ReportError::Aggregate(_) | ReportError::Store(_) => 500,
        }
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub inventory_id: InventoryId,
    pub city_id: CityId,
    pub schema_version: String,
    pub totals: RowTotals,
    pub submitted_at: DateTime<Utc>,
}

/// Orchestrates the CDP submission for inventories.
pub struct CdpReportBuilder {
    mode: ReportingMode,
    store: Arc<dyn InventoryStore>,
    aggregator: EmissionsAggregator,
    service: Arc<dyn ReportingService>,
    layout: QuestionnaireLayout,
    timeout: Duration,
}

impl fmt::Debug for CdpReportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpReportBuilder")
            .field("mode", &self.mode)
            .field("service", &self.service.name())
            .field("schema_version", &self.layout.schema_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CdpReportBuilder {
    /// Create a builder with the default layout and timeout.
    pub fn new(
        mode: ReportingMode,
        store: Arc<dyn InventoryStore>,
        service: Arc<dyn ReportingService>,
    ) -> Self {
        Self {
            mode,
            aggregator: EmissionsAggregator::new(store.clone()),
            store,
            service,
            layout: QuestionnaireLayout::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Use a specific questionnaire layout.
    pub fn with_layout(mut self, layout: QuestionnaireLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Bound each CDP call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mode(&self) -> ReportingMode {
        self.mode
    }

    pub fn layout(&self) -> &QuestionnaireLayout {
        &self.layout
    }

    /// Totals for every category, without contacting CDP.
    ///
    /// Works in every mode.
    ///
    /// # Errors
    ///
    /// - `InventoryNotFound` if the inventory does not exist
    /// - `Aggregate` / `Store` if totals cannot be computed
    pub async fn preview(&self, inventory_id: &InventoryId) -> Result<RowTotals, ReportError> {
        self.load_inventory(inventory_id).await?;
        Ok(self
            .aggregator
            .totals_for(inventory_id, &Category::ALL)
            .await?)
    }

    /// Build the report for `inventory_id` and submit it to CDP.
    pub async fn submit(
        &self,
        inventory_id: &InventoryId,
    ) -> Result<SubmissionReport, ReportError> {
        self.check_mode(inventory_id)?;

        let inventory = self.load_inventory(inventory_id).await?;

        let city_id = self
            .call(
                Stage::ResolveCity,
                inventory_id,
                None,
                self.service
                    .city_id(&inventory.city_name, &inventory.country),
            )
            .await?;
        info!(inventory_id = %inventory_id, city_id = %city_id, "resolved CDP city");

        let questionnaire = self
            .call(
                Stage::FetchQuestionnaire,
                inventory_id,
                Some(&city_id),
                self.service.questionnaire(&city_id),
            )
            .await?;

        let anchors = self.layout.locate(&questionnaire).map_err(|e| {
            error!(
                inventory_id = %inventory_id,
                city_id = %city_id,
                schema_version = %self.layout.schema_version,
                error = %e,
                "questionnaire does not match layout"
            );
            ReportError::Dependency {
                stage: Stage::LocateAnchors,
                detail: e.to_string(),
            }
        })?;

        let totals = self
            .aggregator
            .totals_for(inventory_id, &Category::ALL)
            .await
            .inspect_err(|e| {
                error!(
                    inventory_id = %inventory_id,
                    city_id = %city_id,
                    error = %e,
                    "aggregation failed"
                );
            })?;

        let answer = SingleSelectAnswer {
            question_id: anchors.inventory_question_id.clone(),
            option_id: anchors.yes_option.id.clone(),
            answer: anchors.yes_option.name.clone(),
        };
        self.call(
            Stage::SubmitAnswer,
            inventory_id,
            Some(&city_id),
            self.service.submit_single_select(&city_id, answer),
        )
        .await?;

        let matrix = build_matrix(&anchors, &totals);
        self.call(
            Stage::SubmitMatrix,
            inventory_id,
            Some(&city_id),
            self.service.submit_matrix(&city_id, matrix),
        )
        .await?;

        info!(
            inventory_id = %inventory_id,
            city_id = %city_id,
            rows = totals.len(),
            "submitted CDP emissions report"
        );

        Ok(SubmissionReport {
            inventory_id: *inventory_id,
            city_id,
            schema_version: self.layout.schema_version.clone(),
            totals,
            submitted_at: Utc::now(),
        })
    }

    fn check_mode(&self, inventory_id: &InventoryId) -> Result<(), ReportError> {
        let message = match self.mode {
            ReportingMode::Test => return Ok(()),
            ReportingMode::Disabled => "CDP reporting is disabled",
            ReportingMode::Production => "production CDP reporting is not implemented",
        };
        warn!(inventory_id = %inventory_id, mode = %self.mode, "{}", message);
        Err(ReportError::Config(message.to_string()))
    }

    async fn load_inventory(&self, inventory_id: &InventoryId) -> Result<Inventory, ReportError> {
        self.store
            .inventory(inventory_id)
            .await?
            .ok_or(ReportError::InventoryNotFound(*inventory_id))
    }

    /// Await a CDP call under the timeout, logging and mapping failures.
    async fn call<T>(
        &self,
        stage: Stage,
        inventory_id: &InventoryId,
        city_id: Option<&CityId>,
        fut: impl Future<Output = Result<T, ReportingError>>,
    ) -> Result<T, ReportError> {
        let detail = match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e @ ReportingError::NotConfigured(_))) => {
                error!(
                    inventory_id = %inventory_id,
                    stage = %stage,
                    service = self.service.name(),
                    error = %e,
                    "reporting service misconfigured"
                );
                return Err(ReportError::Config(e.to_string()));
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}s", self.timeout.as_secs_f64()),
        };

        error!(
            inventory_id = %inventory_id,
            city_id = city_id.map(CityId::as_str).unwrap_or("-"),
            stage = %stage,
            service = self.service.name(),
            "{}",
            detail
        );
        Err(ReportError::Dependency { stage, detail })
    }
}

/// The matrix answer: one cell per category in the emissions column.
pub fn build_matrix(anchors: &Anchors, totals: &RowTotals) -> MatrixAnswer {
    let rows = anchors
        .rows
        .iter()
        .map(|(category, row_id)| MatrixCell {
            row_id: row_id.clone(),
            column_id: anchors.emissions_column_id.clone(),
            value: totals.get(*category).unwrap_or_default().to_string(),
        })
        .collect();

    MatrixAnswer {
        question_id: anchors.emissions_question_id.clone(),
        rows,
    }
}
