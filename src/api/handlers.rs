//! api::handlers
//!
//! Route handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::aggregate::RowTotals;
use crate::core::types::{InventoryId, ReportingMode};

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
}

#[derive(Serialize, Debug)]
pub struct PreviewResponse {
    pub inventory_id: InventoryId,
    pub schema_version: String,
    pub totals: RowTotals,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: ReportingMode,
}

fn parse_inventory(raw: &str) -> ApiResult<InventoryId> {
    raw.parse()
        .map_err(|e: crate::core::types::TypeError| ApiError::BadRequest(e.to_string()))
}

/// `POST /api/v0/inventory/{inventory}/cdp`
pub async fn submit_cdp(
    State(state): State<AppState>,
    Path(inventory): Path<String>,
) -> ApiResult<Json<SubmitResponse>> {
    let inventory_id = parse_inventory(&inventory)?;
    let report = state.builder.submit(&inventory_id).await?;

    info!(
        inventory_id = %report.inventory_id,
        city_id = %report.city_id,
        "CDP submission accepted"
    );
    Ok(Json(SubmitResponse { success: true }))
}

/// `GET /api/v0/inventory/{inventory}/cdp/preview`
pub async fn preview_cdp(
    State(state): State<AppState>,
    Path(inventory): Path<String>,
) -> ApiResult<Json<PreviewResponse>> {
    let inventory_id = parse_inventory(&inventory)?;
    let totals = state.builder.preview(&inventory_id).await?;

    Ok(Json(PreviewResponse {
        inventory_id,
        schema_version: state.builder.layout().schema_version.clone(),
        totals,
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.builder.mode(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inventory_rejects_garbage() {
        assert!(matches!(
            parse_inventory("not-a-uuid"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn parse_inventory_accepts_uuid() {
        let id = InventoryId::new_v4();
        assert_eq!(parse_inventory(&id.to_string()).unwrap(), id);
    }
}
