//! Request handlers.

use crate::analysis::aggregate;
use crate::api::error::ApiError;
use crate::api::validation::validate_request;
use crate::api::AppState;
use crate::models::{RegionReport, ServiceDescriptor};
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::{debug, warn};

/// `GET /`: static discovery document.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceDescriptor> {
    Json(state.descriptor.clone())
}

/// `POST /calculate-metrics`: validate the batch and summarize it per region.
pub async fn calculate_metrics(body: Bytes) -> Result<Json<RegionReport>, ApiError> {
    let request = validate_request(&body).map_err(|e| {
        warn!("Rejected malformed request: {}", e);
        ApiError::from(e)
    })?;

    let report = aggregate(&request.data).map_err(|e| {
        warn!("Rejected request: {}", e);
        ApiError::from(e)
    })?;

    debug!(
        "Aggregated {} records into {} regions",
        request.data.len(),
        report.len()
    );

    Ok(Json(report))
}
