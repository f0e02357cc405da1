//! Handlers for estimation submission and result polling.
//!
//! One mutation (submit + launch) and three polled queries (raw result,
//! full latest record, derived accuracy report).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use estimator_core::input::EstimateInput;
use estimator_core::metrics::{self, AccuracyReport};
use estimator_db::models::estimate_request::EstimateRequest;
use estimator_db::repositories::EstimateRequestRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /estimates — submit an input and launch the estimator
// ---------------------------------------------------------------------------

/// Persist a new estimation request and launch the external estimator.
///
/// The launch is fire-and-forget: the response carries the created record
/// (with its identifier) and says nothing about estimator progress. Launch
/// failures are logged and recorded in `status`, never surfaced here.
pub async fn create_estimate(
    State(state): State<AppState>,
    Json(input): Json<EstimateInput>,
) -> AppResult<impl IntoResponse> {
    // CoreError auto-converts to AppError via #[from]; invalid ranges are
    // rejected here, before any row is created.
    let values = input.expand()?;

    let record = EstimateRequestRepo::create(&state.pool, &values).await?;

    tracing::info!(
        request_id = record.id,
        value_count = values.len(),
        "Estimation request created",
    );

    state.launcher.launch(record.id, &values);

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// GET /estimates/latest/result — poll for the latest raw result
// ---------------------------------------------------------------------------

/// Return the latest request's result values, or null when no request
/// exists or the latest result has not been written back yet.
///
/// Always "latest by creation time"; cannot distinguish "not yet computed"
/// from "will never be computed" -- poll the full record for that.
pub async fn latest_result(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let result = EstimateRequestRepo::latest_result(&state.pool).await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// GET /estimates/latest — poll the full latest record
// ---------------------------------------------------------------------------

/// Return the most recently created request in full (or null), exposing
/// `status` so clients can tell a running estimator from a dead one.
pub async fn latest_record(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let record: Option<EstimateRequest> = EstimateRequestRepo::find_latest(&state.pool).await?;
    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// GET /estimates/latest/report — derived accuracy report
// ---------------------------------------------------------------------------

/// Shape of a finished estimation as reported to the frontend.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LatestReport {
    /// A scalar submission produced a single value; no metrics apply.
    Scalar { value: f64 },
    /// A range submission produced (input, predicted, actual) triples.
    Report(AccuracyReport),
}

/// Derive MAPE/SMAPE and scatter points from the latest finished result.
///
/// Null while no result exists. A single-element result is passed through
/// as a scalar; anything else must encode triples, and a length that is not
/// a multiple of three is rejected as a malformed estimator write-back.
pub async fn latest_report(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let result = EstimateRequestRepo::latest_result(&state.pool).await?;

    let report = match result {
        None => None,
        Some(values) if values.len() == 1 => Some(LatestReport::Scalar { value: values[0] }),
        Some(values) => Some(LatestReport::Report(metrics::derive_report(&values)?)),
    };

    Ok(Json(DataResponse { data: report }))
}
