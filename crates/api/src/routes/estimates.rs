use axum::routing::{get, post};
use axum::Router;

use crate::handlers::estimates;
use crate::state::AppState;

/// Mount estimation routes under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/estimates", post(estimates::create_estimate))
        .route("/estimates/latest", get(estimates::latest_record))
        .route("/estimates/latest/result", get(estimates::latest_result))
        .route("/estimates/latest/report", get(estimates::latest_report))
}
