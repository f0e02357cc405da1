pub mod estimates;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /estimates                      submit input, launch estimator (POST)
/// /estimates/latest               full latest record incl. status (GET)
/// /estimates/latest/result        latest raw result or null (GET, polled)
/// /estimates/latest/report        derived MAPE/SMAPE report (GET, polled)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(estimates::router())
}
