//! Repository for the `estimate_requests` table.

use sqlx::PgPool;

use estimator_core::types::DbId;

use crate::models::estimate_request::{EstimateRequest, RequestStatus};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const REQUEST_COLUMNS: &str = "id, input, result, status, created_at, updated_at";

/// Provides CRUD operations for estimation requests.
pub struct EstimateRequestRepo;

impl EstimateRequestRepo {
    /// Create a new request with the expanded input values and no result.
    pub async fn create(pool: &PgPool, input: &[f64]) -> Result<EstimateRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO estimate_requests (input) VALUES ($1) RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, EstimateRequest>(&query)
            .bind(input)
            .fetch_one(pool)
            .await
    }

    /// Find a request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EstimateRequest>, sqlx::Error> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM estimate_requests WHERE id = $1");
        sqlx::query_as::<_, EstimateRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the most recently created request, if any.
    ///
    /// Ties on `created_at` break on `id`, so two submissions landing in the
    /// same clock tick still resolve to the later insert.
    pub async fn find_latest(pool: &PgPool) -> Result<Option<EstimateRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM estimate_requests \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, EstimateRequest>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Return the latest request's result, or `None` when no request exists
    /// or the latest result is still unset.
    pub async fn latest_result(pool: &PgPool) -> Result<Option<Vec<f64>>, sqlx::Error> {
        let row: Option<Option<Vec<f64>>> = sqlx::query_scalar(
            "SELECT result FROM estimate_requests \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;
        Ok(row.flatten())
    }

    /// Advance the launcher lifecycle status of a request.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: RequestStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE estimate_requests SET status = $1, updated_at = now() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Write a result back to a request.
    ///
    /// In production this is done by the external estimator over its own
    /// connection; the repository method exists for tests and tooling.
    pub async fn set_result(pool: &PgPool, id: DbId, result: &[f64]) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE estimate_requests SET result = $1, updated_at = now() WHERE id = $2",
        )
        .bind(result)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
