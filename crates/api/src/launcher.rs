//! Fire-and-forget launcher for the external estimator script.
//!
//! The submission handler hands each new request to [`EstimatorLauncher::launch`],
//! which detaches a supervisor task and returns immediately. The supervisor
//! tracks the full process lifecycle in the `status` column:
//!
//! 1. Mark the request `running`.
//! 2. Spawn `<command> [<script>] <input-csv> <record-id>` and wait, bounded
//!    by the configured timeout.
//! 3. Record the terminal status: exit 0 -> `completed`, non-zero ->
//!    `failed`, timeout -> `timed_out`, spawn failure -> `failed`.
//!
//! Launch failures are logged, never surfaced to the submitting client. The
//! estimator writes its result back to the row itself; the supervisor only
//! observes the process.

use std::time::Duration;

use sqlx::PgPool;

use estimator_core::input;
use estimator_core::runner::{self, RunError, RunRequest};
use estimator_core::types::DbId;
use estimator_db::models::estimate_request::RequestStatus;
use estimator_db::repositories::EstimateRequestRepo;

use crate::config::EstimatorConfig;

/// Launches and supervises external estimator processes.
pub struct EstimatorLauncher {
    pool: PgPool,
    config: EstimatorConfig,
}

impl EstimatorLauncher {
    pub fn new(pool: PgPool, config: EstimatorConfig) -> Self {
        Self { pool, config }
    }

    /// Launch the estimator for a request, fire-and-forget.
    ///
    /// Returns as soon as the supervisor task is spawned; completion and
    /// failure are only observable through the `status` column and logs.
    pub fn launch(&self, request_id: DbId, input_values: &[f64]) {
        let request = self.build_run_request(request_id, input_values);
        let pool = self.pool.clone();

        tokio::spawn(async move {
            supervise(pool, request_id, request).await;
        });
    }

    /// Build the subprocess invocation for a request.
    fn build_run_request(&self, request_id: DbId, input_values: &[f64]) -> RunRequest {
        let mut args = Vec::new();
        if let Some(script) = &self.config.script {
            args.push(script.clone());
        }
        args.push(input::encode_argv(input_values));
        args.push(request_id.to_string());

        RunRequest {
            program: self.config.command.clone(),
            args,
            working_dir: self.config.working_dir.clone(),
            timeout: Duration::from_secs(self.config.timeout_secs),
        }
    }
}

/// Run one estimator process to completion and record its terminal status.
async fn supervise(pool: PgPool, request_id: DbId, request: RunRequest) {
    if let Err(err) = EstimateRequestRepo::set_status(&pool, request_id, RequestStatus::Running).await
    {
        tracing::error!(request_id, error = %err, "Failed to mark request running");
        return;
    }

    tracing::info!(
        request_id,
        program = %request.program,
        args = ?request.args,
        "Launching estimator",
    );

    let terminal = match runner::run(&request).await {
        Ok(outcome) => {
            if !outcome.stdout.is_empty() {
                tracing::debug!(request_id, stdout = %outcome.stdout, "Estimator stdout");
            }
            if !outcome.stderr.is_empty() {
                tracing::warn!(request_id, stderr = %outcome.stderr, "Estimator stderr");
            }

            if outcome.success() {
                tracing::info!(
                    request_id,
                    duration_ms = outcome.duration_ms,
                    "Estimator completed",
                );
                RequestStatus::Completed
            } else {
                tracing::warn!(
                    request_id,
                    exit_code = outcome.exit_code,
                    "Estimator exited with non-zero code",
                );
                RequestStatus::Failed
            }
        }
        Err(RunError::Timeout { elapsed_ms }) => {
            tracing::warn!(request_id, elapsed_ms, "Estimator timed out, killed");
            RequestStatus::TimedOut
        }
        Err(err) => {
            tracing::error!(request_id, error = %err, "Estimator launch failed");
            RequestStatus::Failed
        }
    };

    if let Err(err) = EstimateRequestRepo::set_status(&pool, request_id, terminal).await {
        tracing::error!(request_id, error = %err, "Failed to record terminal status");
    }
}
