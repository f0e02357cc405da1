//! Integration tests for the estimator launcher supervisor.
//!
//! The "estimator" under test is a plain shell command, exercising the
//! status lifecycle without a Python toolchain.

use std::time::Duration;

use sqlx::PgPool;

use estimator_api::config::EstimatorConfig;
use estimator_api::launcher::EstimatorLauncher;
use estimator_db::repositories::EstimateRequestRepo;

fn stub_estimator(command: &str, timeout_secs: u64) -> EstimatorConfig {
    EstimatorConfig {
        command: command.to_string(),
        script: None,
        working_dir: None,
        timeout_secs,
    }
}

/// Poll the request row until its status is terminal (or give up).
async fn wait_for_terminal(pool: &PgPool, id: i64) -> String {
    for _ in 0..100 {
        let row = EstimateRequestRepo::find_by_id(pool, id)
            .await
            .unwrap()
            .unwrap();
        if matches!(row.status.as_str(), "completed" | "failed" | "timed_out") {
            return row.status;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("request {id} never reached a terminal status");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn successful_run_is_marked_completed(pool: PgPool) {
    let launcher = EstimatorLauncher::new(pool.clone(), stub_estimator("true", 5));
    let record = EstimateRequestRepo::create(&pool, &[7.0]).await.unwrap();

    launcher.launch(record.id, &record.input);

    assert_eq!(wait_for_terminal(&pool, record.id).await, "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn nonzero_exit_is_marked_failed(pool: PgPool) {
    let launcher = EstimatorLauncher::new(pool.clone(), stub_estimator("false", 5));
    let record = EstimateRequestRepo::create(&pool, &[7.0]).await.unwrap();

    launcher.launch(record.id, &record.input);

    assert_eq!(wait_for_terminal(&pool, record.id).await, "failed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unspawnable_command_is_marked_failed(pool: PgPool) {
    let launcher = EstimatorLauncher::new(
        pool.clone(),
        stub_estimator("definitely-not-a-real-binary", 5),
    );
    let record = EstimateRequestRepo::create(&pool, &[7.0]).await.unwrap();

    launcher.launch(record.id, &record.input);

    assert_eq!(wait_for_terminal(&pool, record.id).await, "failed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overrunning_process_is_marked_timed_out(pool: PgPool) {
    // `sleep` ignores its extra positional args (input csv and id).
    let mut config = stub_estimator("sleep", 1);
    config.script = Some("30".to_string());
    let launcher = EstimatorLauncher::new(pool.clone(), config);
    let record = EstimateRequestRepo::create(&pool, &[7.0]).await.unwrap();

    launcher.launch(record.id, &record.input);

    assert_eq!(wait_for_terminal(&pool, record.id).await, "timed_out");
}
