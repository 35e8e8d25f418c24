//! Task Framework Integration Tests
//!
//! These tests require a running Postgres instance:
//! set EL_TEST_DATABASE_URL and run with `cargo test -- --ignored`.

use std::time::Duration;

use el_tasks::{PgLockService, PgTaskLogStore, TaskOutcome};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let url = std::env::var("EL_TEST_DATABASE_URL").expect("EL_TEST_DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&url)
        .await
        .expect("failed to connect to test database")
}

#[tokio::test]
#[ignore = "requires Postgres (EL_TEST_DATABASE_URL)"]
async fn test_second_try_lock_fails_while_held() {
    let pool = test_pool().await;
    let service = PgLockService::new(pool);

    let first = service.try_lock("el:test:exclusive").await.unwrap();
    assert!(first.is_some());

    // Exactly one holder at a time
    let second = service.try_lock("el:test:exclusive").await.unwrap();
    assert!(second.is_none());

    first.unwrap().release().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Postgres (EL_TEST_DATABASE_URL)"]
async fn test_lock_reacquirable_after_release() {
    let pool = test_pool().await;
    let service = PgLockService::new(pool);

    let guard = service.try_lock("el:test:release").await.unwrap().unwrap();
    guard.release().await.unwrap();

    let again = service.try_lock("el:test:release").await.unwrap();
    assert!(again.is_some());
    again.unwrap().release().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Postgres (EL_TEST_DATABASE_URL)"]
async fn test_dropped_guard_releases_via_session_close() {
    let pool = test_pool().await;
    let service = PgLockService::new(pool);

    {
        let _guard = service.try_lock("el:test:drop").await.unwrap().unwrap();
        // Dropped without release(); the closed session frees the lock
    }

    // Session teardown is asynchronous server-side; allow a moment
    tokio::time::sleep(Duration::from_millis(500)).await;

    let reacquired = service.try_lock("el:test:drop").await.unwrap();
    assert!(reacquired.is_some());
    reacquired.unwrap().release().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Postgres (EL_TEST_DATABASE_URL)"]
async fn test_execution_log_lifecycle() {
    let pool = test_pool().await;
    let store = PgTaskLogStore::new(pool);
    store.init_schema().await.unwrap();

    let log = store.insert_started("integration_test_task").await.unwrap();
    assert!(log.finished_at.is_none());

    store
        .complete(log.id, TaskOutcome::Success, None)
        .await
        .unwrap();

    let recent = store.recent(10).await.unwrap();
    let entry = recent.iter().find(|l| l.id == log.id).unwrap();
    assert_eq!(entry.outcome, Some(TaskOutcome::Success));
    assert!(entry.finished_at.is_some());

    // Completion is single-shot; a second complete must not overwrite
    store
        .complete(log.id, TaskOutcome::Failed, Some("late"))
        .await
        .unwrap();
    let recent = store.recent(10).await.unwrap();
    let entry = recent.iter().find(|l| l.id == log.id).unwrap();
    assert_eq!(entry.outcome, Some(TaskOutcome::Success));
}
