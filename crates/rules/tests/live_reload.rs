//! Watcher-driven reloads against a real filesystem.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::{sleep, Instant};
use tracing_subscriber::EnvFilter;
use veil_core::{WatchConfig, RULES_FILE_NAME};
use veil_rules::{HideController, WatchState};

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Poll `cond` until it holds or the timeout elapses.
async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + EVENT_TIMEOUT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    cond()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watcher_tracks_create_modify_delete() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join(RULES_FILE_NAME);

    let mut controller = HideController::new(dir.path().to_path_buf(), WatchConfig::default());
    assert_eq!(controller.watch_state(), WatchState::Armed);
    controller.initialize().await;
    assert!(controller.should_show("app.log"));

    fs::write(&rules_path, "*.log\n").unwrap();
    assert!(
        eventually(|| !controller.should_show("app.log")).await,
        "creating the rules file should hide app.log"
    );

    fs::write(&rules_path, "*.tmp\n").unwrap();
    assert!(
        eventually(|| controller.should_show("app.log") && !controller.should_show("x.tmp")).await,
        "editing the rules file should swap the rules"
    );

    fs::remove_file(&rules_path).unwrap();
    assert!(
        eventually(|| controller.should_show("x.tmp")).await,
        "deleting the rules file should show everything"
    );

    controller.dispose();
    assert_eq!(controller.watch_state(), WatchState::Disposed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disposed_watcher_stops_reloading() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let mut controller = HideController::new(dir.path().to_path_buf(), WatchConfig::default());
    controller.initialize().await;
    controller.dispose();
    let generation = controller.store().generation();

    fs::write(dir.path().join(RULES_FILE_NAME), "*.log\n").unwrap();
    sleep(Duration::from_millis(500)).await;

    assert_eq!(controller.store().generation(), generation);
    assert!(controller.should_show("app.log"));
}
