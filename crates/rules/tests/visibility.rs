//! End-to-end visibility scenarios through [`HideController`] with watching off,
//! so every reload is explicit and deterministic.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use veil_core::{VeilConfig, WatchConfig, RULES_FILE_NAME};
use veil_rules::{HideController, ReloadStatus, WatchState};

fn unwatched() -> WatchConfig {
    WatchConfig {
        enabled: false,
        ..WatchConfig::default()
    }
}

fn controller() -> (TempDir, HideController) {
    let dir = TempDir::new().expect("create tempdir");
    let controller = HideController::new(dir.path().to_path_buf(), unwatched());
    (dir, controller)
}

const SCENARIO: [&str; 4] = ["secret/token", "app.log", "keep.log", "readme.md"];

#[tokio::test]
async fn rules_then_deletion_scenario() {
    let (dir, controller) = controller();
    fs::write(dir.path().join(RULES_FILE_NAME), "secret/\n*.log\n!keep.log").unwrap();

    assert!(controller.initialize().await.is_loaded());
    let verdicts: Vec<bool> = SCENARIO.iter().map(|p| controller.should_show(p)).collect();
    assert_eq!(verdicts, vec![false, false, true, true]);

    fs::remove_file(dir.path().join(RULES_FILE_NAME)).unwrap();
    assert_eq!(controller.reload().await, ReloadStatus::Missing);
    assert!(SCENARIO.iter().all(|p| controller.should_show(p)));
}

#[tokio::test]
async fn missing_rules_file_shows_every_path() {
    let (dir, controller) = controller();
    controller.initialize().await;

    let paths = [
        "anything",
        "deep/nested/file.rs",
        RULES_FILE_NAME,
        "../outside",
    ];
    assert!(paths.iter().all(|p| controller.should_show(p)));
    assert!(controller.should_show(dir.path().join("x.log")));
}

#[tokio::test]
async fn rules_file_hides_itself() {
    let (dir, controller) = controller();
    fs::write(dir.path().join(RULES_FILE_NAME), "node_modules/\n").unwrap();
    controller.initialize().await;

    assert!(!controller.should_show(RULES_FILE_NAME));
    assert!(!controller.should_show(dir.path().join(RULES_FILE_NAME)));
}

#[tokio::test]
async fn batch_filter_keeps_visible_paths_in_order() {
    let (dir, controller) = controller();
    fs::write(dir.path().join(RULES_FILE_NAME), "b.txt\n").unwrap();
    controller.initialize().await;

    assert_eq!(
        controller.filter_paths(&["a.txt", "b.txt", "c.txt"]),
        vec!["a.txt", "c.txt"]
    );

    let listing: Vec<String> = ["src/lib.rs", "b.txt", RULES_FILE_NAME, "docs/b.txt", "../b.txt"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        controller.filter_paths(&listing),
        vec!["src/lib.rs".to_string(), "../b.txt".to_string()]
    );
}

#[tokio::test]
async fn repeated_initialize_is_harmless() {
    let (dir, controller) = controller();
    fs::write(dir.path().join(RULES_FILE_NAME), "*.log\n").unwrap();

    controller.initialize().await;
    controller.initialize().await;

    assert_eq!(controller.store().generation(), 2);
    assert!(!controller.should_show("app.log"));
}

#[tokio::test]
async fn disabled_watching_stays_unarmed() {
    let (_dir, mut controller) = controller();
    assert_eq!(controller.watch_state(), WatchState::Unarmed);
    controller.dispose();
    assert_eq!(controller.watch_state(), WatchState::Unarmed);
}

#[tokio::test]
async fn controller_from_config() {
    let dir = TempDir::new().unwrap();
    let config = VeilConfig {
        profile: String::new(),
        project_root: dir.path().to_path_buf(),
        watch: unwatched(),
    };
    fs::write(dir.path().join(RULES_FILE_NAME), "*.tmp\n").unwrap();

    let controller = HideController::from_config(&config);
    controller.initialize().await;

    assert_eq!(controller.store().project_root(), dir.path());
    assert!(!controller.should_show(PathBuf::from("scratch.tmp")));
}

#[test]
fn controller_without_runtime_still_answers_queries() {
    let dir = TempDir::new().unwrap();
    // Watching requested, but there is no runtime to run reloads on.
    let controller = HideController::new(dir.path().to_path_buf(), WatchConfig::default());

    assert_eq!(controller.watch_state(), WatchState::Unarmed);
    assert!(controller.should_show("app.log"));
}
