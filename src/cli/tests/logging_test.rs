//! Log file tests. Installing a global subscriber can only happen once per
//! process, so everything lives in a single test.

use acr_cleanup_core::{CleanupEvent, Reporter, TracingReporter};

#[test]
fn test_log_file_is_appended_with_timestamps_and_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("cleanup.log");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "previous run\n").unwrap();

    acr_cleanup_cli::logging::init(&path).unwrap();

    TracingReporter.report(CleanupEvent::DryRun);
    TracingReporter.report(CleanupEvent::Retained {
        image: "app@sha256:b".to_string(),
        age_days: 10,
    });
    TracingReporter.report(CleanupEvent::Failed {
        message: "az acr login -n myacr failed: denied".to_string(),
    });

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("previous run\n"));
    assert!(contents.contains("INFO"));
    assert!(contents.contains("THIS IS A DRY RUN. NO IMAGES WILL BE DELETED."));
    assert!(contents.contains("DEBUG"));
    assert!(contents.contains("app@sha256:b is 10 days old, keeping it."));
    assert!(contents.contains("ERROR"));
    assert!(contents.contains("denied"));
    assert!(!contents.contains('\u{1b}'));

    // A second subscriber cannot be installed.
    assert!(acr_cleanup_cli::logging::init(&dir.path().join("other.log")).is_err());
}
