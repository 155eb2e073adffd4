//! End-to-end checks over the fixture tables in tests/fixtures

use fittrack::config::AppConfig;
use fittrack::console::ConsoleSession;
use fittrack::{Dashboard, DatasetLoader, FitTrackError, SessionLog, UserProfile};
use std::sync::Arc;

fn fixture_loader() -> DatasetLoader {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    DatasetLoader::new(format!("{}/exercise.csv", dir), format!("{}/calories.csv", dir))
}

fn fixture_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.model.n_trees = 25;
    config.model.histogram_bins = 5;
    config
}

#[test]
fn test_join_keeps_only_shared_users() {
    let dataset = fixture_loader().load().unwrap();

    // Each table carries one id the other lacks
    assert_eq!(dataset.len(), 10);
    assert!(dataset
        .records()
        .iter()
        .all(|r| r.user_id != "10001111" && r.user_id != "20002222"));
    assert_eq!(dataset.label_range(), Some((26.0, 231.0)));
}

#[test]
fn test_load_is_idempotent() {
    let loader = fixture_loader();
    let first = loader.load().unwrap();
    let second = loader.load().unwrap();

    assert!(loader.is_cached());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_default_profile_prediction_within_label_range() {
    let config = fixture_config();
    let dashboard = Dashboard::from_config(&config, &fixture_loader()).unwrap();

    let profile = UserProfile {
        age: 30,
        gender: "Male".to_string(),
        height_cm: 170.0,
        weight_kg: 70.0,
        duration_min: 30.0,
        heart_rate_bpm: 120.0,
        body_temp_c: 37.5,
        ..UserProfile::default()
    };
    let report = dashboard.evaluate(&profile).unwrap();

    let calories = report.calories_burned();
    assert!(calories.is_finite());
    assert!((26.0..=231.0).contains(&calories));
    assert!((0.0..=1.0).contains(&report.goal_progress));

    let total: f64 = report.importances.iter().map(|i| i.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(report.importances.iter().all(|i| i.weight >= 0.0));
    assert_eq!(report.community.calorie_histogram.len(), 5);

    // Same model, same input, same answer
    assert_eq!(dashboard.evaluate(&profile).unwrap(), report);
}

#[test]
fn test_holdout_split_sizes() {
    let dashboard = Dashboard::from_config(&fixture_config(), &fixture_loader()).unwrap();
    let split = dashboard.predictor().split();

    assert_eq!(split.train.len(), 8);
    assert_eq!(split.test.len(), 2);
    assert_eq!(
        dashboard.predictor().holdout_score().map(|s| s.samples),
        Some(2)
    );
}

#[test]
fn test_invalid_gender_rejected_without_side_effects() {
    let dashboard = Dashboard::from_config(&fixture_config(), &fixture_loader()).unwrap();
    let mut log = SessionLog::new();

    let report = dashboard.evaluate(&UserProfile::default()).unwrap();
    dashboard.save_workout(&mut log, &report);

    let bad = UserProfile {
        gender: "other".to_string(),
        ..UserProfile::default()
    };
    assert_eq!(
        dashboard.evaluate(&bad),
        Err(FitTrackError::InvalidCategory("other".to_string()))
    );
    assert_eq!(log.len(), 1);
    assert_eq!(dashboard.metrics().latency_stats().count, 1);
}

#[test]
fn test_missing_source_file() {
    let loader = DatasetLoader::new("does/not/exist.csv", "does/not/exist_either.csv");
    let err = loader.load().unwrap_err();

    assert!(matches!(err, FitTrackError::DataUnavailable { .. }));
    assert!(!loader.is_cached());
}

#[test]
fn test_console_session_save_and_history() {
    let dashboard = Dashboard::from_config(&fixture_config(), &fixture_loader()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("history.csv");

    let mut session = ConsoleSession::new(UserProfile::default(), &export);
    let input = "show\nsave\nset duration 45\nsave\nhistory\nexport\nquit\n";
    let mut output = Vec::new();
    session.run(&dashboard, input.as_bytes(), &mut output).unwrap();

    assert_eq!(session.log().len(), 2);
    let written = std::fs::read_to_string(&export).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("timestamp,calories,duration,heart_rate"));
    assert_eq!(lines.count(), 2);
}
