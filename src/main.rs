//! FitTrack - Main Entry Point
//!
//! Loads the workout dataset, fits the calorie model once, and runs an
//! interactive session against it on stdin/stdout.

use anyhow::{Context, Result};
use fittrack::{config::AppConfig, console::ConsoleSession, Dashboard, DatasetLoader};
use std::io;
use tracing::info;

fn main() -> Result<()> {
    // Optional config path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_path(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
        tracing_subscriber::EnvFilter::try_new(format!("fittrack={}", config.logging.level))
    })?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if config.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting FitTrack");
    info!(
        exercise = %config.data.exercise_path,
        calories = %config.data.calories_path,
        trees = config.model.n_trees,
        seed = config.model.seed,
        gender_matching = ?config.model.gender_matching,
        "Configuration loaded"
    );

    // Load once, fit once; every evaluation reuses both
    let loader = DatasetLoader::from_config(&config);
    let dashboard = Dashboard::from_config(&config, &loader)
        .context("Failed to prepare the prediction pipeline")?;

    info!(
        records = dashboard.dataset().len(),
        trees = dashboard.predictor().n_trees(),
        features = %dashboard.predictor().feature_names().join(","),
        "Model ready"
    );
    if let Some(score) = dashboard.predictor().holdout_score() {
        info!(
            samples = score.samples,
            mae = score.mean_absolute_error,
            r_squared = score.r_squared,
            "Held-out evaluation"
        );
    }

    let mut session = ConsoleSession::new(config.profile.clone(), &config.session.export_path);
    info!(session = %session.log().id(), "Session started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(&dashboard, stdin.lock(), &mut stdout)?;

    let totals = session.log().totals();
    info!(
        workouts = totals.workouts,
        total_calories = totals.total_calories,
        mean_heart_rate = totals.mean_heart_rate,
        "Session ended"
    );
    dashboard.metrics().print_summary();

    Ok(())
}
