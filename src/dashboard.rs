//! Dashboard evaluation: one profile in, every displayed value out

use crate::community::CommunityComparison;
use crate::config::AppConfig;
use crate::dataset::{Dataset, DatasetLoader};
use crate::error::{ensure_finite, FitTrackError, Result};
use crate::feature_extractor::FeatureExtractor;
use crate::metrics::InferenceMetrics;
use crate::models::{FeatureImportance, PredictionResult, Predictor};
use crate::recommendations::{Badge, Recommendations, WorkoutPlan};
use crate::session::SessionLog;
use crate::types::{SessionEntry, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Everything the dashboard shows for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub bmi: f64,
    pub prediction: PredictionResult,
    pub daily_calorie_goal: f64,
    /// Fraction of the daily goal reached, within `[0, 1]`
    pub goal_progress: f64,
    pub duration_min: f64,
    pub heart_rate_bpm: f64,
    pub badges: Vec<Badge>,
    pub recommendations: Recommendations,
    pub workout_plan: WorkoutPlan,
    pub importances: Vec<FeatureImportance>,
    pub community: CommunityComparison,
}

impl DashboardReport {
    pub fn calories_burned(&self) -> f64 {
        self.prediction.calories_burned
    }
}

/// Fraction of a positive daily goal reached, capped at 1 and floored at 0
pub fn goal_progress(calories: f64, daily_goal: f64) -> Result<f64> {
    let goal = ensure_finite("daily_calorie_goal", daily_goal)?;
    if goal <= 0.0 {
        return Err(FitTrackError::InvalidInput {
            field: "daily_calorie_goal",
            value: goal,
        });
    }
    Ok((ensure_finite("calories", calories)? / goal).clamp(0.0, 1.0))
}

/// Shared, read-only pipeline state: the loaded dataset and fitted model
pub struct Dashboard {
    dataset: Arc<Dataset>,
    predictor: Arc<Predictor>,
    extractor: FeatureExtractor,
    importances: Vec<FeatureImportance>,
    histogram_bins: usize,
    metrics: Arc<InferenceMetrics>,
}

impl Dashboard {
    pub fn new(
        dataset: Arc<Dataset>,
        predictor: Arc<Predictor>,
        extractor: FeatureExtractor,
        histogram_bins: usize,
    ) -> Self {
        let importances = predictor.importances();
        Self {
            dataset,
            predictor,
            extractor,
            importances,
            histogram_bins,
            metrics: Arc::new(InferenceMetrics::new()),
        }
    }

    /// Load the dataset and fit the model once
    pub fn from_config(config: &AppConfig, loader: &DatasetLoader) -> Result<Self> {
        let dataset = loader.load()?;
        let predictor = Arc::new(Predictor::fit(dataset.records(), &config.model)?);
        Ok(Self::new(
            dataset,
            predictor,
            FeatureExtractor::new(config.model.gender_matching),
            config.model.histogram_bins,
        ))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn predictor(&self) -> &Arc<Predictor> {
        &self.predictor
    }

    pub fn metrics(&self) -> &Arc<InferenceMetrics> {
        &self.metrics
    }

    /// Evaluate a profile.
    ///
    /// Invalid input rejects only this evaluation; the model and any
    /// session log are left as they were.
    pub fn evaluate(&self, profile: &UserProfile) -> Result<DashboardReport> {
        let started = Instant::now();
        let report = self.build_report(profile);

        match &report {
            Ok(report) => {
                self.metrics.record_prediction(started.elapsed());
                debug!(
                    calories = report.calories_burned(),
                    bmi = report.bmi,
                    plan = ?report.workout_plan,
                    "Profile evaluated"
                );
            }
            Err(e) => {
                self.metrics.record_rejection();
                warn!(error = %e, "Profile rejected");
            }
        }

        report
    }

    fn build_report(&self, profile: &UserProfile) -> Result<DashboardReport> {
        let features = self.extractor.from_profile(profile)?;
        let prediction = self.predictor.predict(&features)?;
        let calories = prediction.calories_burned;

        Ok(DashboardReport {
            bmi: features.bmi,
            prediction,
            daily_calorie_goal: profile.daily_calorie_goal,
            goal_progress: goal_progress(calories, profile.daily_calorie_goal)?,
            duration_min: features.duration_min,
            heart_rate_bpm: features.heart_rate_bpm,
            badges: Badge::earned(calories, features.duration_min, features.heart_rate_bpm),
            recommendations: Recommendations::evaluate(
                features.bmi,
                features.heart_rate_bpm,
                features.duration_min,
            ),
            workout_plan: WorkoutPlan::from_calories(calories),
            importances: self.importances.clone(),
            community: CommunityComparison::build(
                &self.dataset,
                calories,
                profile.age,
                self.histogram_bins,
            ),
        })
    }

    /// Append the evaluated workout to a session log
    pub fn save_workout(&self, log: &mut SessionLog, report: &DashboardReport) -> SessionEntry {
        let entry = SessionEntry::new(
            report.calories_burned(),
            report.duration_min,
            report.heart_rate_bpm,
        );
        log.append(entry.clone());
        self.metrics.record_saved_workout();

        debug!(
            session = %log.id(),
            calories = entry.calories,
            workouts = log.len(),
            "Workout saved"
        );

        entry
    }
}
