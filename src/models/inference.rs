//! Calorie predictor: fitting and single-row inference

use crate::config::ModelConfig;
use crate::error::{FitTrackError, Result};
use crate::feature_extractor::{FeatureExtractor, FeatureVector, FEATURE_NAMES};
use crate::models::aggregator::{FeatureImportance, TreeAggregator};
use crate::models::forest::{ForestParams, RandomForest};
use crate::models::split::TrainTestSplit;
use crate::models::tree::TreeParams;
use crate::types::WorkoutRecord;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Result of model inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted calories burned (kcal). Not clamped.
    pub calories_burned: f64,
}

/// Accuracy on the held-out partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutScore {
    pub samples: usize,
    pub mean_absolute_error: f64,
    /// `None` when the held-out labels have no variance
    pub r_squared: Option<f64>,
}

/// A fitted calorie model with its feature schema and data split.
///
/// Immutable after `fit`; share it behind an `Arc` across sessions.
#[derive(Debug, Clone)]
pub struct Predictor {
    forest: RandomForest,
    feature_names: Vec<String>,
    split: TrainTestSplit,
    holdout: Option<HoldoutScore>,
}

/// Opaque trained artifact handed to the UI layer
pub type FittedModel = Predictor;

impl Predictor {
    /// Split `records`, fit the forest on the training side, and score the
    /// held-out side.
    pub fn fit(records: &[WorkoutRecord], config: &ModelConfig) -> Result<Self> {
        let required = config.min_records.max(1);
        if records.len() < required {
            return Err(FitTrackError::InsufficientData {
                required,
                available: records.len(),
            });
        }

        let started = Instant::now();
        let extractor = FeatureExtractor::new(config.gender_matching);
        let split = TrainTestSplit::new(records.len(), config.test_ratio, config.seed);

        let train: Vec<&WorkoutRecord> = split.train.iter().map(|&i| &records[i]).collect();
        let (x, y) = extractor.matrix(&train);

        let params = ForestParams {
            n_trees: config.n_trees,
            tree: TreeParams {
                max_depth: config.max_depth,
                min_samples_split: config.min_samples_split,
            },
            seed: config.seed,
        };
        let forest = RandomForest::fit(&x, &y, &params);

        let mut predictor = Self {
            forest,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            split,
            holdout: None,
        };

        let test: Vec<&WorkoutRecord> =
            predictor.split.test.iter().map(|&i| &records[i]).collect();
        predictor.holdout = predictor.score(&extractor, &test);

        info!(
            trees = predictor.forest.n_trees(),
            train = predictor.split.train.len(),
            test = predictor.split.test.len(),
            mae = predictor.holdout.map(|h| h.mean_absolute_error),
            r_squared = predictor.holdout.and_then(|h| h.r_squared),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model fitted"
        );

        Ok(predictor)
    }

    /// Predict calories for one validated feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        features.validate()?;
        let calories_burned = self.predict_row(&features.to_array())?;

        debug!(
            features = ?features,
            calories = calories_burned,
            "Prediction complete"
        );

        Ok(PredictionResult { calories_burned })
    }

    /// Predict from a raw row in `feature_names()` order
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.feature_names.len() {
            return Err(FitTrackError::FeatureMismatch {
                expected: self.feature_names.len(),
                actual: row.len(),
            });
        }
        for (name, &value) in FEATURE_NAMES.into_iter().zip(row) {
            crate::error::ensure_finite(name, value)?;
        }

        Ok(self.forest.predict(ArrayView1::from(row)))
    }

    /// Feature weights, heaviest first, summing to 1
    pub fn importances(&self) -> Vec<FeatureImportance> {
        TreeAggregator::rank(&self.feature_names, &self.forest.feature_importances())
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Record indices used for training and held out
    pub fn split(&self) -> &TrainTestSplit {
        &self.split
    }

    pub fn holdout_score(&self) -> Option<HoldoutScore> {
        self.holdout
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    fn score(&self, extractor: &FeatureExtractor, test: &[&WorkoutRecord]) -> Option<HoldoutScore> {
        if test.is_empty() {
            return None;
        }

        let (x, y) = extractor.matrix(test);
        let predictions: Vec<f64> = x.rows().into_iter().map(|row| self.forest.predict(row)).collect();

        let n = test.len() as f64;
        let mean = y.sum() / n;
        let mut abs_error = 0.0;
        let mut residual = 0.0;
        let mut total = 0.0;
        for (prediction, &actual) in predictions.iter().zip(y.iter()) {
            abs_error += (actual - prediction).abs();
            residual += (actual - prediction).powi(2);
            total += (actual - mean).powi(2);
        }

        Some(HoldoutScore {
            samples: test.len(),
            mean_absolute_error: abs_error / n,
            r_squared: (total > 0.0).then(|| 1.0 - residual / total),
        })
    }
}
