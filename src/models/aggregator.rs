//! Combining per-tree outputs into forest outputs

use serde::{Deserialize, Serialize};

/// Weight of one feature in the fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
}

/// Aggregates tree predictions and tree importances.
pub struct TreeAggregator;

impl TreeAggregator {
    /// Average of the tree predictions; `None` when there are none.
    pub fn mean(predictions: &[f64]) -> Option<f64> {
        if predictions.is_empty() {
            return None;
        }
        Some(predictions.iter().sum::<f64>() / predictions.len() as f64)
    }

    /// Average normalized per-tree importances and renormalize.
    ///
    /// Trees that never split contribute nothing. If no tree split at all
    /// every feature gets the same weight, so the result always sums to 1.
    pub fn combine_importances(per_tree: &[Option<Vec<f64>>], n_features: usize) -> Vec<f64> {
        let mut totals = vec![0.0; n_features];
        let mut contributing = 0usize;

        for importances in per_tree.iter().flatten() {
            for (total, weight) in totals.iter_mut().zip(importances) {
                *total += weight;
            }
            contributing += 1;
        }

        if contributing == 0 || n_features == 0 {
            return vec![1.0 / n_features.max(1) as f64; n_features];
        }

        let sum: f64 = totals.iter().sum();
        totals.iter().map(|t| t / sum).collect()
    }

    /// Pair weights with feature names, heaviest first.
    ///
    /// Ties keep feature order.
    pub fn rank(names: &[String], weights: &[f64]) -> Vec<FeatureImportance> {
        let mut ranked: Vec<FeatureImportance> = names
            .iter()
            .zip(weights)
            .map(|(name, &weight)| FeatureImportance {
                feature: name.clone(),
                weight,
            })
            .collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ranked
    }
}
