//! Random forest regressor: bootstrap-aggregated regression trees

use crate::models::aggregator::TreeAggregator;
use crate::models::tree::{RegressionTree, TreeParams};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub tree: TreeParams,
    /// Tree `i` draws its bootstrap sample from `seed + i`
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeParams::default(),
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit `params.n_trees` trees (at least one), each on a bootstrap sample
    /// of the rows of `x`. `x` must have at least one row.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &ForestParams) -> Self {
        let n = x.nrows();
        let trees: Vec<RegressionTree> = (0..params.n_trees.max(1))
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(i as u64));
                let samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &samples, &params.tree)
            })
            .collect();

        debug!(
            trees = trees.len(),
            nodes = trees.iter().map(|t| t.node_count()).sum::<usize>(),
            max_depth = trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            "Forest grown"
        );

        Self {
            trees,
            n_features: x.ncols(),
        }
    }

    /// Mean of the tree predictions for one row
    pub fn predict(&self, row: ArrayView1<f64>) -> f64 {
        let predictions: Vec<f64> = self.trees.iter().map(|t| t.predict(row)).collect();
        TreeAggregator::mean(&predictions).unwrap_or(0.0)
    }

    /// Mean decrease in impurity per feature, summing to 1
    pub fn feature_importances(&self) -> Vec<f64> {
        let per_tree: Vec<Option<Vec<f64>>> =
            self.trees.iter().map(|t| t.feature_importances()).collect();
        TreeAggregator::combine_importances(&per_tree, self.n_features)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [1.0, 5.0],
            [2.0, 3.0],
            [3.0, 8.0],
            [4.0, 1.0],
            [5.0, 9.0],
            [6.0, 2.0],
            [7.0, 7.0],
            [8.0, 4.0],
        ];
        let y = array![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];
        (x, y)
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (x, y) = sample_data();
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };

        let a = RandomForest::fit(&x, &y, &params);
        let b = RandomForest::fit(&x, &y, &params);
        assert_eq!(a, b);
        assert_eq!(a.n_trees(), 10);
    }

    #[test]
    fn test_predictions_stay_within_label_range() {
        let (x, y) = sample_data();
        let forest = RandomForest::fit(&x, &y, &ForestParams::default());

        for row in x.rows() {
            let prediction = forest.predict(row);
            assert!(prediction.is_finite());
            assert!((10.0..=80.0).contains(&prediction));
        }
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (x, y) = sample_data();
        let forest = RandomForest::fit(&x, &y, &ForestParams::default());

        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 2);
        assert!(importances.iter().all(|&w| w >= 0.0));
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        // The label is a function of the first feature
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_zero_trees_still_grows_one() {
        let (x, y) = sample_data();
        let params = ForestParams {
            n_trees: 0,
            ..ForestParams::default()
        };
        assert_eq!(RandomForest::fit(&x, &y, &params).n_trees(), 1);
    }
}
