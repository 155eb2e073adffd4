//! CART regression tree with squared-error splitting

use ndarray::{Array1, Array2, ArrayView1};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Maximum depth (root is depth 0); `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// A node with fewer samples than this becomes a leaf
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Best split found for a node
struct Candidate {
    feature: usize,
    threshold: f64,
    /// Sum of squared errors of both children
    children_sse: f64,
}

/// A fitted regression tree.
///
/// Nodes live in an arena; `Split` children are indices into it. Samples
/// with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error reduction credited to each feature
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Fit on the rows of `x` named by `samples`.
    ///
    /// `samples` may repeat rows (bootstrap draws); each repeat counts as a
    /// separate observation. It must not be empty.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, samples: &[usize], params: &TreeParams) -> Self {
        let n_features = x.ncols();
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut impurity_decrease = vec![0.0; n_features];

        // (node index, samples reaching it, depth)
        let mut pending: Vec<(usize, Vec<usize>, usize)> = vec![(0, samples.to_vec(), 0)];

        while let Some((node, samples, depth)) = pending.pop() {
            let (mean, sse) = mean_and_sse(y, &samples);
            nodes[node] = Node::Leaf { value: mean };

            let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
            if depth_reached || samples.len() < params.min_samples_split.max(2) || sse <= f64::EPSILON
            {
                continue;
            }

            let Some(best) = best_split(x, y, &samples) else {
                continue;
            };
            let decrease = sse - best.children_sse;
            if decrease <= 0.0 {
                continue;
            }

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .partition(|&&s| x[(s, best.feature)] <= best.threshold);

            impurity_decrease[best.feature] += decrease;

            let left = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });

            nodes[node] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };

            pending.push((right, right_samples, depth + 1));
            pending.push((left, left_samples, depth + 1));
        }

        Self {
            nodes,
            impurity_decrease,
        }
    }

    /// Predict one row
    pub fn predict(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Per-feature impurity decrease normalized to sum to 1.
    ///
    /// `None` for a tree that never split.
    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        let total: f64 = self.impurity_decrease.iter().sum();
        if total <= 0.0 {
            return None;
        }
        Some(self.impurity_decrease.iter().map(|d| d / total).collect())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[index] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        deepest
    }
}

fn mean_and_sse(y: &Array1<f64>, samples: &[usize]) -> (f64, f64) {
    let n = samples.len() as f64;
    let sum: f64 = samples.iter().map(|&s| y[s]).sum();
    let mean = sum / n;
    let sse = samples.iter().map(|&s| (y[s] - mean).powi(2)).sum();
    (mean, sse)
}

/// Exhaustive search over every feature and every boundary between
/// distinct sorted values.
fn best_split(x: &Array2<f64>, y: &Array1<f64>, samples: &[usize]) -> Option<Candidate> {
    let n = samples.len();
    let total_sum: f64 = samples.iter().map(|&s| y[s]).sum();
    let total_sq: f64 = samples.iter().map(|&s| y[s] * y[s]).sum();

    let mut best: Option<Candidate> = None;
    let mut order = samples.to_vec();

    for feature in 0..x.ncols() {
        order.sort_by(|&a, &b| x[(a, feature)].total_cmp(&x[(b, feature)]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for i in 0..n - 1 {
            let value = y[order[i]];
            left_sum += value;
            left_sq += value * value;

            let here = x[(order[i], feature)];
            let next = x[(order[i + 1], feature)];
            if here >= next {
                continue;
            }

            let n_left = (i + 1) as f64;
            let n_right = (n - i - 1) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            let sse = (left_sq - left_sum * left_sum / n_left)
                + (right_sq - right_sum * right_sum / n_right);

            if best.as_ref().map_or(true, |b| sse < b.children_sse) {
                let mut threshold = (here + next) / 2.0;
                if threshold >= next {
                    threshold = here;
                }
                best = Some(Candidate {
                    feature,
                    threshold,
                    children_sse: sse.max(0.0),
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn all(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_step_function() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![5.0, 5.0, 5.0, 50.0, 50.0, 50.0];

        let tree = RegressionTree::fit(&x, &y, &all(6), &TreeParams::default());

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(array![0.0].view()), 5.0);
        assert_eq!(tree.predict(array![6.0].view()), 5.0);
        assert_eq!(tree.predict(array![7.0].view()), 50.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 determines the label
        let x = array![[3.0, 0.0], [1.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        let y = array![10.0, 10.0, 20.0, 20.0];

        let tree = RegressionTree::fit(&x, &y, &all(4), &TreeParams::default());
        let importances = tree.feature_importances().unwrap();

        assert_eq!(importances, vec![0.0, 1.0]);
    }

    #[test]
    fn test_constant_labels_make_a_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![7.0, 7.0, 7.0];

        let tree = RegressionTree::fit(&x, &y, &all(3), &TreeParams::default());

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.feature_importances(), None);
        assert_eq!(tree.predict(array![100.0].view()), 7.0);
    }

    #[test]
    fn test_max_depth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let params = TreeParams {
            max_depth: Some(2),
            ..TreeParams::default()
        };
        let tree = RegressionTree::fit(&x, &y, &all(8), &params);
        assert_eq!(tree.depth(), 2);

        let full = RegressionTree::fit(&x, &y, &all(8), &TreeParams::default());
        assert_eq!(full.depth(), 3);
        // Unbounded depth memorizes the training labels
        assert_eq!(full.predict(array![5.0].view()), 5.0);
    }

    #[test]
    fn test_repeated_samples_weight_the_mean() {
        let x = array![[1.0], [1.0]];
        let y = array![0.0, 30.0];

        let tree = RegressionTree::fit(&x, &y, &[0, 1, 1], &TreeParams::default());
        assert_eq!(tree.predict(array![1.0].view()), 20.0);
    }
}
