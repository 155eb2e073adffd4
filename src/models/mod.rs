//! Calorie regression model

pub mod aggregator;
pub mod forest;
pub mod inference;
pub mod split;
pub mod tree;

pub use aggregator::{FeatureImportance, TreeAggregator};
pub use forest::{ForestParams, RandomForest};
pub use inference::{FittedModel, HoldoutScore, PredictionResult, Predictor};
pub use split::TrainTestSplit;
