//! FitTrack
//!
//! Calorie burn prediction from physiological parameters, with the
//! recommendation rules, community statistics and session history behind a
//! personal fitness dashboard.

pub mod community;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use dashboard::{Dashboard, DashboardReport};
pub use dataset::{Dataset, DatasetLoader};
pub use error::{FitTrackError, Result};
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use models::{FittedModel, PredictionResult, Predictor};
pub use session::SessionLog;
pub use types::{SessionEntry, UserProfile, WorkoutRecord};
