//! Feature extraction for calorie prediction.
//!
//! Training records and live dashboard profiles both pass through this
//! module, so the model always sees the same encoding and the same BMI
//! formula on either side.

use crate::error::{ensure_finite, Result};
use crate::types::{Gender, GenderMatching, UserProfile, WorkoutRecord};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "BMI",
    "Duration",
    "Heart_Rate",
    "Body_Temp",
];

pub const FEATURE_COUNT: usize = 6;

/// One row of model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Male = 1, female = 0
    pub gender_encoded: f64,
    pub age: f64,
    pub bmi: f64,
    pub duration_min: f64,
    pub heart_rate_bpm: f64,
    pub body_temp_c: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gender_encoded,
            self.age,
            self.bmi,
            self.duration_min,
            self.heart_rate_bpm,
            self.body_temp_c,
        ]
    }

    /// Reject the vector if any value is NaN or infinite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in FEATURE_NAMES.into_iter().zip(self.to_array()) {
            ensure_finite(name, value)?;
        }
        Ok(())
    }
}

/// Turns records and profiles into model features.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    gender_matching: GenderMatching,
}

impl FeatureExtractor {
    pub fn new(gender_matching: GenderMatching) -> Self {
        Self { gender_matching }
    }

    /// Features of a training record
    pub fn from_record(&self, record: &WorkoutRecord) -> FeatureVector {
        FeatureVector {
            gender_encoded: record.gender.encoded(),
            age: record.age as f64,
            bmi: record.bmi,
            duration_min: record.duration_min,
            heart_rate_bpm: record.heart_rate_bpm,
            body_temp_c: record.body_temp_c,
        }
    }

    /// Features of a live profile.
    ///
    /// Fails with `InvalidCategory` for an unrecognized gender label and
    /// `InvalidInput` for any non-finite measurement.
    pub fn from_profile(&self, profile: &UserProfile) -> Result<FeatureVector> {
        let gender = Gender::parse(&profile.gender, self.gender_matching)?;

        let features = FeatureVector {
            gender_encoded: gender.encoded(),
            age: profile.age as f64,
            bmi: profile.bmi(),
            duration_min: ensure_finite("duration_min", profile.duration_min)?,
            heart_rate_bpm: ensure_finite("heart_rate_bpm", profile.heart_rate_bpm)?,
            body_temp_c: ensure_finite("body_temp_c", profile.body_temp_c)?,
        };

        ensure_finite("height_cm", profile.height_cm)?;
        ensure_finite("weight_kg", profile.weight_kg)?;
        // Zero height still yields a non-finite BMI
        features.validate()?;

        Ok(features)
    }

    /// Feature matrix and label vector for a set of records
    pub fn matrix(&self, records: &[&WorkoutRecord]) -> (Array2<f64>, Array1<f64>) {
        let mut x = Array2::<f64>::zeros((records.len(), FEATURE_COUNT));
        let mut y = Array1::<f64>::zeros(records.len());

        for (i, record) in records.iter().enumerate() {
            let row = self.from_record(record).to_array();
            for (j, value) in row.iter().enumerate() {
                x[(i, j)] = *value;
            }
            y[i] = record.calories;
        }

        (x, y)
    }
}
