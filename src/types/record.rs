//! Workout record data structures

use crate::error::{FitTrackError, Result};
use serde::{Deserialize, Serialize};

/// Body mass index from weight in kilograms and height in centimetres.
///
/// Shared by the dataset loader and the live feature path so both sides of
/// the model see the same value.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// How gender labels are matched when encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderMatching {
    /// Accept only the dataset spelling (`male`/`female`) and the UI
    /// spelling (`Male`/`Female`)
    #[default]
    Exact,
    /// Accept any casing, ignoring surrounding whitespace
    CaseInsensitive,
}

/// Gender category as used by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse a raw label, failing on anything unrecognized.
    pub fn parse(raw: &str, matching: GenderMatching) -> Result<Self> {
        let parsed = match matching {
            GenderMatching::Exact => match raw {
                "male" | "Male" => Some(Gender::Male),
                "female" | "Female" => Some(Gender::Female),
                _ => None,
            },
            GenderMatching::CaseInsensitive => match raw.trim().to_ascii_lowercase().as_str() {
                "male" => Some(Gender::Male),
                "female" => Some(Gender::Female),
                _ => None,
            },
        };

        parsed.ok_or_else(|| FitTrackError::InvalidCategory(raw.to_string()))
    }

    /// Model encoding: male = 1, female = 0
    pub fn encoded(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// One row of the joined exercise/calories dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Join key shared by both source tables
    pub user_id: String,

    pub gender: Gender,

    /// Age in whole years
    pub age: u32,

    pub height_cm: f64,

    pub weight_kg: f64,

    /// Workout duration in minutes
    pub duration_min: f64,

    /// Average heart rate during the workout
    pub heart_rate_bpm: f64,

    /// Body temperature in degrees Celsius
    pub body_temp_c: f64,

    /// Calories burned (training label)
    pub calories: f64,

    /// Derived from weight and height
    pub bmi: f64,
}

impl WorkoutRecord {
    /// Build a record, deriving its BMI.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        gender: Gender,
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        duration_min: f64,
        heart_rate_bpm: f64,
        body_temp_c: f64,
        calories: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            gender,
            age,
            height_cm,
            weight_kg,
            duration_min,
            heart_rate_bpm,
            body_temp_c,
            calories,
            bmi: bmi(weight_kg, height_cm),
        }
    }
}
