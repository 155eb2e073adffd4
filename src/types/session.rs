//! Saved workout data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workout saved by the user during the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Predicted calories burned
    pub calories: f64,

    /// Workout duration in minutes
    pub duration_min: f64,

    /// Heart rate in beats per minute
    pub heart_rate_bpm: f64,

    /// When the workout was saved
    pub timestamp: DateTime<Utc>,
}

impl SessionEntry {
    /// Create an entry stamped with the current time
    pub fn new(calories: f64, duration_min: f64, heart_rate_bpm: f64) -> Self {
        Self::at(calories, duration_min, heart_rate_bpm, Utc::now())
    }

    /// Create an entry with an explicit timestamp
    pub fn at(
        calories: f64,
        duration_min: f64,
        heart_rate_bpm: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            calories,
            duration_min,
            heart_rate_bpm,
            timestamp,
        }
    }
}

/// Aggregates over every entry in a session log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub workouts: usize,

    pub total_calories: f64,

    /// `None` when no workout has been saved
    pub mean_heart_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization() {
        let entry = SessionEntry::new(250.0, 30.0, 120.0);

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: SessionEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, deserialized);
    }
}
