//! User-supplied fitness profile

use serde::{Deserialize, Serialize};

/// Raw values coming from the dashboard controls.
///
/// The caller constrains numeric ranges; the core only rejects non-finite
/// numbers and unrecognized gender labels when the profile is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Age in years (15-80 on the dashboard)
    pub age: u32,

    /// Gender label as entered (`Male` / `Female` on the dashboard)
    pub gender: String,

    /// Height in centimetres (140-210)
    pub height_cm: f64,

    /// Weight in kilograms (40-150)
    pub weight_kg: f64,

    /// Workout duration in minutes (10-120)
    pub duration_min: f64,

    /// Heart rate in beats per minute (60-200)
    pub heart_rate_bpm: f64,

    /// Body temperature in degrees Celsius (36.0-42.0)
    pub body_temp_c: f64,

    /// Daily calorie goal in kcal (100-1000)
    pub daily_calorie_goal: f64,
}

impl UserProfile {
    pub fn bmi(&self) -> f64 {
        super::record::bmi(self.weight_kg, self.height_cm)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 30,
            gender: "Male".to_string(),
            height_cm: 170.0,
            weight_kg: 70.0,
            duration_min: 30.0,
            heart_rate_bpm: 120.0,
            body_temp_c: 37.5,
            daily_calorie_goal: 300.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.gender, "Male");
        assert!((profile.bmi() - 24.22).abs() < 0.01);
    }

    #[test]
    fn test_partial_profile_deserialization() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"age": 45, "gender": "Female"}"#).unwrap();
        assert_eq!(profile.age, 45);
        assert_eq!(profile.gender, "Female");
        assert_eq!(profile.height_cm, 170.0);
        assert_eq!(profile.daily_calorie_goal, 300.0);
    }
}
