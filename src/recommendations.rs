//! Threshold rules turning computed values into guidance.
//!
//! Every function here is pure: it takes already computed scalars and
//! returns a label. Boundaries follow the dashboard exactly, so a BMI of
//! 25.0 is still healthy and a heart rate of 160 is still ideal.

use serde::{Deserialize, Serialize};

/// BMI guidance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiBand {
    Underweight,
    Healthy,
    Overweight,
}

impl BmiBand {
    pub const UNDERWEIGHT_BELOW: f64 = 18.5;
    pub const OVERWEIGHT_ABOVE: f64 = 25.0;

    pub fn from_bmi(bmi: f64) -> Self {
        if bmi > Self::OVERWEIGHT_ABOVE {
            BmiBand::Overweight
        } else if bmi < Self::UNDERWEIGHT_BELOW {
            BmiBand::Underweight
        } else {
            BmiBand::Healthy
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BmiBand::Underweight => "Focus on muscle-building workouts",
            BmiBand::Healthy => "Your BMI is in healthy range!",
            BmiBand::Overweight => "Consider weight management exercises",
        }
    }
}

/// Workout intensity judged from heart rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateBand {
    BelowTarget,
    Ideal,
    High,
}

impl HeartRateBand {
    pub const TARGET_FROM: f64 = 100.0;
    pub const HIGH_ABOVE: f64 = 160.0;

    pub fn from_bpm(heart_rate_bpm: f64) -> Self {
        if heart_rate_bpm > Self::HIGH_ABOVE {
            HeartRateBand::High
        } else if heart_rate_bpm < Self::TARGET_FROM {
            HeartRateBand::BelowTarget
        } else {
            HeartRateBand::Ideal
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HeartRateBand::BelowTarget => "Push harder next session!",
            HeartRateBand::Ideal => "Ideal workout intensity!",
            HeartRateBand::High => "High heart rate! Consider rest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBand {
    Short,
    Good,
}

impl DurationBand {
    pub const GOOD_FROM: f64 = 30.0;

    pub fn from_minutes(duration_min: f64) -> Self {
        if duration_min < Self::GOOD_FROM {
            DurationBand::Short
        } else {
            DurationBand::Good
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DurationBand::Short => "Try extending workout duration",
            DurationBand::Good => "Great workout duration!",
        }
    }
}

/// Achievement badges; any subset may be earned at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// More than 300 kcal burned
    CalorieBurner,
    /// Longer than 45 minutes
    MarathonRunner,
    /// Heart rate above 160 bpm
    HighIntensity,
}

impl Badge {
    pub const CALORIES_ABOVE: f64 = 300.0;
    pub const DURATION_ABOVE: f64 = 45.0;
    pub const HEART_RATE_ABOVE: f64 = 160.0;

    /// Badges earned by a workout, in display order
    pub fn earned(calories: f64, duration_min: f64, heart_rate_bpm: f64) -> Vec<Badge> {
        let mut badges = Vec::new();
        if calories > Self::CALORIES_ABOVE {
            badges.push(Badge::CalorieBurner);
        }
        if duration_min > Self::DURATION_ABOVE {
            badges.push(Badge::MarathonRunner);
        }
        if heart_rate_bpm > Self::HEART_RATE_ABOVE {
            badges.push(Badge::HighIntensity);
        }
        badges
    }

    pub fn title(self) -> &'static str {
        match self {
            Badge::CalorieBurner => "Burn 300+ kcal",
            Badge::MarathonRunner => "Marathon Runner",
            Badge::HighIntensity => "High Intensity",
        }
    }
}

/// Suggested plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPlan {
    Light,
    Moderate,
    Intense,
}

impl WorkoutPlan {
    pub const MODERATE_FROM: f64 = 200.0;
    pub const INTENSE_FROM: f64 = 400.0;

    pub fn from_calories(calories: f64) -> Self {
        if calories < Self::MODERATE_FROM {
            WorkoutPlan::Light
        } else if calories < Self::INTENSE_FROM {
            WorkoutPlan::Moderate
        } else {
            WorkoutPlan::Intense
        }
    }

    pub fn activities(self) -> &'static [&'static str] {
        match self {
            WorkoutPlan::Light => &[
                "30 min brisk walking",
                "15 min yoga session",
                "10 min stretching",
            ],
            WorkoutPlan::Moderate => &[
                "45 min cycling",
                "20 min bodyweight exercises",
                "15 min jump rope",
            ],
            WorkoutPlan::Intense => &[
                "60 min HIIT training",
                "30 min weight lifting",
                "15 min treadmill running",
            ],
        }
    }
}

/// The three recommendation panels together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub bmi: BmiBand,
    pub heart_rate: HeartRateBand,
    pub duration: DurationBand,
}

impl Recommendations {
    pub fn evaluate(bmi: f64, heart_rate_bpm: f64, duration_min: f64) -> Self {
        Self {
            bmi: BmiBand::from_bmi(bmi),
            heart_rate: HeartRateBand::from_bpm(heart_rate_bpm),
            duration: DurationBand::from_minutes(duration_min),
        }
    }

    pub fn messages(&self) -> [&'static str; 3] {
        [
            self.bmi.message(),
            self.heart_rate.message(),
            self.duration.message(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_bands() {
        assert_eq!(BmiBand::from_bmi(17.0), BmiBand::Underweight);
        assert_eq!(BmiBand::from_bmi(18.49), BmiBand::Underweight);
        assert_eq!(BmiBand::from_bmi(18.5), BmiBand::Healthy);
        assert_eq!(BmiBand::from_bmi(25.0), BmiBand::Healthy);
        assert_eq!(BmiBand::from_bmi(25.01), BmiBand::Overweight);
    }

    #[test]
    fn test_heart_rate_bands() {
        assert_eq!(HeartRateBand::from_bpm(99.0), HeartRateBand::BelowTarget);
        assert_eq!(HeartRateBand::from_bpm(100.0), HeartRateBand::Ideal);
        assert_eq!(HeartRateBand::from_bpm(160.0), HeartRateBand::Ideal);
        assert_eq!(HeartRateBand::from_bpm(161.0), HeartRateBand::High);
    }

    #[test]
    fn test_duration_bands() {
        assert_eq!(DurationBand::from_minutes(29.9), DurationBand::Short);
        assert_eq!(DurationBand::from_minutes(30.0), DurationBand::Good);
    }

    #[test]
    fn test_badges() {
        assert!(Badge::earned(300.0, 45.0, 160.0).is_empty());
        assert_eq!(
            Badge::earned(300.5, 46.0, 161.0),
            vec![Badge::CalorieBurner, Badge::MarathonRunner, Badge::HighIntensity]
        );
        assert_eq!(Badge::earned(10.0, 60.0, 90.0), vec![Badge::MarathonRunner]);
    }

    #[test]
    fn test_workout_plans() {
        assert_eq!(WorkoutPlan::from_calories(199.9), WorkoutPlan::Light);
        assert_eq!(WorkoutPlan::from_calories(200.0), WorkoutPlan::Moderate);
        assert_eq!(WorkoutPlan::from_calories(399.9), WorkoutPlan::Moderate);
        assert_eq!(WorkoutPlan::from_calories(400.0), WorkoutPlan::Intense);
        assert_eq!(WorkoutPlan::Intense.activities().len(), 3);
    }

    #[test]
    fn test_recommendations_serialize_as_labels() {
        let recommendations = Recommendations::evaluate(24.2, 120.0, 20.0);
        let json = serde_json::to_value(recommendations).unwrap();

        assert_eq!(json["bmi"], "healthy");
        assert_eq!(json["heart_rate"], "ideal");
        assert_eq!(json["duration"], "short");
        assert_eq!(recommendations.messages()[2], "Try extending workout duration");
    }
}
