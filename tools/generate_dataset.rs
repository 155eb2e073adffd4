//! Synthetic Dataset Generator
//!
//! Writes a seeded pair of exercise/calorie tables for running the dashboard
//! locally. A share of user ids is written to only one of the two files so
//! the inner join has something to drop.
//!
//! Usage: generate_dataset [out_dir] [count] [seed] [overlap]

use anyhow::{Context, Result};
use fittrack::types::Gender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

/// One synthetic workout before it is split across the two files
struct SyntheticWorkout {
    user_id: u64,
    gender: Gender,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    duration_min: f64,
    heart_rate_bpm: f64,
    body_temp_c: f64,
    calories: f64,
}

struct WorkoutGenerator {
    rng: StdRng,
    next_id: u64,
}

impl WorkoutGenerator {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 10_000_000,
        }
    }

    fn generate(&mut self) -> SyntheticWorkout {
        self.next_id += self.rng.gen_range(1..500);

        let gender = if self.rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let age: u32 = self.rng.gen_range(20..80);
        let (height_cm, weight_kg): (f64, f64) = match gender {
            Gender::Male => (self.rng.gen_range(160.0..200.0), self.rng.gen_range(60.0..110.0)),
            Gender::Female => (self.rng.gen_range(145.0..185.0), self.rng.gen_range(45.0..90.0)),
        };
        let duration_min = self.rng.gen_range(1..=30) as f64;
        let heart_rate_bpm = (75.0 + duration_min * 1.1 + self.rng.gen_range(-8.0..8.0)).round();
        let body_temp_c = 37.0 + duration_min * 0.1 + self.rng.gen_range(-0.3..0.3);

        // Heart-rate based energy expenditure, kJ/min converted to kcal
        let per_minute = match gender {
            Gender::Male => {
                (-55.0969 + 0.6309 * heart_rate_bpm + 0.1988 * weight_kg + 0.2017 * age as f64)
                    / 4.184
            }
            Gender::Female => {
                (-20.4022 + 0.4472 * heart_rate_bpm - 0.1263 * weight_kg + 0.074 * age as f64)
                    / 4.184
            }
        };
        let noise = self.rng.gen_range(0.9..1.1);
        let calories = (per_minute * duration_min * noise).max(1.0).round();

        SyntheticWorkout {
            user_id: self.next_id,
            gender,
            age,
            height_cm: height_cm.round(),
            weight_kg: weight_kg.round(),
            duration_min,
            heart_rate_bpm,
            body_temp_c: (body_temp_c * 10.0).round() / 10.0,
            calories,
        }
    }
}

/// Both source tables as CSV text, with how the rows were distributed
struct GeneratedTables {
    exercise: String,
    calories: String,
    joined: usize,
    exercise_only: usize,
    calories_only: usize,
}

fn render_tables(
    generator: &mut WorkoutGenerator,
    count: usize,
    overlap: f64,
) -> Result<GeneratedTables> {
    let mut tables = GeneratedTables {
        exercise: String::from("User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp\n"),
        calories: String::from("User_ID,Calories\n"),
        joined: 0,
        exercise_only: 0,
        calories_only: 0,
    };

    for _ in 0..count {
        let workout = generator.generate();

        // Outside the overlap, drop the row from one side at random
        let (in_exercise, in_calories) = if generator.rng.gen_bool(overlap) {
            tables.joined += 1;
            (true, true)
        } else if generator.rng.gen_bool(0.5) {
            tables.exercise_only += 1;
            (true, false)
        } else {
            tables.calories_only += 1;
            (false, true)
        };

        if in_exercise {
            writeln!(
                tables.exercise,
                "{},{},{},{},{},{},{},{}",
                workout.user_id,
                workout.gender.label(),
                workout.age,
                workout.height_cm,
                workout.weight_kg,
                workout.duration_min,
                workout.heart_rate_bpm,
                workout.body_temp_c
            )?;
        }
        if in_calories {
            writeln!(tables.calories, "{},{}", workout.user_id, workout.calories)?;
        }
    }

    Ok(tables)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_dataset=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let out_dir = PathBuf::from(args.get(1).map(|s| s.as_str()).unwrap_or("data"));
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);
    let overlap: f64 = args
        .get(4)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.95_f64)
        .clamp(0.0, 1.0);

    info!(
        out_dir = %out_dir.display(),
        count = count,
        seed = seed,
        overlap = overlap,
        "Generating synthetic dataset"
    );

    let tables = render_tables(&mut WorkoutGenerator::new(seed), count, overlap)?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let exercise_path = out_dir.join("exercise.csv");
    let calories_path = out_dir.join("calories.csv");
    std::fs::write(&exercise_path, &tables.exercise)
        .with_context(|| format!("Failed to write {}", exercise_path.display()))?;
    std::fs::write(&calories_path, &tables.calories)
        .with_context(|| format!("Failed to write {}", calories_path.display()))?;

    info!(
        joined = tables.joined,
        exercise_only = tables.exercise_only,
        calories_only = tables.calories_only,
        "Completed! Wrote {} and {}",
        exercise_path.display(),
        calories_path.display()
    );

    Ok(())
}
