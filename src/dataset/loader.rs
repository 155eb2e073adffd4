//! Dataset loader: joins the exercise and calorie tables into workout records

use crate::config::{AppConfig, DataConfig};
use crate::dataset::table::Table;
use crate::error::{FitTrackError, Result};
use crate::types::{Gender, GenderMatching, WorkoutRecord};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Join key shared by both tables
pub const JOIN_KEY: &str = "User_ID";

/// Columns the exercise table must carry
pub const EXERCISE_COLUMNS: [&str; 8] = [
    JOIN_KEY,
    "Gender",
    "Age",
    "Height",
    "Weight",
    "Duration",
    "Heart_Rate",
    "Body_Temp",
];

/// Columns the calorie table must carry
pub const CALORIE_COLUMNS: [&str; 2] = [JOIN_KEY, "Calories"];

/// Joined workout records, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<WorkoutRecord>,
}

impl Dataset {
    pub fn new(records: Vec<WorkoutRecord>) -> Self {
        Self { records }
    }

    /// Build a dataset from already parsed source tables
    pub fn from_tables(
        exercise: &Table,
        calories: &Table,
        matching: GenderMatching,
    ) -> Result<Self> {
        exercise.require_columns(&EXERCISE_COLUMNS)?;
        calories.require_columns(&CALORIE_COLUMNS)?;

        let user_id = exercise.column(JOIN_KEY)?;
        let gender = exercise.column("Gender")?;
        let age = exercise.column("Age")?;
        let height = exercise.column("Height")?;
        let weight = exercise.column("Weight")?;
        let duration = exercise.column("Duration")?;
        let heart_rate = exercise.column("Heart_Rate")?;
        let body_temp = exercise.column("Body_Temp")?;
        let label = calories.column("Calories")?;

        let pairs = exercise.inner_join(calories, JOIN_KEY)?;
        let mut records = Vec::with_capacity(pairs.len());

        for (row, label_row) in pairs {
            records.push(WorkoutRecord::new(
                exercise.cell(row, user_id),
                Gender::parse(exercise.cell(row, gender), matching)?,
                exercise.whole_number(row, age)?,
                exercise.number(row, height)?,
                exercise.number(row, weight)?,
                exercise.number(row, duration)?,
                exercise.number(row, heart_rate)?,
                exercise.number(row, body_temp)?,
                calories.number(label_row, label)?,
            ));
        }

        debug!(
            exercise_rows = exercise.len(),
            calorie_rows = calories.len(),
            joined = records.len(),
            "Joined source tables"
        );

        Ok(Self { records })
    }

    /// Parse both sources from text and join them
    pub fn from_sources(
        exercise_csv: &str,
        calories_csv: &str,
        delimiter: char,
        matching: GenderMatching,
    ) -> Result<Self> {
        let exercise = Table::parse("exercise", exercise_csv, delimiter)?;
        let calories = Table::parse("calories", calories_csv, delimiter)?;
        Self::from_tables(&exercise, &calories, matching)
    }

    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest calorie label
    pub fn label_range(&self) -> Option<(f64, f64)> {
        let mut labels = self.records.iter().map(|r| r.calories);
        let first = labels.next()?;
        Some(labels.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
    }
}

/// Loads the dataset from disk once and hands out shared copies
pub struct DatasetLoader {
    exercise_path: PathBuf,
    calories_path: PathBuf,
    delimiter: char,
    gender_matching: GenderMatching,
    /// First successful load, reused for the process lifetime
    cache: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetLoader {
    /// Create a loader for two source files
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(exercise_path: P, calories_path: Q) -> Self {
        Self {
            exercise_path: exercise_path.as_ref().to_path_buf(),
            calories_path: calories_path.as_ref().to_path_buf(),
            delimiter: ',',
            gender_matching: GenderMatching::Exact,
            cache: RwLock::new(None),
        }
    }

    /// Create a loader from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let DataConfig {
            exercise_path,
            calories_path,
            delimiter,
        } = &config.data;

        Self::new(exercise_path, calories_path)
            .with_delimiter(*delimiter)
            .with_gender_matching(config.model.gender_matching)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_gender_matching(mut self, matching: GenderMatching) -> Self {
        self.gender_matching = matching;
        self
    }

    /// Load and join both sources, memoizing the result.
    pub fn load(&self) -> Result<Arc<Dataset>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(dataset) = cache.as_ref() {
                return Ok(Arc::clone(dataset));
            }
        }

        let exercise = self.read_table(&self.exercise_path)?;
        let calories = self.read_table(&self.calories_path)?;
        let dataset = Arc::new(Dataset::from_tables(
            &exercise,
            &calories,
            self.gender_matching,
        )?);

        info!(
            exercise = %self.exercise_path.display(),
            calories = %self.calories_path.display(),
            records = dataset.len(),
            "Dataset loaded"
        );

        if let Ok(mut cache) = self.cache.write() {
            // Another caller may have finished first; keep its copy
            let cached = cache.get_or_insert_with(|| Arc::clone(&dataset));
            return Ok(Arc::clone(cached));
        }

        Ok(dataset)
    }

    /// Whether a load has already been memoized
    pub fn is_cached(&self) -> bool {
        self.cache.read().map(|c| c.is_some()).unwrap_or(false)
    }

    fn read_table(&self, path: &Path) -> Result<Table> {
        let source_name = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FitTrackError::unavailable(source_name.clone(), e.to_string()))?;
        Table::parse(source_name, &text, self.delimiter)
    }
}
