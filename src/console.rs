//! Line-oriented session console standing in for the dashboard sidebar

use crate::dashboard::{Dashboard, DashboardReport};
use crate::session::SessionLog;
use crate::types::UserProfile;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Profile field addressable by `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Age,
    Gender,
    Height,
    Weight,
    Duration,
    HeartRate,
    BodyTemp,
    Goal,
}

impl ProfileField {
    fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            "age" => ProfileField::Age,
            "gender" => ProfileField::Gender,
            "height" => ProfileField::Height,
            "weight" => ProfileField::Weight,
            "duration" => ProfileField::Duration,
            "heart_rate" | "hr" => ProfileField::HeartRate,
            "body_temp" | "temp" => ProfileField::BodyTemp,
            "goal" => ProfileField::Goal,
            other => bail!("unknown field `{}`", other),
        })
    }

    /// Write a raw value into the profile
    pub fn apply(self, profile: &mut UserProfile, value: &str) -> Result<()> {
        let number = || -> Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("`{}` is not a number", value))
        };

        match self {
            ProfileField::Age => {
                profile.age = value
                    .parse::<u32>()
                    .with_context(|| format!("`{}` is not a whole number of years", value))?
            }
            // Validated when the profile is evaluated
            ProfileField::Gender => profile.gender = value.to_string(),
            ProfileField::Height => profile.height_cm = number()?,
            ProfileField::Weight => profile.weight_kg = number()?,
            ProfileField::Duration => profile.duration_min = number()?,
            ProfileField::HeartRate => profile.heart_rate_bpm = number()?,
            ProfileField::BodyTemp => profile.body_temp_c = number()?,
            ProfileField::Goal => profile.daily_calorie_goal = number()?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Set(ProfileField, String),
    Save,
    Json,
    History,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        let command = match verb {
            "show" | "predict" => Command::Show,
            "set" => {
                let (Some(field), Some(value)) = (words.next(), words.next()) else {
                    bail!("usage: set <field> <value>");
                };
                Command::Set(ProfileField::parse(field)?, value.to_string())
            }
            "save" => Command::Save,
            "json" => Command::Json,
            "history" => Command::History,
            "export" => Command::Export(words.next().map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{}` (try `help`)", other),
        };

        if words.next().is_some() {
            bail!("too many arguments for `{}`", verb);
        }
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  show                     evaluate the current profile
  set <field> <value>      fields: age gender height weight duration heart_rate body_temp goal
  save                     save the last evaluated workout
  json                     print the last report as JSON
  history                  list saved workouts and totals
  export [path]            write saved workouts as CSV
  quit";

/// State owned by one interactive session
pub struct ConsoleSession {
    profile: UserProfile,
    log: SessionLog,
    last_report: Option<DashboardReport>,
    export_path: PathBuf,
}

impl ConsoleSession {
    pub fn new(profile: UserProfile, export_path: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            log: SessionLog::new(),
            last_report: None,
            export_path: export_path.into(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, dashboard: &Dashboard, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        self.handle(dashboard, Command::Show, out)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };

            if !self.handle(dashboard, command, out)? {
                break;
            }
        }

        Ok(())
    }

    /// Apply one command; returns `false` once the session should end.
    ///
    /// Recoverable problems are reported to `out` and the session goes on.
    pub fn handle<W: Write>(&mut self, dashboard: &Dashboard, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Show => self.show(dashboard, out)?,
            Command::Set(field, value) => {
                let mut updated = self.profile.clone();
                match field.apply(&mut updated, &value) {
                    Ok(()) => {
                        self.profile = updated;
                        self.show(dashboard, out)?;
                    }
                    Err(e) => writeln!(out, "error: {:#}", e)?,
                }
            }
            Command::Save => match &self.last_report {
                Some(report) => {
                    let entry = dashboard.save_workout(&mut self.log, report);
                    writeln!(out, "Workout saved ({:.0} kcal)", entry.calories)?;
                }
                None => writeln!(out, "error: nothing to save, the current profile is invalid")?,
            },
            Command::Json => match &self.last_report {
                Some(report) => {
                    let json = serde_json::to_string_pretty(report)
                        .context("Failed to serialize report")?;
                    writeln!(out, "{}", json)?;
                }
                None => writeln!(out, "error: no report, the current profile is invalid")?,
            },
            Command::History => self.history(out)?,
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                match std::fs::write(&path, self.log.to_csv()) {
                    Ok(()) => {
                        info!(path = %path.display(), workouts = self.log.len(), "History exported");
                        writeln!(out, "Exported {} workouts to {}", self.log.len(), path.display())?;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to export history");
                        writeln!(out, "error: failed to write {}: {}", path.display(), e)?;
                    }
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn show<W: Write>(&mut self, dashboard: &Dashboard, out: &mut W) -> Result<()> {
        match dashboard.evaluate(&self.profile) {
            Ok(report) => {
                write!(out, "{}", render_report(&report))?;
                self.last_report = Some(report);
            }
            Err(e) if e.is_recoverable() => {
                self.last_report = None;
                warn!(error = %e, "Invalid profile");
                writeln!(out, "error: {}", e)?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn history<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.log.is_empty() {
            writeln!(out, "No workouts saved yet")?;
            return Ok(());
        }

        for entry in self.log.all() {
            writeln!(
                out,
                "  {}  {:>6.0} kcal  {:>4.0} min  {:>4.0} bpm",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.calories,
                entry.duration_min,
                entry.heart_rate_bpm
            )?;
        }

        let totals = self.log.totals();
        writeln!(out, "Total calories burned: {:.0} kcal", totals.total_calories)?;
        if let Some(mean) = totals.mean_heart_rate {
            writeln!(out, "Average heart rate: {:.0} bpm", mean)?;
        }
        Ok(())
    }
}

/// Plain-text rendering of a report
pub fn render_report(report: &DashboardReport) -> String {
    let mut text = String::new();

    text.push_str(&format!("BMI: {:.1}\n", report.bmi));
    text.push_str(&format!(
        "Calories burned: {:.0} kcal ({:.0} / {:.0} kcal goal, {:.0}%)\n",
        report.calories_burned(),
        report.calories_burned(),
        report.daily_calorie_goal,
        report.goal_progress * 100.0
    ));

    if report.badges.is_empty() {
        text.push_str("Achievements: start training to unlock achievements!\n");
    } else {
        let titles: Vec<&str> = report.badges.iter().map(|b| b.title()).collect();
        text.push_str(&format!("Achievements: {}\n", titles.join(", ")));
    }

    text.push_str("Recommendations:\n");
    for message in report.recommendations.messages() {
        text.push_str(&format!("  - {}\n", message));
    }

    text.push_str(&format!("Workout plan ({:?}):\n", report.workout_plan));
    for activity in report.workout_plan.activities() {
        text.push_str(&format!("  - {}\n", activity));
    }

    text.push_str(&format!(
        "Community: you burn more than {:.0}% of recorded workouts\n",
        report.community.calorie_percentile
    ));
    if let Some(mean) = report.community.mean_calories_at_age {
        text.push_str(&format!("  average at your age: {:.0} kcal\n", mean));
    }

    text.push_str("Model feature importance:\n");
    for importance in &report.importances {
        text.push_str(&format!("  {:<10} {:.3}\n", importance.feature, importance.weight));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::dataset::Dataset;
    use crate::feature_extractor::FeatureExtractor;
    use crate::models::Predictor;
    use crate::types::{Gender, WorkoutRecord};
    use std::sync::Arc;

    fn dashboard() -> Dashboard {
        let records: Vec<WorkoutRecord> = (0..30)
            .map(|i| {
                let duration = 10.0 + i as f64;
                WorkoutRecord::new(
                    i.to_string(),
                    Gender::Male,
                    30,
                    175.0,
                    75.0,
                    duration,
                    110.0,
                    39.0,
                    duration * 6.0,
                )
            })
            .collect();
        let model = ModelConfig {
            n_trees: 5,
            ..ModelConfig::default()
        };
        let predictor = Predictor::fit(&records, &model).unwrap();
        Dashboard::new(
            Arc::new(Dataset::new(records)),
            Arc::new(predictor),
            FeatureExtractor::default(),
            5,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("show").unwrap(), Command::Show);
        assert_eq!(
            Command::parse("set hr 150").unwrap(),
            Command::Set(ProfileField::HeartRate, "150".to_string())
        );
        assert_eq!(
            Command::parse("export out.csv").unwrap(),
            Command::Export(Some(PathBuf::from("out.csv")))
        );
        assert_eq!(Command::parse("  quit ").unwrap(), Command::Quit);

        assert!(Command::parse("").is_err());
        assert!(Command::parse("set age").is_err());
        assert!(Command::parse("set shoe_size 9").is_err());
        assert!(Command::parse("save now").is_err());
        assert!(Command::parse("dance").is_err());
        assert_eq!(Command::parse("json").unwrap(), Command::Json);
    }

    #[test]
    fn test_apply_field() {
        let mut profile = UserProfile::default();

        ProfileField::Weight.apply(&mut profile, "81.5").unwrap();
        ProfileField::Gender.apply(&mut profile, "Female").unwrap();
        assert_eq!(profile.weight_kg, 81.5);
        assert_eq!(profile.gender, "Female");

        assert!(ProfileField::Age.apply(&mut profile, "thirty").is_err());
        assert!(ProfileField::Age.apply(&mut profile, "-3").is_err());
        assert_eq!(profile.age, 30);
    }

    #[test]
    fn test_invalid_gender_blocks_save() {
        let dashboard = dashboard();
        let mut session = ConsoleSession::new(UserProfile::default(), "unused.csv");
        let mut out = Vec::new();

        let input = "save\nset gender robot\nsave\nhistory\nquit\nsave\n";
        session.run(&dashboard, input.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unrecognized gender"));
        assert!(text.contains("nothing to save"));
        // Only the first save, before the bad input, was recorded
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.profile().gender, "robot");
    }

    #[test]
    fn test_export() {
        let dashboard = dashboard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut session = ConsoleSession::new(UserProfile::default(), &path);
        let mut out = Vec::new();

        for command in [Command::Show, Command::Save, Command::Save, Command::Export(None)] {
            assert!(session.handle(&dashboard, command, &mut out).unwrap());
        }
        assert!(!session.handle(&dashboard, Command::Quit, &mut out).unwrap());

        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("timestamp,calories,duration,heart_rate\n"));
    }

    #[test]
    fn test_json_report() {
        let dashboard = dashboard();
        let mut session = ConsoleSession::new(UserProfile::default(), "unused.csv");
        let mut out = Vec::new();

        session.handle(&dashboard, Command::Show, &mut out).unwrap();
        out.clear();
        session.handle(&dashboard, Command::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["duration_min"], 30.0);
        assert!(value["prediction"]["calories_burned"].is_number());
        assert_eq!(value["importances"].as_array().map(|a| a.len()), Some(6));
    }
}
