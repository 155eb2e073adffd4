//! Per-session workout history

use crate::types::{SessionEntry, SessionTotals};
use chrono::SecondsFormat;
use uuid::Uuid;

/// Header row of the exported history
pub const EXPORT_HEADER: &str = "timestamp,calories,duration,heart_rate";

/// Append-only log of the workouts saved in one session.
///
/// Owned by the session context and passed by `&mut` to whatever records a
/// workout; nothing is shared between sessions and nothing is persisted.
#[derive(Debug, Clone)]
pub struct SessionLog {
    id: Uuid,
    entries: Vec<SessionEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            entries: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn append(&mut self, entry: SessionEntry) {
        self.entries.push(entry);
    }

    /// Entries in insertion order
    pub fn all(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total calories and mean heart rate over every entry.
    ///
    /// An empty log totals zero calories and has no mean heart rate.
    pub fn totals(&self) -> SessionTotals {
        let total_calories = self.entries.iter().map(|e| e.calories).sum();
        let mean_heart_rate = if self.entries.is_empty() {
            None
        } else {
            let sum: f64 = self.entries.iter().map(|e| e.heart_rate_bpm).sum();
            Some(sum / self.entries.len() as f64)
        };

        SessionTotals {
            workouts: self.entries.len(),
            total_calories,
            mean_heart_rate,
        }
    }

    /// Render the history as delimited text, one row per entry
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + self.entries.len() * 48);
        out.push_str(EXPORT_HEADER);
        out.push('\n');

        for entry in &self.entries {
            out.push_str(&format!(
                "{},{},{},{}\n",
                entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                entry.calories,
                entry.duration_min,
                entry.heart_rate_bpm
            ));
        }

        out
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_totals() {
        let log = SessionLog::new();
        let totals = log.totals();

        assert_eq!(totals.workouts, 0);
        assert_eq!(totals.total_calories, 0.0);
        assert_eq!(totals.mean_heart_rate, None);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = SessionLog::new();
        log.append(SessionEntry::new(100.0, 20.0, 110.0));
        log.append(SessionEntry::new(250.0, 40.0, 150.0));
        log.append(SessionEntry::new(50.0, 10.0, 95.0));

        let calories: Vec<f64> = log.all().iter().map(|e| e.calories).collect();
        assert_eq!(calories, vec![100.0, 250.0, 50.0]);
    }

    #[test]
    fn test_totals() {
        let mut log = SessionLog::new();
        log.append(SessionEntry::new(120.5, 20.0, 110.0));
        log.append(SessionEntry::new(300.25, 40.0, 150.0));

        let totals = log.totals();
        assert_eq!(totals.workouts, 2);
        assert_eq!(totals.total_calories, 420.75);
        assert_eq!(totals.mean_heart_rate, Some(130.0));
    }

    #[test]
    fn test_csv_export() {
        let mut log = SessionLog::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap();
        log.append(SessionEntry::at(231.5, 30.0, 120.0, at));

        assert_eq!(
            log.to_csv(),
            "timestamp,calories,duration,heart_rate\n2024-03-01T07:30:00.000Z,231.5,30,120\n"
        );
        assert_eq!(SessionLog::new().to_csv(), "timestamp,calories,duration,heart_rate\n");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut first = SessionLog::new();
        let second = SessionLog::new();
        first.append(SessionEntry::new(100.0, 20.0, 110.0));

        assert_ne!(first.id(), second.id());
        assert!(second.is_empty());
    }
}
