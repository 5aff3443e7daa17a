//! High score leaderboard system
//!
//! Persisted to a JSON file, tracks the top 10 runs. Higher score wins;
//! equal scores are ranked by the faster time.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::persistence::{self, PersistenceError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Default score file name
pub const DEFAULT_SCORE_FILE: &str = "high_scores.json";

const DEFAULT_NAME: &str = "Unknown";
const DEFAULT_TIME: f32 = 999.99;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// Seconds taken to reach the score
    pub time: f32,
    /// When achieved, stored as RFC 3339
    pub date: DateTime<Utc>,
}

impl HighScoreEntry {
    pub fn new(name: &str, score: u32, time: f32) -> Self {
        Self {
            name: name.to_string(),
            score,
            time,
            date: Utc::now(),
        }
    }

    /// Build an entry from one stored record. Fields that are missing or of
    /// the wrong type get defaults; only non-object records are rejected.
    pub fn from_record(record: &Value) -> Option<Self> {
        let fields = record.as_object()?;
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NAME)
            .to_string();
        let score = fields
            .get("score")
            .and_then(Value::as_f64)
            .map(|score| score as u32)
            .unwrap_or(0);
        let time = fields
            .get("time")
            .and_then(Value::as_f64)
            .map(|time| time as f32)
            .filter(|time| time.is_finite() && *time >= 0.0)
            .unwrap_or(DEFAULT_TIME);
        let date = fields
            .get("date")
            .and_then(parse_date)
            .unwrap_or_else(Utc::now);
        Some(Self {
            name,
            score,
            time,
            date,
        })
    }
}

/// Accepts RFC 3339, a zone-less ISO timestamp (local time) or Unix
/// milliseconds
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|date| date.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                text.parse::<NaiveDateTime>()
                    .ok()?
                    .and_local_timezone(Local)
                    .earliest()
                    .map(|date| date.with_timezone(&Utc))
            }),
        Value::Number(millis) => DateTime::from_timestamp_millis(millis.as_f64()? as i64),
        _ => None,
    }
}

/// Ranking order: score descending, then time ascending
fn rank_order(a: &HighScoreEntry, b: &HighScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then(a.time.total_cmp(&b.time))
}

/// Whether a (score, time) result ranks strictly ahead of `entry`
fn beats(score: u32, time: f32, entry: &HighScoreEntry) -> bool {
    score > entry.score || (score == entry.score && time < entry.time)
}

/// High score leaderboard
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Backing file; `None` keeps the board in memory only
    path: Option<PathBuf>,
}

impl HighScores {
    /// Create an empty, in-memory leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a result would make the board
    pub fn qualifies(&self, score: u32, time: f32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| beats(score, time, e))
            .unwrap_or(true)
    }

    /// Get the rank a result would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32, time: f32) -> Option<usize> {
        if !self.qualifies(score, time) {
            return None;
        }
        let rank = self.entries.iter().position(|e| beats(score, time, e));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a result and persist the board.
    /// Returns the rank achieved (1-indexed) or 0 if it didn't qualify.
    pub fn add_score(&mut self, name: &str, score: u32, time: f32) -> usize {
        let Some(rank) = self.potential_rank(score, time) else {
            return 0;
        };

        self.entries.insert(rank - 1, HighScoreEntry::new(name, score, time));
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High score #{rank}: {name} {score} in {time:.2}s");

        self.save();
        rank
    }

    /// The best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Wipe the board and persist the empty list
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load from a JSON file. Bad records are defaulted field by field; a file
    /// that is not a JSON list is moved aside so the next save cannot destroy
    /// it. Either way the board still saves to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match persistence::load_json::<Vec<Value>>(&path) {
            Ok(Some(records)) => records,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Vec::new()
            }
            Err(e @ PersistenceError::Json { .. }) => {
                log::warn!("Failed to load high scores: {e}");
                match persistence::set_aside(&path) {
                    Ok(aside) => log::warn!("Unreadable score file moved to {}", aside.display()),
                    Err(e) => log::warn!("Could not move unreadable score file: {e}"),
                }
                Vec::new()
            }
            Err(e) => {
                log::warn!("Failed to load high scores: {e}");
                Vec::new()
            }
        };

        let mut entries: Vec<HighScoreEntry> =
            records.iter().filter_map(HighScoreEntry::from_record).collect();
        if entries.len() < records.len() {
            log::warn!(
                "Skipped {} score records that are not objects",
                records.len() - entries.len()
            );
        }
        log::info!("Loaded {} high scores from {}", entries.len(), path.display());

        entries.sort_by(rank_order);
        entries.truncate(MAX_HIGH_SCORES);
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Write the board to its file (no-op for in-memory boards)
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match persistence::save_json(path, &self.entries) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {e}"),
        }
    }
}

/// Format a timestamp relative to `now`; a week or older shows as `M/D/YY`
/// in the zone of `date`
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let age = now.clone().signed_duration_since(date.clone());

    let days = age.num_days();
    if days >= 1 {
        return match days {
            1 => "Yesterday".to_string(),
            2..=6 => format!("{days} days ago"),
            _ => date.format("%-m/%-d/%y").to_string(),
        };
    }
    match (age.num_hours(), age.num_minutes()) {
        (1, _) => "1 hour ago".to_string(),
        (hours, _) if hours > 1 => format!("{hours} hours ago"),
        (_, 1) => "1 min ago".to_string(),
        (_, mins) if mins > 1 => format!("{mins} mins ago"),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_by_score_then_time() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("c", 80, 10.0), 1);
        assert_eq!(scores.add_score("b", 95, 8.0), 1);
        assert_eq!(scores.add_score("d", 60, 20.0), 3);
        assert_eq!(scores.add_score("a", 95, 7.5), 1);

        let order: Vec<(u32, f32)> = scores.entries.iter().map(|e| (e.score, e.time)).collect();
        assert_eq!(order, vec![(95, 7.5), (95, 8.0), (80, 10.0), (60, 20.0)]);
    }

    #[test]
    fn test_full_board_rejects_worse_results() {
        let mut scores = HighScores::new();
        for i in 0..MAX_HIGH_SCORES {
            scores.add_score("p", 100, 10.0 + i as f32);
        }
        assert!(!scores.qualifies(100, 19.0));
        assert!(!scores.qualifies(90, 1.0));
        assert!(scores.qualifies(100, 18.5));
        assert_eq!(scores.potential_rank(101, 50.0), Some(1));

        assert_eq!(scores.add_score("late", 50, 1.0), 0);
        assert_eq!(scores.add_score("fast", 100, 12.5), 4);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.time), Some(18.0));
    }

    #[test]
    fn test_any_result_qualifies_on_short_board() {
        let scores = HighScores::new();
        assert!(scores.qualifies(0, 999.0));
        assert_eq!(scores.potential_rank(0, 999.0), Some(1));
        assert_eq!(scores.top(3).len(), 0);
    }

    #[test]
    fn test_persists_and_reloads_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SCORE_FILE);

        let mut scores = HighScores::load(&path);
        assert!(scores.is_empty());
        scores.add_score("slow", 100, 40.0);
        scores.add_score("quick", 100, 20.0);

        let reloaded = HighScores::load(&path);
        assert_eq!(reloaded.entries.len(), 2);
        assert_eq!(reloaded.entries[0].name, "quick");
        assert_eq!(reloaded.top_score(), Some(100));

        scores.clear();
        assert!(HighScores::load(&path).is_empty());
    }

    #[test]
    fn test_malformed_records_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"[{"score": 12}, {"name": "Zed", "time": 3.5}]"#).unwrap();

        let before = Utc::now();
        let scores = HighScores::load(&path);
        assert_eq!(scores.entries.len(), 2);
        assert_eq!(scores.entries[0].name, "Unknown");
        assert_eq!(scores.entries[0].score, 12);
        assert_eq!(scores.entries[0].time, 999.99);
        assert!(scores.entries[0].date >= before);
        assert_eq!(scores.entries[1].name, "Zed");
        assert_eq!(scores.entries[1].score, 0);
    }

    #[test]
    fn test_mixed_records_survive_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Ann", "score": 100, "time": 30.5, "date": "2025-01-01T10:00:00"},
                {"name": "Bob", "score": 90, "time": "fast", "date": 1700000000000.0},
                {"name": 7, "score": -4, "time": 12.0, "date": "2024-06-01T08:00:00Z"},
                "not a record"
            ]"#,
        )
        .unwrap();

        let mut scores = HighScores::load(&path);
        let names: Vec<&str> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Unknown"]);

        let ann = &scores.entries[0];
        let naive: NaiveDateTime = "2025-01-01T10:00:00".parse().unwrap();
        assert_eq!(ann.date.with_timezone(&Local).naive_local(), naive);

        let bob = &scores.entries[1];
        assert_eq!(bob.time, 999.99);
        assert_eq!(bob.date.timestamp_millis(), 1_700_000_000_000);
        let bob_date = bob.date;

        let unknown = &scores.entries[2];
        assert_eq!(unknown.score, 0);
        assert_eq!(unknown.date.to_rfc3339(), "2024-06-01T08:00:00+00:00");

        scores.add_score("New", 10, 50.0);
        let reloaded = HighScores::load(&path);
        let names: Vec<&str> = reloaded.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "New", "Unknown"]);
        assert_eq!(reloaded.entries[1].date, bob_date);
    }

    #[test]
    fn test_unreadable_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "garbage").unwrap();

        let mut scores = HighScores::load(&path);
        assert!(scores.is_empty());
        assert_eq!(scores.path(), Some(path.as_path()));

        scores.add_score("First", 5, 60.0);
        let aside = dir.path().join("scores.json.corrupt");
        assert_eq!(std::fs::read_to_string(aside).unwrap(), "garbage");
        assert_eq!(HighScores::load(&path).entries.len(), 1);
    }

    #[test]
    fn test_dates_are_written_as_rfc3339() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut scores = HighScores::load(&path);
        scores.add_score("Ivy", 100, 42.0);

        let raw: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let date = raw[0]["date"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(date).is_ok());
    }

    #[test]
    fn test_format_date() {
        // 2023-11-14 22:13:20 UTC
        let then = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let after = |secs: i64| then + chrono::TimeDelta::seconds(secs);

        assert_eq!(format_date(&then, &after(5)), "Just now");
        assert_eq!(format_date(&then, &after(61)), "1 min ago");
        assert_eq!(format_date(&then, &after(45 * 60)), "45 mins ago");
        assert_eq!(format_date(&then, &after(3_600)), "1 hour ago");
        assert_eq!(format_date(&then, &after(3 * 3_600)), "3 hours ago");
        assert_eq!(format_date(&then, &after(86_400)), "Yesterday");
        assert_eq!(format_date(&then, &after(3 * 86_400)), "3 days ago");
        assert_eq!(format_date(&then, &after(30 * 86_400)), "11/14/23");
        assert_eq!(format_date(&after(60), &then), "Just now");
    }
}
