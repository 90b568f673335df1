//! Scenario event telemetry for pubcheck
//!
//! Records scenario lifecycle events in JSONL format for later analysis.
//! The log is carried explicitly in the scenario context; there is no
//! process-wide sink.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Stage of a scenario's lifecycle an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// ProjectSpec constructed and validated
    Built,
    /// External build tool executed
    Invoked,
    /// Artifact read and expectations evaluated
    Verified,
    /// Terminal outcome recorded
    Completed,
}

/// An event entry for the telemetry log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    /// ISO 8601 timestamp when the event occurred
    pub timestamp: String,
    /// Scenario identifier the event belongs to
    pub scenario: String,
    /// Lifecycle stage
    pub stage: Stage,
    /// Event detail (outcome, captured reason, ...)
    pub detail: String,
}

impl EventEntry {
    /// Create a new event entry with the current timestamp
    pub fn new(scenario: impl Into<String>, stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            timestamp: iso8601_now(),
            scenario: scenario.into(),
            stage,
            detail: detail.into(),
        }
    }
}

/// Get current timestamp in ISO 8601 format
fn iso8601_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let duration = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = duration.as_secs();

    // Convert to date/time components (simplified UTC)
    let days = secs / 86400;
    let time_secs = secs % 86400;
    let hours = time_secs / 3600;
    let mins = (time_secs % 3600) / 60;
    let secs = time_secs % 60;

    // Calculate year/month/day from days since epoch (1970-01-01)
    let mut remaining_days = days as i64;
    let mut year = 1970i32;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for days_in_month in days_in_months.iter() {
        if remaining_days < *days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }
    let day = remaining_days + 1;

    format!("{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z", year, month, day, hours, mins, secs)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Event log that appends to a JSONL file
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    /// Path to the event log file
    path: std::path::PathBuf,
    /// Whether collection is enabled
    enabled: bool,
}

impl TelemetryLog {
    /// Create a new telemetry log
    pub fn new(path: impl AsRef<Path>, enabled: bool) -> Self {
        Self { path: path.as_ref().to_path_buf(), enabled }
    }

    /// Create a disabled log that drops all events
    pub fn disabled() -> Self {
        Self { path: std::path::PathBuf::new(), enabled: false }
    }

    /// Check if event collection is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log an event entry (appends to the JSONL file)
    pub fn log(&self, entry: &EventEntry) -> std::io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }

    /// Log an event, ignoring I/O failures.
    ///
    /// Telemetry must never fail a scenario.
    pub fn record(&self, scenario: &str, stage: Stage, detail: impl Into<String>) {
        let _ = self.log(&EventEntry::new(scenario, stage, detail));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disabled_log_writes_nothing() {
        let log = TelemetryLog::disabled();
        assert!(!log.is_enabled());
        log.record("s1", Stage::Built, "ok");
    }

    #[test]
    fn test_log_appends_jsonl() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.jsonl");
        let log = TelemetryLog::new(&path, true);

        log.record("HelloWorld-net8.0-trimmed", Stage::Invoked, "exit 0");
        log.record("HelloWorld-net8.0-trimmed", Stage::Completed, "passed");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: EventEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.scenario, "HelloWorld-net8.0-trimmed");
        assert_eq!(first.stage, Stage::Invoked);
        assert!(first.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_log_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/events.jsonl");
        let log = TelemetryLog::new(&path, true);

        log.record("s1", Stage::Built, "ok");
        assert!(path.exists());
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = iso8601_now();
        // 2024-01-01T00:00:00Z
        assert_eq!(ts.len(), 20);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
    }
}
