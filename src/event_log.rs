use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    AppStart,
    AppQuit,
    Pause,
    Resume,
    Skip,
    Reset,
    FocusEnd,
    BreakEnd,
    FocusEndSkipped,
    BreakEndSkipped,
    CmdRunDetached,
    CmdError,
}

/// Append-only sink for session events. Implementations swallow their own
/// failures; recording never aborts the caller.
pub trait EventLog {
    fn record(&mut self, kind: EventKind, detail: &str);
}

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    timestamp: String,
    kind: String,
    detail: &'a str,
}

/// Writes `timestamp,kind,detail` rows to a CSV file, opening it in append
/// mode for every record.
#[derive(Debug, Clone)]
pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, kind: EventKind, detail: &str) -> Result<(), csv::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(EventRow {
            timestamp: Local::now().to_rfc3339(),
            kind: kind.to_string(),
            detail,
        })?;
        writer.flush()?;
        Ok(())
    }
}

impl EventLog for CsvEventLog {
    fn record(&mut self, kind: EventKind, detail: &str) {
        if let Err(err) = self.append(kind, detail) {
            warn!(path = %self.path.display(), %kind, error = %err, "failed to append event");
        }
    }
}

/// Keeps events in memory. Used by headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    pub entries: Vec<(EventKind, String)>,
}

impl MemoryEventLog {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.iter().map(|(kind, _)| *kind).collect()
    }
}

impl EventLog for MemoryEventLog {
    fn record(&mut self, kind: EventKind, detail: &str) {
        self.entries.push((kind, detail.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows(path: &Path) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .records()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn kinds_render_in_screaming_snake_case() {
        assert_eq!(EventKind::AppStart.to_string(), "APP_START");
        assert_eq!(EventKind::BreakEndSkipped.to_string(), "BREAK_END_SKIPPED");
        assert_eq!(EventKind::CmdRunDetached.to_string(), "CMD_RUN_DETACHED");
    }

    #[test]
    fn appends_rows_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("events.csv");

        let mut log = CsvEventLog::new(&path);
        log.record(EventKind::AppStart, "focus=1500s break=300s cmd=no");
        log.record(EventKind::Pause, "mode=FOCUS rem=42s");

        let mut reopened = CsvEventLog::new(&path);
        reopened.record(EventKind::AppQuit, "sessions=0");

        let rows = rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "APP_START");
        assert_eq!(&rows[0][2], "focus=1500s break=300s cmd=no");
        assert_eq!(&rows[1][1], "PAUSE");
        assert_eq!(&rows[2][1], "APP_QUIT");
        assert!(chrono::DateTime::parse_from_rfc3339(&rows[0][0]).is_ok());
    }

    #[test]
    fn details_with_commas_and_quotes_survive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let mut log = CsvEventLog::new(&path);
        log.record(EventKind::CmdError, "sh: \"a, b\" not found");

        let rows = rows(&path);
        assert_eq!(&rows[0][2], "sh: \"a, b\" not found");
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = tempdir().unwrap();
        // a directory cannot be opened for appending
        let mut log = CsvEventLog::new(dir.path());
        log.record(EventKind::AppStart, "ignored");
    }

    #[test]
    fn memory_log_keeps_order() {
        let mut log = MemoryEventLog::default();
        log.record(EventKind::Skip, "a");
        log.record(EventKind::Skip, "b");
        log.record(EventKind::Reset, "");
        assert_eq!(
            log.kinds(),
            vec![EventKind::Skip, EventKind::Skip, EventKind::Reset]
        );
    }
}
