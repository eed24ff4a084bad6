//! Persistence of finished screening results

use crate::error::{Result, ScreenerError};
use chrono::{DateTime, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Accepts a finished record for a job and returns an opaque identifier.
pub trait PersistenceSink<R: Serialize>: Send + Sync {
    fn persist(&self, job_id: u64, record: &R) -> Result<String>;
}

/// One persisted record, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord<R> {
    pub id: String,
    pub job_id: u64,
    pub saved_at: DateTime<Utc>,
    pub record: R,
}

/// Appends records to a JSON Lines file, one object per line.
pub struct JsonLinesSink {
    path: PathBuf,
    sequence: AtomicU64,
    write_lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sequence: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_id(&self, now: &DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:04}", now.format("%Y%m%d%H%M%S%3f"), seq)
    }

    /// All stored records in file order. A missing file is an empty history.
    pub fn read_all<R: DeserializeOwned>(&self) -> Result<Vec<StoredRecord<R>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                ScreenerError::Persistence(format!(
                    "{}:{}: malformed record: {}",
                    self.path.display(),
                    line_no + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// The stored record with identifier `id`, if any.
    pub fn find<R: DeserializeOwned>(&self, id: &str) -> Result<Option<StoredRecord<R>>> {
        Ok(self.read_all()?.into_iter().find(|record| record.id == id))
    }

    /// Most recent records first, at most `limit` of them.
    pub fn recent<R: DeserializeOwned>(&self, limit: usize) -> Result<Vec<StoredRecord<R>>> {
        let mut records = self.read_all()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}

impl<R: Serialize> PersistenceSink<R> for JsonLinesSink {
    fn persist(&self, job_id: u64, record: &R) -> Result<String> {
        let saved_at = Utc::now();
        let id = self.next_id(&saved_at);
        let line = serde_json::to_string(&StoredRecord {
            id: id.clone(),
            job_id,
            saved_at,
            record,
        })?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| ScreenerError::Persistence(format!("History lock poisoned: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        debug!("Persisted record {} for job {} to {}", id, job_id, self.path.display());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_persist_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(temp_dir.path().join("nested").join("history.jsonl"));

        let first = sink.persist(1, &Note { text: "one".into() }).unwrap();
        let second = sink.persist(1, &Note { text: "two".into() }).unwrap();
        assert_ne!(first, second);

        let all: Vec<StoredRecord<Note>> = sink.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first);
        assert_eq!(all[1].record.text, "two");
        assert_eq!(all[1].job_id, 1);

        let recent: Vec<StoredRecord<Note>> = sink.recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, second);
    }

    #[test]
    fn test_find_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(temp_dir.path().join("history.jsonl"));

        sink.persist(1, &Note { text: "one".into() }).unwrap();
        let id = sink.persist(2, &Note { text: "two".into() }).unwrap();

        let found: Option<StoredRecord<Note>> = sink.find(&id).unwrap();
        let found = found.unwrap();
        assert_eq!(found.job_id, 2);
        assert_eq!(found.record.text, "two");

        let missing: Option<StoredRecord<Note>> = sink.find("19700101000000000-0000").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_missing_history_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(temp_dir.path().join("none.jsonl"));
        let all: Vec<StoredRecord<Note>> = sink.read_all().unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.jsonl");
        fs::write(&path, "\n{not json}\n").unwrap();

        let sink = JsonLinesSink::new(&path);
        let result: Result<Vec<StoredRecord<Note>>> = sink.read_all();
        match result {
            Err(ScreenerError::Persistence(msg)) => assert!(msg.contains(":2:")),
            other => panic!("expected persistence error, got {:?}", other.map(|r| r.len())),
        }
    }
}
