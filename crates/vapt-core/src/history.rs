//! Report history log
//!
//! A capped, newest-first log of generated reports. The log is advisory
//! metadata: a read failure degrades to an empty list and an append failure
//! never blocks a generation. File-backed stores use a read-modify-write
//! with no cross-process locking; concurrent writers can lose entries.

use crate::{AssessmentType, CoreError, CoreResult, ReportType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Oldest entries are discarded past this count.
pub const HISTORY_CAP: usize = 50;

/// One generated-report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHistoryRecord {
    pub id: String,
    /// Output file name of the report.
    pub name: String,
    /// Generation date, `YYYY-MM-DD`.
    pub date: String,
    pub report_type: ReportType,
    pub company_name: String,
    pub assessment_type: AssessmentType,
    pub file_path: String,
    pub size_bytes: u64,
}

/// Persistence seam for the history log.
pub trait HistoryStore: Send + Sync {
    /// Prepend a record, truncating to [`HISTORY_CAP`] entries.
    fn append(&self, record: ReportHistoryRecord) -> CoreResult<()>;

    /// All records, newest first. Missing or unreadable state yields an
    /// empty list, never an error.
    fn list(&self) -> Vec<ReportHistoryRecord>;

    /// Remove the record with the given id, returning the remaining list.
    fn delete_by_id(&self, id: &str) -> CoreResult<Vec<ReportHistoryRecord>>;
}

/// History persisted as a JSON array in a single file.
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Vec<ReportHistoryRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("history file {} is corrupt: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn write(&self, records: &[ReportHistoryRecord]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(records)
            .map_err(|e| CoreError::History(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl HistoryStore for JsonFileHistory {
    fn append(&self, record: ReportHistoryRecord) -> CoreResult<()> {
        let mut records = self.read();
        records.insert(0, record);
        records.truncate(HISTORY_CAP);
        self.write(&records)
    }

    fn list(&self) -> Vec<ReportHistoryRecord> {
        self.read()
    }

    fn delete_by_id(&self, id: &str) -> CoreResult<Vec<ReportHistoryRecord>> {
        let mut records = self.read();
        records.retain(|r| r.id != id);
        self.write(&records)?;
        Ok(records)
    }
}

/// In-memory history, used by tests and one-shot invocations.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<ReportHistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, record: ReportHistoryRecord) -> CoreResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| CoreError::History(e.to_string()))?;
        records.insert(0, record);
        records.truncate(HISTORY_CAP);
        Ok(())
    }

    fn list(&self) -> Vec<ReportHistoryRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(_) => Vec::new(),
        }
    }

    fn delete_by_id(&self, id: &str) -> CoreResult<Vec<ReportHistoryRecord>> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| CoreError::History(e.to_string()))?;
        records.retain(|r| r.id != id);
        Ok(records.clone())
    }
}
