use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::reminder::{validate_batch, Batch, ReminderRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fetch worker failed: {0}")]
    Worker(String),
}

/// Anything that can hand out the current reminder collection.
pub trait ReminderSource: Send + Sync {
    fn fetch(&self) -> Result<Batch, StoreError>;
}

// Only `reminders` is read; tasks and anything else in the file are ignored.
#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    reminders: Vec<ReminderRecord>,
}

/// The backend's JSON data file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate every reminder. A missing file is an empty collection.
    pub fn load(&self) -> Result<Batch, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "data file not found, starting empty");
                return Ok(Batch::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let data: DataFile = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let batch = validate_batch(data.reminders);
        tracing::debug!(
            path = %self.path.display(),
            loaded = batch.reminders.len(),
            rejected = batch.rejected.len(),
            "reminders loaded"
        );
        Ok(batch)
    }
}

impl ReminderSource for Store {
    fn fetch(&self) -> Result<Batch, StoreError> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::reminders::Recurrence;

    fn write_data(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("data.json"));
        let batch = store.load().unwrap();
        assert!(batch.reminders.is_empty());
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn loads_backend_document() {
        let file = write_data(
            r#"{
                "reminders": [
                    {
                        "id": "r1",
                        "title": "Pay rent",
                        "description": "",
                        "date": "2024-01-31",
                        "recurrence": "Monthly",
                        "created_at": "2024-01-01T10:00:00",
                        "comments": [{"text": "paid", "timestamp": "2024-01-31T08:00:00"}]
                    },
                    {"id": "r2", "title": "Broken", "date": "31-01-2024", "recurrence": "None"},
                    {"id": "r3", "title": "Standup", "date": "2024-01-02", "recurrence": "Daily"}
                ],
                "tasks": [{"id": "t1", "title": "ignored"}]
            }"#,
        );
        let batch = Store::new(file.path()).load().unwrap();

        assert_eq!(batch.reminders.len(), 2);
        assert_eq!(batch.reminders[0].recurrence, Recurrence::Monthly);
        assert_eq!(batch.reminders[0].comments.len(), 1);
        assert_eq!(batch.reminders[1].id, "r3");
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].id(), "r2");
    }

    #[test]
    fn document_without_reminders_key_is_empty() {
        let file = write_data(r#"{"tasks": []}"#);
        let batch = Store::new(file.path()).load().unwrap();
        assert!(batch.reminders.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let file = write_data("{ not json");
        let err = Store::new(file.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "{err}");
        assert!(err.to_string().contains("malformed data file"));
    }
}
