use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::task::TaskList;

/// Error type for TaskStore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The tasks file exists but could not be read.
    #[error("Failed to read tasks from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The tasks file is not a well-formed task list.
    #[error("Tasks file {} is malformed", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize tasks")]
    Serialize(#[source] serde_json::Error),
    /// The tasks file could not be written. Its previous contents may be lost.
    #[error("Failed to write tasks to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whole-collection persistence for the task list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Reads every persisted task. A store that has never been written yields an empty list.
    async fn load(&self) -> Result<TaskList, StoreError>;

    /// Replaces everything persisted with `tasks`.
    async fn save(&self, tasks: &TaskList) -> Result<(), StoreError>;
}

/// Keeps the task list in a single JSON file.
///
/// Writes truncate the file in place: a crash mid-write can leave it truncated,
/// and a concurrent `load` can observe a partial document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders the list as JSON indented by four spaces, without a trailing newline.
fn to_pretty_json(tasks: &TaskList) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    tasks.serialize(&mut serializer)?;
    Ok(buffer)
}

#[async_trait]
impl TaskStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<TaskList, StoreError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Tasks file does not exist yet, starting empty");
                return Ok(TaskList::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&contents).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    #[tracing::instrument(skip(self, tasks), fields(path = %self.path.display(), len = tasks.len()))]
    async fn save(&self, tasks: &TaskList) -> Result<(), StoreError> {
        let contents = to_pretty_json(tasks).map_err(StoreError::Serialize)?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
