use crate::model::OrderEvent;
use crate::sink::{EventSink, SinkError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Appends events to a text file, one line each.
///
/// The file is opened in append mode, so earlier runs are kept.
#[derive(Debug)]
pub struct FileEventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileEventLog {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), "Event log opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for FileEventLog {
    async fn record(&self, event: &OrderEvent) -> Result<(), SinkError> {
        let line = format!("{event}\n");
        // One buffer per event, written under the lock, keeps lines whole.
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
