use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, SourceError};

use super::RequestSource;

/// Yields one body per line of a file, in order.
#[derive(Debug)]
pub struct LineReader {
    lines: Option<Lines<BufReader<File>>>,
}

impl LineReader {
    /// Opens the input file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub async fn open(path: &Path) -> AppResult<Self> {
        let file = File::open(path).await.map_err(|err| {
            AppError::source(SourceError::Open {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        debug!("Reading request bodies from {}", path.display());
        Ok(Self {
            lines: Some(BufReader::new(file).lines()),
        })
    }
}

#[async_trait]
impl RequestSource for LineReader {
    async fn next_body(&mut self) -> Option<String> {
        let lines = self.lines.as_mut()?;
        match lines.next_line().await {
            Ok(Some(mut line)) => {
                if line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
            Ok(None) => {
                self.lines = None;
                None
            }
            Err(err) => {
                warn!("Stopped reading input after a read error: {}", err);
                self.lines = None;
                None
            }
        }
    }
}
