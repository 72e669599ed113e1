//! Saving exported sessions
//!
//! The view computes a file name and fetches the bytes; where they end up is
//! up to the host through [`FileSink`].

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::client::ExportFormat;
use crate::error::Result;
use crate::models::SessionRecord;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";
const UNDATED: &str = "undated";

/// Capability to persist a downloaded file
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes exports into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(file_name), bytes).await?;
        Ok(())
    }
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { file_name: String, bytes: usize },
    /// Precondition not met; nothing was requested or written
    Skipped(ExportSkip),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSkip {
    NoSession,
    /// Imported sessions may lack a backend id
    MissingSessionId,
}

/// `session_report_<date>.pdf` or `session_<date>.json`
pub fn export_file_name(session: &SessionRecord, format: ExportFormat, date_format: &str) -> String {
    let date = session
        .start_date()
        .map(|day| {
            let mut text = String::new();
            if write!(text, "{}", day.format(date_format)).is_err() {
                text.clear();
                let _ = write!(text, "{}", day.format(FALLBACK_DATE_FORMAT));
            }
            sanitize(&text)
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNDATED.to_string());

    format!("{}_{}.{}", format.file_prefix(), date, format.as_str())
}

/// Replace characters that would turn a date into a path
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c => c,
        })
        .collect()
}
