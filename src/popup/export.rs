use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::fs::DirBuilder;

use crate::page_scrapers::JobRecord;

pub(crate) const JSON_MIME: &str = "application/json";


/// A job record as it is written to disk, with the moment it was saved.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedRecord<'a> {
    #[serde(flatten)]
    job: &'a JobRecord,
    saved_at: String,
}


/// A file ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Download {
    pub(crate) filename: String,
    pub(crate) mime: &'static str,
    pub(crate) contents: String,
}


impl Download {
    pub(crate) fn new(file_prefix: &str, job: &JobRecord, saved_at: DateTime<Utc>) -> anyhow::Result<Self> {
        let record = ExportedRecord {
            job,
            saved_at: saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let contents = serde_json::to_string_pretty(&record).context("Failed to serialize job record")?;
        let id = job.job_id().map(file_safe).unwrap_or_else(|| "unknown".into());

        Ok(Self {
            filename: format!("{file_prefix}-{id}.json"),
            mime: JSON_MIME,
            contents,
        })
    }

    /// Writes the file into `dir`, creating it if needed, and returns the written path.
    pub(crate) async fn save(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        DirBuilder::new()
            .recursive(true)
            .create(dir)
            .await
            .with_context(|| format!("Failed to create {}. Do we have permissions?", dir.display()))?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}


/// Ids come straight from the page URL, so keep anything path-like out of the filename.
fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
