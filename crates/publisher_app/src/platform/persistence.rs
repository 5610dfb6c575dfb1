use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use publisher_core::{EpisodeMetadata, UploadDate};
use publisher_engine::AtomicFileWriter;
use publisher_logging::publish_info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The episode JSON file. Fields this program does not know about are kept
/// as they are when the file is written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeFile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `YYYY-MM-DD`; schedules the episode for this day instead of the video's
    /// upload date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EpisodeFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read episode file {}", path.display()))?;
        let file: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse episode file {}", path.display()))?;
        if file.id.trim().is_empty() {
            return Err(anyhow!("episode file {} has an empty id", path.display()));
        }
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let (dir, filename) = split_path(path)?;
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize episode file")?;
        let written = AtomicFileWriter::new(dir)
            .write(&filename, &content)
            .with_context(|| format!("failed to write episode file {}", path.display()))?;
        publish_info!("-- Episode config file: {content}");
        Ok(written)
    }

    /// Stores the resolved title and description.
    pub fn record_metadata(&mut self, metadata: &EpisodeMetadata) {
        self.title = Some(metadata.title.clone());
        self.description = Some(metadata.description.clone());
    }

    pub fn publish_date_override(&self) -> anyhow::Result<Option<UploadDate>> {
        self.publish_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                UploadDate::parse_iso(raw).with_context(|| format!("invalid publish_date {raw:?}"))
            })
            .transpose()
    }
}

fn split_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("episode file path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, filename))
}
