//! The yt-dlp collaborators: video metadata lookup and audio download.
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use publisher_core::{canonical_url_for, EpisodeMetadata, UploadDate};
use publisher_logging::{publish_info, publish_warn};
use serde_json::Value;
use thiserror::Error;

use crate::process::run_output_with_timeout;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("{program} timed out after {after:?}")]
    Timeout { program: String, after: Duration },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("unexpected video metadata: {0}")]
    Metadata(String),
}

#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, source_id: &str) -> Result<EpisodeMetadata, AcquireError>;
}

#[async_trait]
pub trait AudioAcquirer: Send + Sync {
    async fn acquire(&self, source_id: &str, request: &AudioRequest) -> Result<(), AcquireError>;
}

/// Where and how to store the downloaded audio track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRequest {
    /// Final audio path; its extension is replaced by `audio_format`.
    pub output_file: PathBuf,
    pub audio_format: String,
    /// Passed verbatim to `--postprocessor-args`, e.g. `ffmpeg:-ac 1`.
    pub postprocessor_args: Option<String>,
    /// Also fetch the video thumbnail as a JPEG at this path.
    pub thumbnail_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct YtDlpSettings {
    pub program: String,
    pub metadata_timeout: Duration,
    pub download_timeout: Duration,
}

impl Default for YtDlpSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            metadata_timeout: Duration::from_secs(60),
            download_timeout: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct YtDlp {
    settings: YtDlpSettings,
}

impl YtDlp {
    pub fn new(settings: YtDlpSettings) -> Self {
        Self { settings }
    }

    pub fn metadata_args(url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    pub fn audio_args(url: &str, request: &AudioRequest) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            output_template(&request.output_file),
            "-f".to_string(),
            "bestaudio".to_string(),
            "-x".to_string(),
            "--no-playlist".to_string(),
            "--restrict-filenames".to_string(),
            "--force-overwrites".to_string(),
            "--audio-format".to_string(),
            request.audio_format.clone(),
        ];

        if let Some(pp_args) = request
            .postprocessor_args
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            args.push("--postprocessor-args".to_string());
            args.push(pp_args.to_string());
        }

        if let Some(thumbnail) = &request.thumbnail_file {
            args.push("--write-thumbnail".to_string());
            args.push("--convert-thumbnails".to_string());
            args.push("jpg".to_string());
            args.push("-o".to_string());
            args.push(format!("thumbnail:{}", output_template(thumbnail)));
        }

        args.push(url.to_string());
        args
    }

    fn check_status(&self, output: &std::process::Output) -> Result<(), AcquireError> {
        if output.status.success() {
            return Ok(());
        }
        Err(AcquireError::Failed {
            program: self.settings.program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[async_trait]
impl MetadataResolver for YtDlp {
    async fn resolve(&self, source_id: &str) -> Result<EpisodeMetadata, AcquireError> {
        let url = canonical_url_for(source_id);
        publish_info!("Resolving video metadata for {url}");
        let output = run_output_with_timeout(
            &self.settings.program,
            &Self::metadata_args(&url),
            self.settings.metadata_timeout,
        )
        .await?;
        self.check_status(&output)?;
        parse_video_json(&output.stdout)
    }
}

#[async_trait]
impl AudioAcquirer for YtDlp {
    async fn acquire(&self, source_id: &str, request: &AudioRequest) -> Result<(), AcquireError> {
        let url = canonical_url_for(source_id);
        let args = Self::audio_args(&url, request);
        publish_info!("Download command: {} {}", self.settings.program, args.join(" "));
        let output =
            run_output_with_timeout(&self.settings.program, &args, self.settings.download_timeout)
                .await?;
        self.check_status(&output)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            publish_warn!("{} stderr: {}", self.settings.program, stderr.trim());
        }
        publish_info!("Audio saved to {}", request.output_file.display());
        Ok(())
    }
}

/// `dir/name.%(ext)s` for `dir/name.anything`, so yt-dlp picks the extension.
fn output_template(path: &Path) -> String {
    path.with_extension("%(ext)s").to_string_lossy().into_owned()
}

/// Builds episode metadata from one `yt-dlp --dump-json` document.
pub fn parse_video_json(stdout: &[u8]) -> Result<EpisodeMetadata, AcquireError> {
    let json: Value = serde_json::from_slice(stdout)
        .map_err(|err| AcquireError::Metadata(format!("invalid JSON: {err}")))?;

    let source_id = required_str(&json, "id")?;
    let title = required_str(&json, "title")?;
    let description = json["description"].as_str().unwrap_or_default().to_string();
    let raw_date = json["upload_date"]
        .as_str()
        .or_else(|| json["release_date"].as_str())
        .ok_or_else(|| AcquireError::Metadata("missing upload_date".to_string()))?;
    let upload_date = UploadDate::parse_compact(raw_date)
        .map_err(|err| AcquireError::Metadata(err.to_string()))?;

    Ok(EpisodeMetadata {
        canonical_url: canonical_url_for(&source_id),
        source_id,
        title,
        description,
        upload_date,
    })
}

fn required_str(json: &Value, key: &str) -> Result<String, AcquireError> {
    json[key]
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| AcquireError::Metadata(format!("missing {key}")))
}
