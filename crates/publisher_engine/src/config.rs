use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use publisher_core::PublishMode;
use publisher_logging::Redacted;
use thiserror::Error;

/// Which dashboard the episode is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishTarget {
    /// The creators episode wizard.
    #[default]
    Spotify,
    /// The legacy episode dashboard.
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown publish target {0:?} (expected \"spotify\" or \"anchor\")")]
pub struct UnknownTarget(pub String);

impl FromStr for PublishTarget {
    type Err = UnknownTarget;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "spotify" => Ok(PublishTarget::Spotify),
            "anchor" => Ok(PublishTarget::Anchor),
            _ => Err(UnknownTarget(raw.to_string())),
        }
    }
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishTarget::Spotify => write!(f, "spotify"),
            PublishTarget::Anchor => write!(f, "anchor"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: Redacted<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Redacted::new(password.into()),
        }
    }
}

/// Everything one publishing run needs besides the episode itself.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub target: PublishTarget,
    pub credentials: Credentials,
    /// Podcast to select before uploading; empty keeps the preselected one.
    pub podcast_title: String,
    pub audio_file: PathBuf,
    pub thumbnail_file: PathBuf,
    pub save_as_draft: bool,
    pub set_publish_date: bool,
    pub is_explicit: bool,
    pub is_sponsored: bool,
    pub load_thumbnail: bool,
    pub url_in_description: bool,
    pub headless: bool,
    /// Bound on waiting for audio and artwork uploads to finish.
    pub upload_timeout: Duration,
    /// Bound on every other element or navigation wait.
    pub element_timeout: Duration,
    pub date_picker_max_steps: u32,
    /// Directory for diagnostic screenshots.
    pub logs_dir: PathBuf,
}

impl PublishConfig {
    pub fn mode(&self) -> PublishMode {
        PublishMode::resolve(self.save_as_draft, self.set_publish_date)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            target: PublishTarget::default(),
            credentials: Credentials::default(),
            podcast_title: String::new(),
            audio_file: PathBuf::from("episode.mp3"),
            thumbnail_file: PathBuf::from("thumbnail.jpg"),
            save_as_draft: false,
            set_publish_date: false,
            is_explicit: false,
            is_sponsored: false,
            load_thumbnail: false,
            url_in_description: false,
            headless: true,
            upload_timeout: Duration::from_secs(5 * 60),
            element_timeout: Duration::from_secs(30),
            date_picker_max_steps: 240,
            logs_dir: PathBuf::from("logs"),
        }
    }
}
