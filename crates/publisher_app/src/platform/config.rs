//! Environment configuration, parsed once at startup.

use std::path::PathBuf;
use std::time::Duration;

use publisher_engine::{
    Credentials, PublishConfig, PublishTarget, UnknownTarget, WebDriverSettings, YtDlpSettings,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} must be true/false/1/0/yes/no, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("PUBLISH_TARGET: {0}")]
    Target(#[from] UnknownTarget),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub publish: PublishConfig,
    /// Location of the episode JSON file.
    pub episode_file: PathBuf,
    pub audio_format: String,
    pub postprocessor_args: Option<String>,
    pub ytdlp: YtDlpSettings,
    pub webdriver: WebDriverSettings,
    pub logs_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let target = match vars.get("PUBLISH_TARGET") {
            Some(raw) => raw.parse()?,
            None => PublishTarget::default(),
        };
        let email = vars
            .first_of(&["SPOTIFY_EMAIL", "ANCHOR_EMAIL"])
            .ok_or(ConfigError::Missing("SPOTIFY_EMAIL"))?;
        let password = vars
            .first_of(&["SPOTIFY_PASSWORD", "ANCHOR_PASSWORD"])
            .ok_or(ConfigError::Missing("SPOTIFY_PASSWORD"))?;

        let audio_format = vars.or("AUDIO_FILE_FORMAT", "mp3");
        // yt-dlp names the extracted file after the requested format.
        let audio_file = PathBuf::from(vars.or("AUDIO_FILE", "episode.mp3"))
            .with_extension(&audio_format);
        // Thumbnails are always converted to jpg.
        let thumbnail_file =
            PathBuf::from(vars.or("THUMBNAIL_FILE", "thumbnail.jpg")).with_extension("jpg");
        let logs_dir = PathBuf::from(vars.or("LOGS_LOCATION", "./logs"));

        let headless = match vars.get("HEADLESS") {
            Some(_) => vars.flag("HEADLESS", true)?,
            None => vars.flag("PUPPETEER_HEADLESS", true)?,
        };

        let publish = PublishConfig {
            target,
            credentials: Credentials::new(email, password),
            podcast_title: vars.or("PODCAST_TITLE", ""),
            audio_file,
            thumbnail_file,
            save_as_draft: vars.flag("SAVE_AS_DRAFT", false)?,
            set_publish_date: vars.flag("SET_PUBLISH_DATE", false)?,
            is_explicit: vars.flag("IS_EXPLICIT", false)?,
            is_sponsored: vars.flag("IS_SPONSORED", false)?,
            load_thumbnail: vars.flag("LOAD_THUMBNAIL", false)?,
            url_in_description: vars.flag("URL_IN_DESCRIPTION", false)?,
            headless,
            upload_timeout: vars.millis("UPLOAD_TIMEOUT", Duration::from_secs(5 * 60))?,
            element_timeout: vars.millis("ELEMENT_TIMEOUT", Duration::from_secs(30))?,
            date_picker_max_steps: vars.number("DATE_PICKER_MAX_STEPS", 240)?,
            logs_dir: logs_dir.clone(),
        };

        let episode_file = PathBuf::from(vars.or("EPISODE_PATH", "./"))
            .join(vars.or("EPISODE_CONFIG", "episode.json"));

        let ytdlp = YtDlpSettings {
            program: vars.or("YT_DLP_PATH", "yt-dlp"),
            ..YtDlpSettings::default()
        };
        let webdriver = WebDriverSettings {
            webdriver_url: vars.or("WEBDRIVER_URL", "http://localhost:4444"),
            chromedriver_path: vars.get("CHROMEDRIVER_PATH").map(PathBuf::from),
            ..WebDriverSettings::default()
        };

        Ok(Self {
            publish,
            episode_file,
            audio_format,
            postprocessor_args: vars.get("POSTPROCESSOR_ARGS"),
            ytdlp,
            webdriver,
            logs_dir,
        })
    }
}

/// Variable access where unset and blank mean the same thing.
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidBool { key, value: raw }),
        }
    }

    fn number<N>(&self, key: &'static str, default: N) -> Result<N, ConfigError>
    where
        N: std::str::FromStr,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
            None => Ok(default),
        }
    }

    fn millis(&self, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        self.number(key, default_ms).map(Duration::from_millis)
    }
}
