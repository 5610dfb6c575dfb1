use chrono::{Datelike, NaiveDate};

use crate::CalendarError;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Date parts as the publish wizard expects them: day as printed, full month
/// name and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDate {
    pub day: String,
    pub month_as_full_word: String,
    pub year: String,
}

impl UploadDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: format!("{:02}", date.day()),
            month_as_full_word: month_of(date).name().to_string(),
            year: date.year().to_string(),
        }
    }

    /// Parses the compact `YYYYMMDD` form reported by yt-dlp.
    pub fn parse_compact(raw: &str) -> Result<Self, CalendarError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
            .map(Self::from_date)
            .map_err(|_| CalendarError::Malformed(raw.to_string()))
    }

    /// Parses an ISO `YYYY-MM-DD` date.
    pub fn parse_iso(raw: &str) -> Result<Self, CalendarError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| CalendarError::Malformed(raw.to_string()))
    }

    /// The "Month Year" caption a calendar shows for this date.
    pub fn caption(&self) -> String {
        format!("{} {}", self.month_as_full_word, self.year)
    }

    /// Human readable form used in log lines, e.g. "05 March, 2025".
    pub fn display(&self) -> String {
        format!("{} {}, {}", self.day, self.month_as_full_word, self.year)
    }
}

fn month_of(date: NaiveDate) -> chrono::Month {
    // `month()` is always in 1..=12.
    chrono::Month::try_from(date.month() as u8).unwrap_or(chrono::Month::January)
}

/// Everything the workflow needs to know about the source video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMetadata {
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub upload_date: UploadDate,
}

pub fn canonical_url_for(source_id: &str) -> String {
    format!("{WATCH_URL}{source_id}")
}

/// Whitespace-only text counts as empty.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// The description with the video link appended on its own line when asked for.
pub fn compose_description(episode: &EpisodeMetadata, url_in_description: bool) -> String {
    if url_in_description {
        format!("{}\n{}", episode.description, episode.canonical_url)
    } else {
        episode.description.clone()
    }
}

/// The text that ends up in the description editor. Never empty: a blank
/// description falls back to a line pointing at the video.
pub fn description_to_paste(episode: &EpisodeMetadata, url_in_description: bool) -> String {
    let composed = compose_description(episode, url_in_description);
    if is_blank(&composed) {
        format!("Video: {}", episode.canonical_url)
    } else {
        composed
    }
}
