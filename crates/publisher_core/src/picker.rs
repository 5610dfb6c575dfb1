use std::cmp::Ordering;

use thiserror::Error;

use crate::{CalendarError, CalendarLabel, UploadDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingDirection {
    Previous,
    Next,
}

/// What the live date picker should do after reading a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Page(PagingDirection),
    /// Caption matches; click the cell showing this day number.
    SelectDay(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvergenceError {
    #[error("calendar did not reach {target} within {steps} paging steps (last caption {last_caption:?})")]
    StepLimit {
        target: String,
        last_caption: String,
        steps: u32,
    },
    #[error("calendar paged past {target} without showing it (caption {caption:?})")]
    Overshoot { target: String, caption: String },
    #[error("calendar shows {caption:?} which names {target} but does not match it exactly")]
    CaptionMismatch { target: String, caption: String },
    #[error("unreadable calendar caption: {0}")]
    Caption(#[from] CalendarError),
    #[error("invalid day of month {0:?}")]
    InvalidDay(String),
}

/// Pure paging logic of the publish-date calendar.
///
/// Feed it every caption the widget shows; it answers with the next click.
/// The paging direction is fixed by the first caption, and the number of
/// paging clicks is bounded by `max_steps`.
#[derive(Debug, Clone)]
pub struct DatePickerNavigator {
    target: CalendarLabel,
    target_caption: String,
    day: u32,
    direction: Option<PagingDirection>,
    steps: u32,
    max_steps: u32,
}

impl DatePickerNavigator {
    pub fn new(date: &UploadDate, max_steps: u32) -> Result<Self, ConvergenceError> {
        let target_caption = date.caption();
        let target: CalendarLabel = target_caption.parse()?;
        let day = parse_day(&date.day)?;
        Ok(Self {
            target,
            target_caption,
            day,
            direction: None,
            steps: 0,
            max_steps,
        })
    }

    pub fn target_caption(&self) -> &str {
        &self.target_caption
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Paging clicks requested so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn observe(&mut self, caption: &str) -> Result<PickerAction, ConvergenceError> {
        let caption = caption.trim();
        if caption == self.target_caption {
            return Ok(PickerAction::SelectDay(self.day));
        }

        let current: CalendarLabel = caption.parse()?;
        let wanted = match self.target.cmp(&current) {
            Ordering::Less => PagingDirection::Previous,
            Ordering::Greater => PagingDirection::Next,
            Ordering::Equal => {
                return Err(ConvergenceError::CaptionMismatch {
                    target: self.target_caption.clone(),
                    caption: caption.to_string(),
                })
            }
        };

        let direction = *self.direction.get_or_insert(wanted);
        if direction != wanted {
            return Err(ConvergenceError::Overshoot {
                target: self.target_caption.clone(),
                caption: caption.to_string(),
            });
        }

        if self.steps >= self.max_steps {
            return Err(ConvergenceError::StepLimit {
                target: self.target_caption.clone(),
                last_caption: caption.to_string(),
                steps: self.steps,
            });
        }

        self.steps += 1;
        Ok(PickerAction::Page(direction))
    }
}

fn parse_day(raw: &str) -> Result<u32, ConvergenceError> {
    let trimmed = raw.trim().trim_start_matches('0');
    match trimmed.parse::<u32>() {
        Ok(day) if (1..=31).contains(&day) => Ok(day),
        _ => Err(ConvergenceError::InvalidDay(raw.to_string())),
    }
}
