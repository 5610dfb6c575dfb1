use std::time::Duration;

use publisher_core::{DatePickerNavigator, PagingDirection, PickerAction, UploadDate};
use publisher_logging::{publish_debug, publish_info};

use crate::selectors::calendar;
use crate::{StepError, Ui, WaitCondition};

const PAGING_SETTLE: Duration = Duration::from_millis(500);

/// Opens the review step's date picker and selects `date` in it.
///
/// Pages the calendar one month at a time until its caption reads exactly
/// "Month Year", then clicks the day. At most `max_steps` paging clicks are made.
pub async fn select_publish_date(
    ui: &Ui<'_>,
    date: &UploadDate,
    max_steps: u32,
) -> Result<(), StepError> {
    publish_info!("-- Setting publish date");
    let mut navigator = DatePickerNavigator::new(date, max_steps)?;
    ui.click_selector(&calendar::DATE_INPUT, WaitCondition::Visible)
        .await?;

    let mut caption = ui
        .read_text(&calendar::CAPTION, WaitCondition::Visible)
        .await?;
    loop {
        match navigator.observe(&caption)? {
            PickerAction::Page(direction) => {
                let button = match direction {
                    PagingDirection::Previous => calendar::PREVIOUS_MONTH,
                    PagingDirection::Next => calendar::NEXT_MONTH,
                };
                publish_debug!(
                    "-- Calendar shows {:?}, paging {direction:?} towards {}",
                    caption.trim(),
                    navigator.target_caption()
                );
                ui.click_selector(&button, WaitCondition::Visible).await?;
                ui.settle(PAGING_SETTLE).await;
                caption = ui
                    .read_text(&calendar::CAPTION, WaitCondition::Visible)
                    .await?;
            }
            PickerAction::SelectDay(day) => {
                publish_info!(
                    "-- Selecting day {day} of {} after {} paging clicks",
                    navigator.target_caption(),
                    navigator.steps()
                );
                ui.click_selector(&calendar::day_cell(day), WaitCondition::Visible)
                    .await?;
                return Ok(());
            }
        }
    }
}
