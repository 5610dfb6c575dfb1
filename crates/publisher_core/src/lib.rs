//! Publisher core: pure calendar, description and workflow-state logic.
mod calendar;
mod episode;
mod mode;
mod picker;
mod stage;

pub use calendar::{compare_dates, CalendarError, CalendarLabel};
pub use episode::{
    canonical_url_for, compose_description, description_to_paste, is_blank, EpisodeMetadata,
    UploadDate,
};
pub use mode::PublishMode;
pub use picker::{ConvergenceError, DatePickerNavigator, PagingDirection, PickerAction};
pub use stage::Stage;
