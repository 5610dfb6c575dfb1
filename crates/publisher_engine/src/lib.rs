//! Publisher engine: browser driving, publish workflows and the yt-dlp collaborators.
mod acquire;
mod config;
mod diagnostics;
mod error;
mod events;
mod page;
mod persist;
mod picker;
mod primitives;
mod process;
mod selector;
pub mod selectors;
mod session;
mod webdriver;
mod workflow;

pub use acquire::{
    parse_video_json, AcquireError, AudioAcquirer, AudioRequest, MetadataResolver, YtDlp,
    YtDlpSettings,
};
pub use config::{Credentials, PublishConfig, PublishTarget, UnknownTarget};
pub use diagnostics::SCREENSHOT_FILENAME;
pub use error::{BrowserError, PublishError, StepError};
pub use events::{LogProgressSink, ProgressSink, WorkflowEvent};
pub use page::{ElementProbe, Page, WaitCondition};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use picker::select_publish_date;
pub use primitives::{scripts, Ui};
pub use selector::Selector;
pub use session::{BrowserLauncher, BrowserSession, LaunchOptions};
pub use webdriver::{WebDriverLauncher, WebDriverSettings};
pub use workflow::Publisher;
