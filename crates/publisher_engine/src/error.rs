use std::path::PathBuf;
use std::time::Duration;

use publisher_core::{ConvergenceError, Stage};
use thiserror::Error;

use crate::{PublishTarget, WaitCondition};

/// A browser or driver command that could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    #[error("could not start browser session: {0}")]
    Session(String),
    #[error("browser command failed: {0}")]
    Command(String),
    #[error("{selector} does not support {operation}")]
    Unsupported {
        selector: String,
        operation: &'static str,
    },
    #[error("webdriver process error: {0}")]
    Driver(String),
}

/// Why a single workflow step failed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("element {selector} was not {condition} within {timeout:?}")]
    ElementNotFound {
        selector: String,
        condition: WaitCondition,
        timeout: Duration,
    },
    #[error("{what} upload did not finish within {timeout:?}")]
    UploadTimeout {
        what: &'static str,
        timeout: Duration,
    },
    #[error("navigation to {target} did not happen: {message}")]
    Navigation { target: String, message: String },
    #[error(transparent)]
    DatePicker(#[from] ConvergenceError),
    #[error("no candidate element matched for {action}")]
    NoCandidateMatched { action: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// A failed publishing run, carrying the step error that ended it.
#[derive(Debug, Error)]
#[error("unable to post episode to {target} after stage '{last_stage}'")]
pub struct PublishError {
    pub target: PublishTarget,
    /// The last stage that completed before the failure.
    pub last_stage: Stage,
    #[source]
    pub cause: StepError,
    /// Where the diagnostic screenshot was written, if capture succeeded.
    pub screenshot: Option<PathBuf>,
}
