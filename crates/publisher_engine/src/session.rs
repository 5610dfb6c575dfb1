use async_trait::async_trait;
use publisher_logging::{publish_info, publish_warn};

use crate::{BrowserError, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub headless: bool,
}

/// A browser owned by exactly one workflow run.
pub struct BrowserSession {
    page: Box<dyn Page>,
}

impl BrowserSession {
    pub fn new(page: Box<dyn Page>) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    /// Releases the browser. Failures are logged, never returned, so that
    /// closing cannot mask the outcome of the run.
    pub async fn close(self) {
        match self.page.close().await {
            Ok(()) => publish_info!("Browser closed"),
            Err(err) => publish_warn!("Failed to close browser cleanly: {err}"),
        }
    }
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<BrowserSession, BrowserError>;
}
