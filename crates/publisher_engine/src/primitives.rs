use std::path::Path;
use std::time::Duration;

use publisher_logging::{publish_debug, publish_warn};
use serde_json::Value;
use tokio::time::{sleep, Instant};

use crate::{Page, ProgressSink, Selector, StepError, WaitCondition, WorkflowEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser-side helpers run through [`Page::run_script`]; `arguments[0]` is
/// always the target element.
pub mod scripts {
    pub const FOCUS: &str = "arguments[0].focus();";

    pub const SELECT_ALL: &str = r#"
        const range = document.createRange();
        range.selectNodeContents(arguments[0]);
        const selection = window.getSelection();
        selection.removeAllRanges();
        selection.addRange(range);
    "#;

    /// Rich-text editors drop or reorder long typed input; a synthetic paste
    /// event lands the whole text at once.
    pub const PASTE: &str = r#"
        const transfer = new DataTransfer();
        transfer.setData('text/plain', arguments[1]);
        arguments[0].dispatchEvent(new ClipboardEvent('paste', {
            clipboardData: transfer,
            bubbles: true,
            cancelable: true,
        }));
    "#;
}

/// Waiting, retrying wrappers around a [`Page`].
///
/// Every operation first waits for its element to reach a [`WaitCondition`]
/// and fails with [`StepError::ElementNotFound`] when it does not in time.
pub struct Ui<'a> {
    page: &'a dyn Page,
    sink: &'a dyn ProgressSink,
    element_timeout: Duration,
}

impl<'a> Ui<'a> {
    pub fn new(page: &'a dyn Page, sink: &'a dyn ProgressSink, element_timeout: Duration) -> Self {
        Self {
            page,
            sink,
            element_timeout,
        }
    }

    pub fn page(&self) -> &'a dyn Page {
        self.page
    }

    pub async fn wait_for(
        &self,
        selector: &Selector,
        condition: WaitCondition,
    ) -> Result<(), StepError> {
        self.wait_for_within(selector, condition, self.element_timeout)
            .await
    }

    pub async fn wait_for_within(
        &self,
        selector: &Selector,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<(), StepError> {
        let deadline = Instant::now() + timeout;
        loop {
            let probe = self.page.probe(selector).await?;
            if condition.is_met(probe) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(StepError::ElementNotFound {
                    selector: selector.to_string(),
                    condition,
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Like [`Ui::wait_for_within`], but a timeout is reported as an
    /// unfinished upload of `what`.
    pub async fn wait_for_upload(
        &self,
        selector: &Selector,
        condition: WaitCondition,
        timeout: Duration,
        what: &'static str,
    ) -> Result<(), StepError> {
        match self.wait_for_within(selector, condition, timeout).await {
            Err(StepError::ElementNotFound { .. }) => {
                Err(StepError::UploadTimeout { what, timeout })
            }
            other => other,
        }
    }

    pub async fn click_selector(
        &self,
        selector: &Selector,
        condition: WaitCondition,
    ) -> Result<(), StepError> {
        self.wait_for(selector, condition).await?;
        publish_debug!("Clicking {selector}");
        self.page.click(selector).await?;
        Ok(())
    }

    pub async fn read_text(
        &self,
        selector: &Selector,
        condition: WaitCondition,
    ) -> Result<String, StepError> {
        self.wait_for(selector, condition).await?;
        Ok(self.page.text_content(selector).await?)
    }

    /// Types `text` key by key. Only for short values such as titles.
    pub async fn type_into(&self, selector: &Selector, text: &str) -> Result<(), StepError> {
        self.wait_for(selector, WaitCondition::Present).await?;
        self.page.type_text(selector, text).await?;
        Ok(())
    }

    pub async fn upload(&self, selector: &Selector, path: &Path) -> Result<(), StepError> {
        self.wait_for(selector, WaitCondition::Present).await?;
        publish_debug!("Attaching {} to {selector}", path.display());
        self.page.upload_file(selector, path).await?;
        Ok(())
    }

    pub async fn select_all_content(&self, selector: &Selector) -> Result<(), StepError> {
        self.page
            .run_script(selector, scripts::SELECT_ALL, Vec::new())
            .await?;
        Ok(())
    }

    /// Replaces the whole content of an editable region with `text`.
    pub async fn paste_text(&self, selector: &Selector, text: &str) -> Result<(), StepError> {
        self.wait_for(selector, WaitCondition::Visible).await?;
        self.page.run_script(selector, scripts::FOCUS, Vec::new()).await?;
        // The editor only accepts the paste after it has seen a key stroke.
        self.page.type_text(selector, " ").await?;
        self.select_all_content(selector).await?;
        self.page
            .run_script(selector, scripts::PASTE, vec![Value::String(text.to_string())])
            .await?;
        Ok(())
    }

    /// Clicks the first candidate, in list order, that satisfies `condition`.
    ///
    /// All candidates are checked on every poll, so a later candidate does
    /// not have to wait for an earlier one to time out.
    pub async fn click_first_of(
        &self,
        action: &str,
        candidates: &[Selector],
        condition: WaitCondition,
    ) -> Result<(), StepError> {
        let deadline = Instant::now() + self.element_timeout;
        loop {
            for (position, selector) in candidates.iter().enumerate() {
                let probe = self.page.probe(selector).await?;
                if !condition.is_met(probe) {
                    continue;
                }
                if position > 0 {
                    publish_warn!("Using fallback #{position} for {action}: {selector}");
                    self.sink.emit(WorkflowEvent::FallbackUsed {
                        action: action.to_string(),
                        selector: selector.to_string(),
                        position,
                    });
                }
                self.page.click(selector).await?;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(StepError::NoCandidateMatched {
                    action: action.to_string(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn goto(&self, url: &str) -> Result<(), StepError> {
        publish_debug!("Navigating to {url}");
        self.page
            .goto(url)
            .await
            .map_err(|err| StepError::Navigation {
                target: url.to_string(),
                message: err.to_string(),
            })
    }

    pub async fn set_viewport(&self, (width, height): (u32, u32)) -> Result<(), StepError> {
        self.page.set_viewport(width, height).await?;
        Ok(())
    }

    /// Clicks `selector` and waits until the page has moved to another URL.
    ///
    /// The starting URL is read only once the element is ready, so a redirect
    /// that lands while waiting for it is not mistaken for the click's navigation.
    pub async fn click_and_wait_for_navigation(
        &self,
        selector: &Selector,
        condition: WaitCondition,
    ) -> Result<(), StepError> {
        self.wait_for(selector, condition).await?;
        let before = self.page.current_url().await?;
        publish_debug!("Clicking {selector}");
        self.page.click(selector).await?;

        let deadline = Instant::now() + self.element_timeout;
        loop {
            let now_at = self.page.current_url().await?;
            if now_at != before {
                publish_debug!("Navigated to {now_at}");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(StepError::Navigation {
                    target: format!("the page opened by {selector}"),
                    message: format!(
                        "still at {before} after {:?}",
                        self.element_timeout
                    ),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// A deliberate pause for UI re-renders that no condition can observe.
    pub async fn settle(&self, pause: Duration) {
        publish_debug!("Settling for {pause:?}");
        sleep(pause).await;
    }
}
