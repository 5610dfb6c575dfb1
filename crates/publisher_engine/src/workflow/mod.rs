mod anchor;
mod spotify;

use std::sync::Arc;

use publisher_core::{EpisodeMetadata, Stage};
use publisher_logging::{publish_error, publish_info};

use crate::diagnostics::capture_screenshot;
use crate::{
    BrowserLauncher, LaunchOptions, ProgressSink, PublishConfig, PublishError, PublishTarget,
    StepError, Ui, WorkflowEvent,
};

/// Publishes one episode per call by driving a freshly launched browser.
pub struct Publisher {
    launcher: Arc<dyn BrowserLauncher>,
    sink: Arc<dyn ProgressSink>,
}

impl Publisher {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, sink: Arc<dyn ProgressSink>) -> Self {
        Self { launcher, sink }
    }

    /// Runs the whole workflow for `config.target`.
    ///
    /// The browser is closed on every path. On failure a screenshot is
    /// attempted before closing and the step error is returned wrapped in a
    /// [`PublishError`] naming the last completed stage.
    pub async fn publish(
        &self,
        config: &PublishConfig,
        episode: &EpisodeMetadata,
    ) -> Result<(), PublishError> {
        self.sink.emit(WorkflowEvent::StageReached(Stage::Start));
        publish_info!("Launching browser (headless: {})", config.headless);
        let session = self
            .launcher
            .launch(&LaunchOptions {
                headless: config.headless,
            })
            .await
            .map_err(|err| PublishError {
                target: config.target,
                last_stage: Stage::Start,
                cause: err.into(),
                screenshot: None,
            })?;

        let mut run = WorkflowRun::new(
            Ui::new(session.page(), self.sink.as_ref(), config.element_timeout),
            config,
            episode,
            self.sink.as_ref(),
        );
        run.reach(Stage::BrowserLaunched);

        let outcome = match config.target {
            PublishTarget::Spotify => spotify::drive(&mut run).await,
            PublishTarget::Anchor => anchor::drive(&mut run).await,
        };

        let result = match outcome {
            Ok(()) => {
                publish_info!("Episode {:?} posted to {}", episode.title, config.target);
                Ok(())
            }
            Err(cause) => {
                let last_stage = run.stage();
                publish_error!(
                    "Unable to post episode to {} after stage '{last_stage}': {cause}",
                    config.target
                );
                let screenshot = if last_stage.has_open_page() {
                    capture_screenshot(session.page(), &config.logs_dir).await
                } else {
                    None
                };
                Err(PublishError {
                    target: config.target,
                    last_stage,
                    cause,
                    screenshot,
                })
            }
        };

        session.close().await;
        self.sink.emit(WorkflowEvent::StageReached(Stage::Closed));
        result
    }
}

/// State shared by the steps of one run.
pub(crate) struct WorkflowRun<'a> {
    ui: Ui<'a>,
    config: &'a PublishConfig,
    episode: &'a EpisodeMetadata,
    sink: &'a dyn ProgressSink,
    stage: Stage,
}

impl<'a> WorkflowRun<'a> {
    fn new(
        ui: Ui<'a>,
        config: &'a PublishConfig,
        episode: &'a EpisodeMetadata,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            ui,
            config,
            episode,
            sink,
            stage: Stage::Start,
        }
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn reach(&mut self, stage: Stage) {
        self.stage = stage;
        self.sink.emit(WorkflowEvent::StageReached(stage));
    }
}

type StepResult<T = ()> = Result<T, StepError>;
