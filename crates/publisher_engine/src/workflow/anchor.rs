//! The legacy episode dashboard. It has no scheduling and no consent step.

use std::time::Duration;

use publisher_core::{description_to_paste, PublishMode, Stage};
use publisher_logging::{publish_info, publish_warn};

use super::{StepResult, WorkflowRun};
use crate::selectors::anchor;
use crate::WaitCondition;

/// The upload is processed for a while before "Save episode" is even rendered.
const PROCESSING_SETTLE: Duration = Duration::from_secs(25);
const TITLE_SETTLE: Duration = Duration::from_secs(2);
/// Leaving the page too early can cancel the publish request.
const FINALIZE_SETTLE: Duration = Duration::from_secs(3);

pub(super) async fn drive(run: &mut WorkflowRun<'_>) -> StepResult {
    run.ui.set_viewport(anchor::VIEWPORT).await?;
    run.ui.goto(anchor::NEW_EPISODE_URL).await?;
    run.reach(Stage::OnWizardPage);

    publish_info!("Trying to log in");
    let credentials = &run.config.credentials;
    run.ui.type_into(&anchor::EMAIL, &credentials.email).await?;
    run.ui
        .type_into(&anchor::PASSWORD, credentials.password.expose())
        .await?;
    run.ui
        .click_and_wait_for_navigation(&anchor::SUBMIT, WaitCondition::Visible)
        .await?;
    publish_info!("Logged in");
    run.reach(Stage::LoggedIn);

    publish_info!("Uploading audio file");
    run.ui
        .upload(&anchor::FILE_INPUT, &run.config.audio_file)
        .await?;
    publish_info!("Waiting for upload to finish");
    run.ui.settle(PROCESSING_SETTLE).await;
    run.ui
        .wait_for_upload(
            &anchor::SAVE_EPISODE,
            WaitCondition::Present,
            run.config.upload_timeout,
            "audio file",
        )
        .await?;
    run.ui
        .click_selector(&anchor::SAVE_EPISODE, WaitCondition::Present)
        .await?;
    run.reach(Stage::FileUploaded);

    fill_details(run).await?;
    run.reach(Stage::DetailsFilled);

    let mode = finalize(run).await?;
    run.reach(Stage::Finalized(mode));

    publish_info!("-- Going to dashboard");
    run.ui.goto(anchor::EPISODES_URL).await?;
    run.reach(Stage::DashboardConfirmed);
    Ok(())
}

async fn fill_details(run: &WorkflowRun<'_>) -> StepResult {
    publish_info!("-- Adding title");
    run.ui
        .wait_for(&anchor::TITLE_INPUT, WaitCondition::Visible)
        .await?;
    run.ui.settle(TITLE_SETTLE).await;
    run.ui
        .type_into(&anchor::TITLE_INPUT, &run.episode.title)
        .await?;

    publish_info!("-- Adding description");
    let description = description_to_paste(run.episode, run.config.url_in_description);
    run.ui
        .paste_text(&anchor::DESCRIPTION_BOX, &description)
        .await
}

async fn finalize(run: &WorkflowRun<'_>) -> StepResult<PublishMode> {
    let (mode, label, action) = match run.config.mode() {
        PublishMode::Draft => (
            PublishMode::Draft,
            anchor::SAVE_AS_DRAFT_LABEL,
            "Save as draft",
        ),
        PublishMode::Schedule => {
            publish_warn!(
                "-- Scheduling is not available on {}, publishing immediately",
                run.config.target
            );
            (
                PublishMode::PublishNow,
                anchor::PUBLISH_NOW_LABEL,
                "Publish now",
            )
        }
        PublishMode::PublishNow => (
            PublishMode::PublishNow,
            anchor::PUBLISH_NOW_LABEL,
            "Publish now",
        ),
    };

    publish_info!("-- {action}");
    run.ui
        .click_first_of(
            action,
            &[label, anchor::PRIMARY_ACTION_BUTTON],
            WaitCondition::Visible,
        )
        .await?;
    run.ui.settle(FINALIZE_SETTLE).await;
    Ok(mode)
}
