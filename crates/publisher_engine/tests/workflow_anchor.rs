mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{config, episode, init_logging, Action, FakeLauncher, FakePage, RecordingSink};
use pretty_assertions::assert_eq;
use publisher_core::{PublishMode, Stage};
use publisher_engine::selectors::anchor;
use publisher_engine::{
    PublishConfig, PublishError, PublishTarget, Publisher, StepError, WorkflowEvent,
};
use tempfile::TempDir;

async fn publish(
    page: &FakePage,
    config: PublishConfig,
) -> (Result<(), PublishError>, Arc<RecordingSink>) {
    init_logging();
    let sink = Arc::new(RecordingSink::default());
    let publisher = Publisher::new(Arc::new(FakeLauncher::new(page.clone())), sink.clone());
    let config = PublishConfig {
        target: PublishTarget::Anchor,
        ..config
    };
    let result = publisher.publish(&config, &episode("Show notes")).await;
    (result, sink)
}

#[tokio::test(start_paused = true)]
async fn publishes_through_legacy_dashboard() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();

    let (result, sink) = publish(&page, config(logs.path())).await;

    result.unwrap();
    assert_eq!(
        sink.stages(),
        vec![
            Stage::Start,
            Stage::BrowserLaunched,
            Stage::OnWizardPage,
            Stage::LoggedIn,
            Stage::FileUploaded,
            Stage::DetailsFilled,
            Stage::Finalized(PublishMode::PublishNow),
            Stage::DashboardConfirmed,
            Stage::Closed,
        ]
    );
    assert_eq!(
        page.gotos(),
        vec![
            anchor::NEW_EPISODE_URL.to_string(),
            anchor::EPISODES_URL.to_string()
        ]
    );
    assert_eq!(page.actions()[0], Action::Viewport(1600, 789));
    assert_eq!(page.click_count(&anchor::SAVE_EPISODE), 1);
    assert_eq!(page.click_count(&anchor::PUBLISH_NOW_LABEL), 1);
    assert_eq!(page.click_count(&anchor::PRIMARY_ACTION_BUTTON), 0);
}

#[tokio::test(start_paused = true)]
async fn falls_back_to_styled_button_without_label() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    page.missing(anchor::SAVE_AS_DRAFT_LABEL);
    let config = PublishConfig {
        save_as_draft: true,
        ..config(logs.path())
    };

    let (result, sink) = publish(&page, config).await;

    result.unwrap();
    assert_eq!(page.click_count(&anchor::PRIMARY_ACTION_BUTTON), 1);
    assert!(sink.events().contains(&WorkflowEvent::FallbackUsed {
        action: "Save as draft".to_string(),
        selector: anchor::PRIMARY_ACTION_BUTTON.to_string(),
        position: 1,
    }));
    assert!(sink.stages().contains(&Stage::Finalized(PublishMode::Draft)));
}

#[tokio::test(start_paused = true)]
async fn schedule_request_publishes_now() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    let config = PublishConfig {
        set_publish_date: true,
        ..config(logs.path())
    };

    let (result, sink) = publish(&page, config).await;

    result.unwrap();
    assert_eq!(page.click_count(&anchor::PUBLISH_NOW_LABEL), 1);
    assert!(sink
        .stages()
        .contains(&Stage::Finalized(PublishMode::PublishNow)));
}

#[tokio::test(start_paused = true)]
async fn waits_for_save_button_after_processing() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    page.reveal_after(anchor::SAVE_EPISODE, Duration::from_secs(40));

    let (result, _) = publish(&page, config(logs.path())).await;

    result.unwrap();
    assert_eq!(page.click_count(&anchor::SAVE_EPISODE), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_save_button_is_an_upload_timeout() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    page.missing(anchor::SAVE_EPISODE);
    let config = PublishConfig {
        upload_timeout: Duration::from_secs(30),
        ..config(logs.path())
    };

    let (result, _) = publish(&page, config).await;

    let err = result.unwrap_err();
    assert_eq!(err.last_stage, Stage::LoggedIn);
    assert!(matches!(err.cause, StepError::UploadTimeout { .. }));
    assert!(err.screenshot.is_some());
    assert!(err.to_string().starts_with("unable to post episode to anchor"));
}

#[tokio::test(start_paused = true)]
async fn no_finalize_candidate_fails() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    page.missing(anchor::PUBLISH_NOW_LABEL)
        .missing(anchor::PRIMARY_ACTION_BUTTON);

    let (result, _) = publish(&page, config(logs.path())).await;

    let err = result.unwrap_err();
    assert_eq!(err.last_stage, Stage::DetailsFilled);
    assert!(matches!(
        err.cause,
        StepError::NoCandidateMatched { ref action } if action == "Publish now"
    ));
}

#[tokio::test(start_paused = true)]
async fn dashboard_is_opened_only_after_finalize_settles() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();

    let (result, _) = publish(&page, config(logs.path())).await;

    result.unwrap();
    let clicked = page
        .time_of(&Action::Click(anchor::PUBLISH_NOW_LABEL))
        .unwrap();
    let left = page
        .time_of(&Action::Goto(anchor::EPISODES_URL.to_string()))
        .unwrap();
    assert!(left - clicked >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn failure_message_leaves_cause_to_the_source_chain() {
    let logs = TempDir::new().unwrap();
    let page = FakePage::new();
    page.missing(anchor::PUBLISH_NOW_LABEL)
        .missing(anchor::PRIMARY_ACTION_BUTTON);

    let (result, _) = publish(&page, config(logs.path())).await;

    let err = result.unwrap_err();
    let cause = err.cause.to_string();
    assert_eq!(
        err.to_string(),
        "unable to post episode to anchor after stage 'details filled'"
    );
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), cause);
}
