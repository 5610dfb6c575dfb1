//! The creators episode wizard.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use futures_util::future::select_ok;
use publisher_core::{description_to_paste, PublishMode, Stage};
use publisher_logging::{publish_info, publish_warn};

use super::{StepResult, WorkflowRun};
use crate::selectors::spotify;
use crate::{select_publish_date, Ui, WaitCondition};

const WIZARD_SETTLE: Duration = Duration::from_secs(1);
const UPLOAD_SETTLE: Duration = Duration::from_secs(5);
const TITLE_SETTLE: Duration = Duration::from_secs(2);
const FINALIZE_SETTLE: Duration = Duration::from_secs(3);

pub(super) async fn drive(run: &mut WorkflowRun<'_>) -> StepResult {
    open_wizard(run).await?;
    run.reach(Stage::OnWizardPage);

    publish_info!("Setting language to English");
    run.ui
        .click_selector(&spotify::CHANGE_LANGUAGE, WaitCondition::Visible)
        .await?;
    run.ui
        .click_selector(&spotify::LANGUAGE_ENGLISH, WaitCondition::Visible)
        .await?;
    run.reach(Stage::LanguageSet);

    publish_info!("Set cookie banner acceptance");
    accept_cookie_banner(&run.ui).await;
    run.reach(Stage::CookieBannerHandled);

    publish_info!("Trying to log in and open episode wizard");
    login(run).await?;
    run.reach(Stage::LoggedIn);
    resolve_auth(&run.ui).await?;
    run.reach(Stage::AuthResolved);

    publish_info!("Making sure the correct podcast is selected for uploading");
    select_podcast(&run.ui, &run.config.podcast_title).await?;
    run.reach(Stage::PodcastSelected);

    publish_info!("Uploading audio file");
    upload_episode(run).await?;
    run.reach(Stage::FileUploaded);

    publish_info!("Filling required podcast details");
    fill_details(run).await?;
    run.reach(Stage::DetailsFilled);

    publish_info!("Going to Review and Publish step");
    run.ui
        .click_selector(&spotify::NEXT, WaitCondition::Visible)
        .await?;
    run.reach(Stage::ReviewStep);

    publish_info!("Filling details in Review and Publish step");
    fill_review_details(run).await?;
    run.reach(Stage::ReviewDetailsFilled);

    publish_info!("Save draft or publish");
    let mode = finalize(run).await?;
    run.reach(Stage::Finalized(mode));

    // Leaving the wizard right away keeps it from saving a second, untitled draft.
    publish_info!("-- Going to dashboard");
    run.ui.goto(spotify::EPISODES_URL).await?;
    run.reach(Stage::DashboardConfirmed);
    Ok(())
}

async fn open_wizard(run: &WorkflowRun<'_>) -> StepResult {
    run.ui.set_viewport(spotify::VIEWPORT).await?;
    run.ui.goto(spotify::WIZARD_URL).await
}

async fn accept_cookie_banner(ui: &Ui<'_>) {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Err(err) = ui
        .page()
        .set_cookie(spotify::COOKIE_BANNER_CLOSED, &now)
        .await
    {
        publish_warn!("-- Unable to set cookie: {err}");
    }
}

async fn login(run: &WorkflowRun<'_>) -> StepResult {
    publish_info!("-- Accessing new Spotify login page for podcasts");
    run.ui
        .click_and_wait_for_navigation(&spotify::CONTINUE_WITH_SPOTIFY, WaitCondition::Visible)
        .await?;

    publish_info!("-- Logging in");
    let credentials = &run.config.credentials;
    run.ui
        .wait_for(&spotify::LOGIN_USERNAME, WaitCondition::Present)
        .await?;
    run.ui
        .type_into(&spotify::LOGIN_USERNAME, &credentials.email)
        .await?;
    run.ui
        .type_into(&spotify::LOGIN_PASSWORD, credentials.password.expose())
        .await?;
    run.ui
        .click_and_wait_for_navigation(&spotify::LOGIN_BUTTON, WaitCondition::Visible)
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthRoute {
    ConsentAccepted,
    WizardOpened,
}

type AuthAttempt<'a> = Pin<Box<dyn Future<Output = StepResult<AuthRoute>> + Send + 'a>>;

/// After login the host either asks for consent or goes straight back to the
/// wizard. Both are waited for at once and the first to succeed wins.
async fn resolve_auth(ui: &Ui<'_>) -> StepResult {
    let consent: AuthAttempt<'_> = Box::pin(async move {
        publish_info!("-- Trying to accept spotify auth");
        ui.click_selector(&spotify::AUTH_ACCEPT, WaitCondition::Clickable)
            .await?;
        Ok(AuthRoute::ConsentAccepted)
    });
    let wizard: AuthAttempt<'_> = Box::pin(async move {
        wait_for_wizard(ui).await?;
        Ok(AuthRoute::WizardOpened)
    });

    let (route, _pending) = select_ok([consent, wizard]).await?;
    match route {
        AuthRoute::ConsentAccepted => {
            publish_info!("-- Spotify auth accepted. Waiting for episode wizard to open again.");
            wait_for_wizard(ui).await
        }
        AuthRoute::WizardOpened => {
            publish_info!("-- No need to accept spotify auth");
            Ok(())
        }
    }
}

async fn wait_for_wizard(ui: &Ui<'_>) -> StepResult {
    ui.settle(WIZARD_SETTLE).await;
    publish_info!("-- Waiting for episode wizard to open");
    ui.wait_for(&spotify::SELECT_A_FILE, WaitCondition::Visible)
        .await?;
    publish_info!("-- Episode wizard is opened");
    Ok(())
}

/// With a title given, the podcast is picked from the dashboard switcher and
/// the wizard is reopened for it.
async fn select_podcast(ui: &Ui<'_>, title: &str) -> StepResult {
    let title = title.trim();
    if title.is_empty() {
        publish_info!("-- No podcast title provided. Using default podcast.");
        return Ok(());
    }

    ui.goto(spotify::EPISODES_URL).await?;
    publish_info!("-- Searching for podcast {title}");
    ui.click_and_wait_for_navigation(&spotify::podcast_link(title), WaitCondition::Present)
        .await?;
    publish_info!("-- Selected podcast {title}");

    publish_info!("-- Going back to the new episode wizard");
    ui.goto(spotify::WIZARD_URL).await
}

async fn upload_episode(run: &WorkflowRun<'_>) -> StepResult {
    publish_info!("-- Uploading audio file (waiting {UPLOAD_SETTLE:?} before initiating process)");
    run.ui.settle(UPLOAD_SETTLE).await;
    run.ui
        .upload(&spotify::FILE_INPUT, &run.config.audio_file)
        .await?;

    publish_info!("-- Waiting for upload to finish");
    run.ui
        .wait_for_upload(
            &spotify::PREVIEW_READY,
            WaitCondition::Present,
            run.config.upload_timeout,
            "audio file",
        )
        .await?;
    publish_info!("-- Audio file is uploaded");
    Ok(())
}

async fn fill_details(run: &WorkflowRun<'_>) -> StepResult {
    let (ui, config, episode) = (&run.ui, run.config, run.episode);

    publish_info!("-- Adding title");
    ui.wait_for(&spotify::TITLE_INPUT, WaitCondition::Visible)
        .await?;
    // Field refreshes right after the upload would eat typed characters.
    ui.settle(TITLE_SETTLE).await;
    ui.type_into(&spotify::TITLE_INPUT, &episode.title).await?;

    publish_info!("-- Adding description");
    let description = description_to_paste(episode, config.url_in_description);
    ui.paste_text(&spotify::DESCRIPTION_BOX, &description)
        .await?;

    if config.load_thumbnail {
        publish_info!("-- Uploading episode art");
        ui.upload(&spotify::IMAGE_INPUT, &config.thumbnail_file)
            .await?;
        publish_info!("-- Saving uploaded episode art");
        ui.click_selector(&spotify::SAVE_IMAGE, WaitCondition::Visible)
            .await?;
        publish_info!("-- Waiting for uploaded episode art to be saved");
        ui.wait_for_upload(
            &spotify::IMAGE_UPLOADER,
            WaitCondition::Hidden,
            config.upload_timeout,
            "episode art",
        )
        .await?;
    }

    if config.is_explicit {
        publish_info!("-- Marking content as explicit");
        ui.click_selector(&spotify::EXPLICIT_CHECKBOX, WaitCondition::Visible)
            .await?;
    }
    if config.is_sponsored {
        publish_info!("-- Marking content as promotional");
        ui.click_selector(&spotify::SPONSORED_CHECKBOX, WaitCondition::Visible)
            .await?;
    }
    Ok(())
}

async fn fill_review_details(run: &WorkflowRun<'_>) -> StepResult {
    if run.config.set_publish_date {
        run.ui
            .click_selector(&spotify::SCHEDULE_RADIO, WaitCondition::Present)
            .await?;
        let date = &run.episode.upload_date;
        publish_info!("-- Schedule publishing for date: {}", date.display());
        select_publish_date(&run.ui, date, run.config.date_picker_max_steps).await
    } else {
        publish_info!("-- No schedule, should publish immediately");
        run.ui
            .click_selector(&spotify::PUBLISH_NOW_RADIO, WaitCondition::Present)
            .await
    }
}

async fn finalize(run: &WorkflowRun<'_>) -> StepResult<PublishMode> {
    let mode = run.config.mode();
    match mode {
        PublishMode::Draft => {
            publish_info!("-- Saving draft");
            run.ui
                .click_selector(&spotify::HEADER_MENU, WaitCondition::Visible)
                .await?;
            run.ui
                .click_selector(&spotify::SAVE_DRAFT, WaitCondition::Visible)
                .await?;
        }
        PublishMode::Schedule => {
            publish_info!("-- Scheduling");
            run.ui
                .click_selector(&spotify::SCHEDULE, WaitCondition::Visible)
                .await?;
        }
        PublishMode::PublishNow => {
            publish_info!("-- Publishing");
            run.ui
                .click_selector(&spotify::PUBLISH, WaitCondition::Visible)
                .await?;
        }
    }
    run.ui.settle(FINALIZE_SETTLE).await;
    Ok(mode)
}
