mod common;

use std::time::Duration;

use chrono::Month;
use common::{init_logging, Action, FakePage, RecordingSink};
use pretty_assertions::assert_eq;
use publisher_core::{ConvergenceError, UploadDate};
use publisher_engine::selectors::calendar;
use publisher_engine::{
    select_publish_date, Selector, StepError, Ui, WaitCondition, WorkflowEvent,
};
use serde_json::Value;
use tokio::time::Instant;

const BUTTON: Selector = Selector::css("#button");
const OTHER: Selector = Selector::css("#other");

fn date(day: &str, month: &str, year: &str) -> UploadDate {
    UploadDate {
        day: day.to_string(),
        month_as_full_word: month.to_string(),
        year: year.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn wait_for_returns_once_element_appears() {
    init_logging();
    let page = FakePage::new();
    page.reveal_after(BUTTON, Duration::from_secs(3));
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(10));

    let started = Instant::now();
    ui.wait_for(&BUTTON, WaitCondition::Present).await.unwrap();
    let waited = started.elapsed();

    assert!(waited >= Duration::from_secs(3));
    assert!(waited < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn wait_for_times_out_with_element_not_found() {
    init_logging();
    let page = FakePage::new();
    page.hidden(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(2));

    let err = ui
        .click_selector(&BUTTON, WaitCondition::Visible)
        .await
        .unwrap_err();

    match err {
        StepError::ElementNotFound {
            selector,
            condition,
            timeout,
        } => {
            assert_eq!(selector, BUTTON.to_string());
            assert_eq!(condition, WaitCondition::Visible);
            assert_eq!(timeout, Duration::from_secs(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clickable_requires_enabled_element() {
    init_logging();
    let page = FakePage::new();
    page.disabled(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    assert!(ui
        .click_selector(&BUTTON, WaitCondition::Clickable)
        .await
        .is_err());
    ui.click_selector(&BUTTON, WaitCondition::Visible)
        .await
        .unwrap();
    assert_eq!(page.clicks(), vec![BUTTON]);
}

#[tokio::test(start_paused = true)]
async fn hidden_is_met_by_missing_element() {
    init_logging();
    let page = FakePage::new();
    page.missing(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    ui.wait_for(&BUTTON, WaitCondition::Hidden).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn upload_wait_reports_upload_timeout() {
    init_logging();
    let page = FakePage::new();
    page.missing(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    let err = ui
        .wait_for_upload(
            &BUTTON,
            WaitCondition::Present,
            Duration::from_secs(90),
            "audio file",
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StepError::UploadTimeout { what: "audio file", timeout } if timeout == Duration::from_secs(90)
    ));
}

#[tokio::test(start_paused = true)]
async fn paste_focuses_selects_and_pastes() {
    init_logging();
    let page = FakePage::new();
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    ui.paste_text(&BUTTON, "Line one\nLine two").await.unwrap();

    assert_eq!(
        page.actions(),
        vec![
            Action::Script(BUTTON, Vec::new()),
            Action::Type(BUTTON, " ".to_string()),
            Action::Script(BUTTON, Vec::new()),
            Action::Script(
                BUTTON,
                vec![Value::String("Line one\nLine two".to_string())]
            ),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn first_candidate_wins_without_fallback_event() {
    init_logging();
    let page = FakePage::new();
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    ui.click_first_of("Publish now", &[BUTTON, OTHER], WaitCondition::Visible)
        .await
        .unwrap();

    assert_eq!(page.clicks(), vec![BUTTON]);
    assert!(sink.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn later_candidate_is_used_and_reported() {
    init_logging();
    let page = FakePage::new();
    page.missing(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(5));

    let started = Instant::now();
    ui.click_first_of("Publish now", &[BUTTON, OTHER], WaitCondition::Visible)
        .await
        .unwrap();

    // The fallback is taken on the first poll, not after the first candidate times out.
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(page.clicks(), vec![OTHER]);
    assert_eq!(
        sink.events(),
        vec![WorkflowEvent::FallbackUsed {
            action: "Publish now".to_string(),
            selector: OTHER.to_string(),
            position: 1,
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn navigation_wait_follows_url_change() {
    init_logging();
    let page = FakePage::new();
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    ui.click_and_wait_for_navigation(&BUTTON, WaitCondition::Visible)
        .await
        .unwrap();
    assert_eq!(page.clicks(), vec![BUTTON]);
}

#[tokio::test(start_paused = true)]
async fn navigation_wait_fails_when_url_stays() {
    init_logging();
    let page = FakePage::new();
    page.stays_on_page(BUTTON);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(2));

    let err = ui
        .click_and_wait_for_navigation(&BUTTON, WaitCondition::Visible)
        .await
        .unwrap_err();

    assert!(matches!(err, StepError::Navigation { .. }));
    assert_eq!(page.clicks(), vec![BUTTON]);
}

#[tokio::test(start_paused = true)]
async fn redirect_while_waiting_for_element_is_not_navigation() {
    init_logging();
    let page = FakePage::new();
    page.reveal_after(BUTTON, Duration::from_secs(2))
        .stays_on_page(BUTTON)
        .redirect_after("https://example.com/en", Duration::from_secs(1));
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(5));

    let err = ui
        .click_and_wait_for_navigation(&BUTTON, WaitCondition::Visible)
        .await
        .unwrap_err();

    match err {
        StepError::Navigation { message, .. } => {
            assert!(message.contains("https://example.com/en"), "{message}")
        }
        other => panic!("expected a navigation error, got {other:?}"),
    }
    assert_eq!(page.clicks(), vec![BUTTON]);
}

#[tokio::test(start_paused = true)]
async fn goto_opens_url() {
    init_logging();
    let page = FakePage::new();
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    ui.goto("https://example.com/wizard").await.unwrap();
    assert_eq!(page.gotos(), vec!["https://example.com/wizard".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn date_picker_pages_back_to_earlier_month() {
    init_logging();
    let page = FakePage::new();
    page.calendar_at(Month::February, 2026);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    select_publish_date(&ui, &date("09", "November", "2025"), 24)
        .await
        .unwrap();

    assert_eq!(
        page.clicks(),
        vec![
            calendar::DATE_INPUT,
            calendar::PREVIOUS_MONTH,
            calendar::PREVIOUS_MONTH,
            calendar::PREVIOUS_MONTH,
            calendar::day_cell(9),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn date_picker_selects_day_on_current_month() {
    init_logging();
    let page = FakePage::new();
    page.calendar_at(Month::March, 2025);
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    select_publish_date(&ui, &date("05", "March", "2025"), 24)
        .await
        .unwrap();

    assert_eq!(
        page.clicks(),
        vec![calendar::DATE_INPUT, calendar::day_cell(5)]
    );
}

#[tokio::test(start_paused = true)]
async fn date_picker_rejects_unreadable_caption() {
    init_logging();
    let page = FakePage::new();
    page.text(calendar::CAPTION, "Loading...");
    let sink = RecordingSink::default();
    let ui = Ui::new(&page, &sink, Duration::from_secs(1));

    let err = select_publish_date(&ui, &date("05", "March", "2025"), 24)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StepError::DatePicker(ConvergenceError::Caption(_))
    ));
}
