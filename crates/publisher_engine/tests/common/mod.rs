//! Scripted in-memory browser shared by the engine tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Month;
use publisher_core::{EpisodeMetadata, UploadDate};
use publisher_engine::selectors::calendar;
use publisher_engine::{
    BrowserError, BrowserLauncher, BrowserSession, ElementProbe, LaunchOptions, Page,
    ProgressSink, PublishConfig, Selector, WorkflowEvent,
};
use serde_json::Value;
use tokio::time::Instant;

pub const SCREENSHOT_BYTES: &[u8] = b"\x89PNG fake screenshot";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(publisher_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Viewport(u32, u32),
    Click(Selector),
    Type(Selector, String),
    Upload(Selector, PathBuf),
    Script(Selector, Vec<Value>),
    Cookie(String, String),
    Screenshot,
    Close,
}

#[derive(Default)]
struct FakeState {
    url: String,
    clicks: usize,
    missing: HashSet<Selector>,
    hidden: HashSet<Selector>,
    disabled: HashSet<Selector>,
    reveal_at: HashMap<Selector, Instant>,
    reveal_on_click: HashMap<Selector, Vec<Selector>>,
    stays_on_page: HashSet<Selector>,
    texts: HashMap<Selector, String>,
    calendar: Option<(Month, i32)>,
    fail_cookie: bool,
    fail_screenshot: bool,
    redirect: Option<(Instant, String)>,
    actions: Vec<(Action, Instant)>,
}

impl FakeState {
    fn is_missing(&self, selector: &Selector) -> bool {
        if self.missing.contains(selector) {
            return true;
        }
        self.reveal_at
            .get(selector)
            .is_some_and(|at| Instant::now() < *at)
    }

    fn follow_redirect(&mut self) {
        if self
            .redirect
            .as_ref()
            .is_some_and(|(at, _)| Instant::now() >= *at)
        {
            if let Some((_, url)) = self.redirect.take() {
                self.url = url;
            }
        }
    }
}

/// Every selector is present, visible and enabled unless told otherwise.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

impl FakePage {
    pub fn new() -> Self {
        let page = Self::default();
        page.state.lock().unwrap().url = "about:blank".to_string();
        page
    }

    pub fn missing(&self, selector: Selector) -> &Self {
        self.state.lock().unwrap().missing.insert(selector);
        self
    }

    pub fn hidden(&self, selector: Selector) -> &Self {
        self.state.lock().unwrap().hidden.insert(selector);
        self
    }

    pub fn disabled(&self, selector: Selector) -> &Self {
        self.state.lock().unwrap().disabled.insert(selector);
        self
    }

    /// `selector` stays missing until `after` has passed on the (paused) clock.
    pub fn reveal_after(&self, selector: Selector, after: Duration) -> &Self {
        self.state
            .lock()
            .unwrap()
            .reveal_at
            .insert(selector, Instant::now() + after);
        self
    }

    /// `target` is missing until `trigger` is clicked.
    pub fn reveal_on_click(&self, trigger: Selector, target: Selector) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.missing.insert(target.clone());
        state.reveal_on_click.entry(trigger).or_default().push(target);
        drop(state);
        self
    }

    /// Clicking `selector` leaves the URL unchanged.
    pub fn stays_on_page(&self, selector: Selector) -> &Self {
        self.state.lock().unwrap().stays_on_page.insert(selector);
        self
    }

    pub fn text(&self, selector: Selector, text: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .texts
            .insert(selector, text.to_string());
        self
    }

    /// Shows `month year` in the date picker caption; the paging buttons move it.
    pub fn calendar_at(&self, month: Month, year: i32) -> &Self {
        self.state.lock().unwrap().calendar = Some((month, year));
        self
    }

    /// The page moves itself to `url` once `after` has passed, without any click.
    pub fn redirect_after(&self, url: &str, after: Duration) -> &Self {
        self.state.lock().unwrap().redirect = Some((Instant::now() + after, url.to_string()));
        self
    }

    pub fn fail_cookie(&self) -> &Self {
        self.state.lock().unwrap().fail_cookie = true;
        self
    }

    pub fn fail_screenshot(&self) -> &Self {
        self.state.lock().unwrap().fail_screenshot = true;
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state
            .lock()
            .unwrap()
            .actions
            .iter()
            .map(|(action, _)| action.clone())
            .collect()
    }

    /// When `wanted` first happened on the (paused) clock.
    pub fn time_of(&self, wanted: &Action) -> Option<Instant> {
        self.state
            .lock()
            .unwrap()
            .actions
            .iter()
            .find(|(action, _)| action == wanted)
            .map(|(_, at)| *at)
    }

    pub fn clicks(&self) -> Vec<Selector> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::Click(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }

    pub fn click_count(&self, selector: &Selector) -> usize {
        self.clicks().iter().filter(|s| *s == selector).count()
    }

    pub fn gotos(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, wanted: &Action) -> Option<usize> {
        self.actions().iter().position(|action| action == wanted)
    }

    fn record(&self, action: Action) {
        self.state
            .lock()
            .unwrap()
            .actions
            .push((action, Instant::now()));
    }

    fn require(&self, selector: &Selector) -> Result<(), BrowserError> {
        if self.state.lock().unwrap().is_missing(selector) {
            return Err(BrowserError::Command(format!("no such element: {selector}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.record(Action::Goto(url.to_string()));
        self.state.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.follow_redirect();
        Ok(state.url.clone())
    }

    async fn set_viewport(&self, width: u32, height: u32) -> Result<(), BrowserError> {
        self.record(Action::Viewport(width, height));
        Ok(())
    }

    async fn probe(&self, selector: &Selector) -> Result<ElementProbe, BrowserError> {
        let state = self.state.lock().unwrap();
        if state.is_missing(selector) {
            return Ok(ElementProbe::Missing);
        }
        Ok(ElementProbe::Found {
            visible: !state.hidden.contains(selector),
            enabled: !state.disabled.contains(selector),
        })
    }

    async fn click(&self, selector: &Selector) -> Result<(), BrowserError> {
        self.require(selector)?;
        self.record(Action::Click(selector.clone()));

        let mut state = self.state.lock().unwrap();
        state.follow_redirect();
        state.clicks += 1;
        if !state.stays_on_page.contains(selector) {
            let base = state.url.split('#').next().unwrap_or_default().to_string();
            state.url = format!("{base}#click-{}", state.clicks);
        }
        if let Some(targets) = state.reveal_on_click.remove(selector) {
            for target in targets {
                state.missing.remove(&target);
            }
        }
        if let Some((month, year)) = state.calendar {
            if *selector == calendar::NEXT_MONTH {
                let year = if month == Month::December { year + 1 } else { year };
                state.calendar = Some((month.succ(), year));
            } else if *selector == calendar::PREVIOUS_MONTH {
                let year = if month == Month::January { year - 1 } else { year };
                state.calendar = Some((month.pred(), year));
            }
        }
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> Result<String, BrowserError> {
        self.require(selector)?;
        let state = self.state.lock().unwrap();
        if *selector == calendar::CAPTION {
            if let Some((month, year)) = state.calendar {
                return Ok(format!("{} {year}", month.name()));
            }
        }
        Ok(state.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> Result<(), BrowserError> {
        self.require(selector)?;
        self.record(Action::Type(selector.clone(), text.to_string()));
        Ok(())
    }

    async fn upload_file(&self, selector: &Selector, path: &Path) -> Result<(), BrowserError> {
        self.require(selector)?;
        self.record(Action::Upload(selector.clone(), path.to_path_buf()));
        Ok(())
    }

    async fn run_script(
        &self,
        selector: &Selector,
        _script: &str,
        args: Vec<Value>,
    ) -> Result<Value, BrowserError> {
        self.require(selector)?;
        self.record(Action::Script(selector.clone(), args));
        Ok(Value::Null)
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), BrowserError> {
        if self.state.lock().unwrap().fail_cookie {
            return Err(BrowserError::Command("cookies are disabled".to_string()));
        }
        self.record(Action::Cookie(name.to_string(), value.to_string()));
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        self.record(Action::Screenshot);
        if self.state.lock().unwrap().fail_screenshot {
            return Err(BrowserError::Command("screenshot failed".to_string()));
        }
        Ok(SCREENSHOT_BYTES.to_vec())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.record(Action::Close);
        Ok(())
    }
}

/// Hands out sessions on a shared [`FakePage`], or fails every launch.
pub struct FakeLauncher {
    page: FakePage,
    failure: Option<BrowserError>,
    launches: Mutex<Vec<LaunchOptions>>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            failure: None,
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: BrowserError) -> Self {
        Self {
            page: FakePage::new(),
            failure: Some(error),
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<BrowserSession, BrowserError> {
        self.launches.lock().unwrap().push(*options);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(BrowserSession::new(Box::new(self.page.clone()))),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<publisher_core::Stage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WorkflowEvent::StageReached(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: WorkflowEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn episode(description: &str) -> EpisodeMetadata {
    EpisodeMetadata {
        source_id: "abc123".to_string(),
        title: "Episode title".to_string(),
        description: description.to_string(),
        canonical_url: "https://www.youtube.com/watch?v=abc123".to_string(),
        upload_date: UploadDate {
            day: "05".to_string(),
            month_as_full_word: "March".to_string(),
            year: "2025".to_string(),
        },
    }
}

pub fn config(logs_dir: &Path) -> PublishConfig {
    PublishConfig {
        credentials: publisher_engine::Credentials::new("host@example.com", "secret"),
        upload_timeout: Duration::from_secs(60),
        element_timeout: Duration::from_secs(5),
        logs_dir: logs_dir.to_path_buf(),
        ..PublishConfig::default()
    }
}
