//! [`Page`] and [`BrowserLauncher`] backed by a WebDriver server.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::cookies::Cookie;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::{Client, ClientBuilder, Locator};
use publisher_logging::{publish_debug, publish_info, publish_warn};
use serde_json::{json, Map, Value};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use url::Url;

use crate::{
    BrowserError, BrowserLauncher, BrowserSession, ElementProbe, LaunchOptions, Page, Selector,
};

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Resolves `arguments[0..3]` (kind, query, inner) to an element or `null`.
const LOCATE: &str = r#"
    const locate = (kind, query, inner) => {
        if (kind === 'xpath') {
            return document.evaluate(query, document, null,
                XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
        }
        if (kind === 'shadow') {
            const host = document.querySelector(query);
            return host && host.shadowRoot ? host.shadowRoot.querySelector(inner) : null;
        }
        return document.querySelector(query);
    };
    const el = locate(arguments[0], arguments[1], arguments[2]);
"#;

const PROBE: &str = r#"
    if (!el) { return null; }
    const style = window.getComputedStyle(el);
    const visible = style.visibility !== 'hidden' && style.display !== 'none'
        && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
    return { visible: visible, enabled: !el.disabled };
"#;

const WINDOW_CHROME: &str =
    "return [window.outerWidth - window.innerWidth, window.outerHeight - window.innerHeight];";

#[derive(Debug, Clone)]
pub struct WebDriverSettings {
    pub webdriver_url: String,
    /// When set, this chromedriver binary is started for the session and
    /// stopped with it.
    pub chromedriver_path: Option<PathBuf>,
    pub startup_timeout: Duration,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            chromedriver_path: None,
            startup_timeout: Duration::from_secs(20),
        }
    }
}

/// Opens one Chrome session per launch through WebDriver.
pub struct WebDriverLauncher {
    settings: WebDriverSettings,
}

impl WebDriverLauncher {
    pub fn new(settings: WebDriverSettings) -> Self {
        Self { settings }
    }

    fn spawn_driver(&self) -> Result<Option<Child>, BrowserError> {
        let Some(program) = self.settings.chromedriver_path.as_ref() else {
            return Ok(None);
        };
        let url = Url::parse(&self.settings.webdriver_url)
            .map_err(|err| BrowserError::Driver(format!("invalid webdriver url: {err}")))?;
        let port = url.port_or_known_default().ok_or_else(|| {
            BrowserError::Driver(format!("no port in webdriver url {url}"))
        })?;

        publish_info!("Starting {} on port {port}", program.display());
        let child = Command::new(program)
            .arg(format!("--port={port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                BrowserError::Driver(format!("failed to start {}: {err}", program.display()))
            })?;
        Ok(Some(child))
    }

    async fn connect(&self, capabilities: Map<String, Value>) -> Result<Client, BrowserError> {
        let url = &self.settings.webdriver_url;
        let deadline = Instant::now() + self.settings.startup_timeout;
        loop {
            match ClientBuilder::native()
                .capabilities(capabilities.clone())
                .connect(url)
                .await
            {
                Ok(client) => return Ok(client),
                // The server answered but refused the session; retrying will not help.
                Err(err @ NewSessionError::SessionNotCreated(_)) => {
                    return Err(session_error(url, err));
                }
                Err(err) if Instant::now() >= deadline => {
                    return Err(session_error(url, err));
                }
                Err(err) => {
                    publish_debug!("WebDriver at {url} not ready yet: {err}");
                    sleep(CONNECT_RETRY_INTERVAL).await;
                }
            }
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<BrowserSession, BrowserError> {
        let driver = self.spawn_driver()?;
        let client = self.connect(chrome_capabilities(options.headless)).await?;
        publish_info!("Connected to WebDriver at {}", self.settings.webdriver_url);
        Ok(BrowserSession::new(Box::new(WebDriverPage {
            client,
            driver: Mutex::new(driver),
        })))
    }
}

fn chrome_capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--lang=en-US".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
    }
    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "prefs": { "intl.accept_languages": "en,en_US" },
            "excludeSwitches": ["enable-logging"],
        }),
    );
    capabilities
}

fn session_error(url: &str, err: NewSessionError) -> BrowserError {
    BrowserError::Session(format!("failed to connect to webdriver at {url}: {err}"))
}

fn command_error(err: CmdError) -> BrowserError {
    BrowserError::Command(err.to_string())
}

/// Grows the requested viewport by the space the browser's own frame takes.
/// An unreadable measurement counts as no frame.
fn window_size_for_viewport(width: u32, height: u32, chrome: &Value) -> (u32, u32) {
    let extra = |index: usize| {
        chrome
            .get(index)
            .and_then(Value::as_u64)
            .and_then(|px| u32::try_from(px).ok())
            .unwrap_or(0)
    };
    (width.saturating_add(extra(0)), height.saturating_add(extra(1)))
}

fn locator_args(selector: &Selector) -> Vec<Value> {
    match selector {
        Selector::Css(query) => vec![json!("css"), json!(query), Value::Null],
        Selector::XPath(query) => vec![json!("xpath"), json!(query), Value::Null],
        Selector::Shadow { host, inner } => vec![json!("shadow"), json!(host), json!(inner)],
    }
}

struct WebDriverPage {
    client: Client,
    driver: Mutex<Option<Child>>,
}

impl WebDriverPage {
    async fn execute_on(
        &self,
        selector: &Selector,
        body: &str,
        extra: Vec<Value>,
    ) -> Result<Value, BrowserError> {
        let script = format!("{LOCATE}\n{body}");
        let mut args = locator_args(selector);
        args.extend(extra);
        self.client.execute(&script, args).await.map_err(command_error)
    }

    /// Runs `body` with the element bound to `el`, failing when it is missing.
    async fn execute_on_element(
        &self,
        selector: &Selector,
        body: &str,
        extra: Vec<Value>,
    ) -> Result<Value, BrowserError> {
        let guarded = format!(
            "if (!el) {{ throw new Error('no element for ' + arguments[1]); }}\n{body}"
        );
        self.execute_on(selector, &guarded, extra).await
    }

    async fn find(
        &self,
        selector: &Selector,
        operation: &'static str,
    ) -> Result<fantoccini::elements::Element, BrowserError> {
        let locator = match selector {
            Selector::Css(query) => Locator::Css(query.as_ref()),
            Selector::XPath(query) => Locator::XPath(query.as_ref()),
            Selector::Shadow { .. } => {
                return Err(BrowserError::Unsupported {
                    selector: selector.to_string(),
                    operation,
                })
            }
        };
        self.client.find(locator).await.map_err(command_error)
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.client.goto(url).await.map_err(command_error)
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let url = self.client.current_url().await.map_err(command_error)?;
        Ok(url.to_string())
    }

    /// WebDriver only sizes the outer window, so the frame around the page is
    /// measured once the window exists and added on top.
    async fn set_viewport(&self, width: u32, height: u32) -> Result<(), BrowserError> {
        self.client
            .set_window_size(width, height)
            .await
            .map_err(command_error)?;
        let chrome = self
            .client
            .execute(WINDOW_CHROME, Vec::new())
            .await
            .map_err(command_error)?;
        let (outer_width, outer_height) = window_size_for_viewport(width, height, &chrome);
        if (outer_width, outer_height) == (width, height) {
            return Ok(());
        }
        publish_debug!(
            "Resizing window to {outer_width}x{outer_height} for a {width}x{height} viewport"
        );
        self.client
            .set_window_size(outer_width, outer_height)
            .await
            .map_err(command_error)
    }

    async fn probe(&self, selector: &Selector) -> Result<ElementProbe, BrowserError> {
        let found = self.execute_on(selector, PROBE, Vec::new()).await?;
        let Value::Object(state) = found else {
            return Ok(ElementProbe::Missing);
        };
        let flag = |name: &str| state.get(name).and_then(Value::as_bool).unwrap_or(false);
        Ok(ElementProbe::Found {
            visible: flag("visible"),
            enabled: flag("enabled"),
        })
    }

    async fn click(&self, selector: &Selector) -> Result<(), BrowserError> {
        self.execute_on_element(selector, "el.click();", Vec::new())
            .await
            .map(drop)
    }

    async fn text_content(&self, selector: &Selector) -> Result<String, BrowserError> {
        let text = self
            .execute_on_element(selector, "return el.textContent;", Vec::new())
            .await?;
        Ok(text.as_str().unwrap_or_default().to_string())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> Result<(), BrowserError> {
        let element = self.find(selector, "typing").await?;
        element.send_keys(text).await.map_err(command_error)
    }

    async fn upload_file(&self, selector: &Selector, path: &Path) -> Result<(), BrowserError> {
        let absolute = path.canonicalize().map_err(|err| {
            BrowserError::Command(format!("cannot upload {}: {err}", path.display()))
        })?;
        let element = self.find(selector, "file upload").await?;
        element
            .send_keys(&absolute.to_string_lossy())
            .await
            .map_err(command_error)
    }

    async fn run_script(
        &self,
        selector: &Selector,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, BrowserError> {
        // Rebinds `arguments` so the caller sees the element first.
        let body = format!(
            "return (function() {{ {script} }}).apply(null, [el].concat(Array.prototype.slice.call(arguments, 3)));"
        );
        self.execute_on_element(selector, &body, args).await
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), BrowserError> {
        let cookie = Cookie::new(name.to_string(), value.to_string());
        self.client.add_cookie(cookie).await.map_err(command_error)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        self.client.screenshot().await.map_err(command_error)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let closed = self.client.clone().close().await.map_err(command_error);
        if let Some(mut child) = self.driver.lock().await.take() {
            if let Err(err) = child.kill().await {
                publish_warn!("Failed to stop chromedriver: {err}");
            }
        }
        closed
    }
}
