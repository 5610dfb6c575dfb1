use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::{BrowserError, Selector};

/// What a single look at the page found for a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementProbe {
    Missing,
    Found { visible: bool, enabled: bool },
}

/// The state an element must reach before a step may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitCondition {
    /// Attached to the document.
    #[default]
    Present,
    /// Attached and rendered with a non-empty box.
    Visible,
    /// Visible and not disabled.
    Clickable,
    /// Detached or not rendered.
    Hidden,
}

impl WaitCondition {
    pub fn is_met(&self, probe: ElementProbe) -> bool {
        match (self, probe) {
            (WaitCondition::Present, ElementProbe::Found { .. }) => true,
            (WaitCondition::Visible, ElementProbe::Found { visible, .. }) => visible,
            (WaitCondition::Clickable, ElementProbe::Found { visible, enabled }) => {
                visible && enabled
            }
            (WaitCondition::Hidden, ElementProbe::Missing) => true,
            (WaitCondition::Hidden, ElementProbe::Found { visible, .. }) => !visible,
            (_, ElementProbe::Missing) => false,
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitCondition::Present => write!(f, "present"),
            WaitCondition::Visible => write!(f, "visible"),
            WaitCondition::Clickable => write!(f, "clickable"),
            WaitCondition::Hidden => write!(f, "hidden"),
        }
    }
}

/// One open browser tab, driven one command at a time.
///
/// Implementations act immediately and never wait for elements; waiting is
/// the job of [`crate::Ui`].
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    async fn set_viewport(&self, width: u32, height: u32) -> Result<(), BrowserError>;

    async fn probe(&self, selector: &Selector) -> Result<ElementProbe, BrowserError>;

    /// Dispatches a DOM click on the element.
    async fn click(&self, selector: &Selector) -> Result<(), BrowserError>;

    async fn text_content(&self, selector: &Selector) -> Result<String, BrowserError>;

    /// Sends key strokes to the element.
    async fn type_text(&self, selector: &Selector, text: &str) -> Result<(), BrowserError>;

    /// Attaches a local file to a file input.
    async fn upload_file(&self, selector: &Selector, path: &Path) -> Result<(), BrowserError>;

    /// Runs `script` with the element as `arguments[0]` followed by `args`.
    async fn run_script(
        &self,
        selector: &Selector,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, BrowserError>;

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), BrowserError>;

    /// PNG bytes of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    async fn close(&self) -> Result<(), BrowserError>;
}
