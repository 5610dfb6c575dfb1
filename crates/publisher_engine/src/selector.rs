use std::borrow::Cow;
use std::fmt;

/// How to find one element on the page.
///
/// `Shadow` looks up `inner` inside the open shadow root of the element
/// matched by the `host` CSS selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Css(Cow<'static, str>),
    XPath(Cow<'static, str>),
    Shadow {
        host: Cow<'static, str>,
        inner: Cow<'static, str>,
    },
}

impl Selector {
    pub const fn css(query: &'static str) -> Self {
        Selector::Css(Cow::Borrowed(query))
    }

    pub const fn xpath(query: &'static str) -> Self {
        Selector::XPath(Cow::Borrowed(query))
    }

    pub fn css_owned(query: String) -> Self {
        Selector::Css(Cow::Owned(query))
    }

    pub fn xpath_owned(query: String) -> Self {
        Selector::XPath(Cow::Owned(query))
    }

    pub fn shadow(host: &'static str, inner: String) -> Self {
        Selector::Shadow {
            host: Cow::Borrowed(host),
            inner: Cow::Owned(inner),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(query) => write!(f, "css `{query}`"),
            Selector::XPath(query) => write!(f, "xpath `{query}`"),
            Selector::Shadow { host, inner } => write!(f, "shadow `{host}` >> `{inner}`"),
        }
    }
}

/// Quotes `value` as a CSS attribute string.
pub(crate) fn css_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
