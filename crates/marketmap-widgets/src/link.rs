//! Resolving an instrument code to a quote page and opening it.
//!
//! Resolution goes through a host-supplied [`LinkResolver`] (usually a
//! network lookup). Any failure falls back to a URL derived locally from the
//! code, so activating a cell always opens something.

use indexmap::IndexMap;
use std::future::Future;
use thiserror::Error;

/// Quote page host used by [`fallback_url`].
pub const QUOTE_BASE_URL: &str = "https://quote.eastmoney.com";

/// Errors from link resolution or opening.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The resolver has no page for this code.
    #[error("no link for code {0}")]
    NotFound(String),

    /// The resolver could not be reached or answered badly.
    #[error("link service unavailable: {0}")]
    Unavailable(String),

    /// The opener rejected the URL.
    #[error("failed to open {url}: {reason}")]
    OpenFailed {
        /// URL that could not be opened
        url: String,
        /// Reason reported by the opener
        reason: String,
    },
}

/// Exchange a code is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    /// Shanghai
    Sh,
    /// Shenzhen
    Sz,
    /// Beijing
    Bj,
}

impl Market {
    /// Lowercase URL prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sh => "sh",
            Self::Sz => "sz",
            Self::Bj => "bj",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "sh" => Some(Self::Sh),
            "sz" => Some(Self::Sz),
            "bj" => Some(Self::Bj),
            _ => None,
        }
    }

    fn from_leading_digit(digit: Option<char>) -> Self {
        match digit {
            Some('6' | '5' | '9') => Self::Sh,
            Some('4' | '8') => Self::Bj,
            // 0-3 and anything unrecognized
            _ => Self::Sz,
        }
    }
}

/// Split a code into its market and the bare code.
///
/// An explicit `sh`/`sz`/`bj` prefix (any case) wins; otherwise the market
/// is guessed from the leading digit.
#[must_use]
pub fn split_market(code: &str) -> (Market, &str) {
    let code = code.trim();
    if let Some(market) = code.get(..2).and_then(Market::from_prefix) {
        return (market, &code[2..]);
    }
    (Market::from_leading_digit(code.chars().next()), code)
}

/// Quote page URL derived from the code alone.
#[must_use]
pub fn fallback_url(code: &str) -> String {
    let (market, digits) = split_market(code);
    format!("{QUOTE_BASE_URL}/{}{digits}.html", market.as_str())
}

/// Resolves an instrument code to a URL.
pub trait LinkResolver {
    /// Look up the page for `code`.
    fn resolve(&self, code: &str) -> impl Future<Output = Result<String, LinkError>> + Send;
}

/// Opens a URL in whatever the host considers a new tab.
pub trait LinkOpener {
    /// Open `url`.
    fn open(&self, url: &str) -> Result<(), LinkError>;
}

/// Resolver that never looks anything up.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl LinkResolver for FallbackResolver {
    async fn resolve(&self, code: &str) -> Result<String, LinkError> {
        Ok(fallback_url(code))
    }
}

/// Resolver backed by a fixed code → URL table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    links: IndexMap<String, String>,
}

impl StaticResolver {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    #[must_use]
    pub fn with_link(mut self, code: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.insert(code.into(), url.into());
        self
    }
}

impl LinkResolver for StaticResolver {
    async fn resolve(&self, code: &str) -> Result<String, LinkError> {
        self.links
            .get(code)
            .cloned()
            .ok_or_else(|| LinkError::NotFound(code.to_string()))
    }
}

/// Resolve `code`, falling back to [`fallback_url`] on any error.
pub async fn resolve_or_fallback<R: LinkResolver>(resolver: &R, code: &str) -> String {
    match resolver.resolve(code).await {
        Ok(url) => url,
        Err(err) => {
            log::warn!(target: "marketmap::link", "resolving {code} failed: {err}; using fallback");
            fallback_url(code)
        }
    }
}

/// Resolve `code` and open the result. Returns the URL that was opened.
pub async fn open_leaf_link<R, O>(resolver: &R, opener: &O, code: &str) -> Result<String, LinkError>
where
    R: LinkResolver,
    O: LinkOpener + ?Sized,
{
    let url = resolve_or_fallback(resolver, code).await;
    log::debug!(target: "marketmap::link", "opening {url}");
    opener.open(&url)?;
    Ok(url)
}
