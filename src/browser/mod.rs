// src/browser/mod.rs
// =============================================================================
// This module is the page-loading layer of the crawler.
//
// The crawler doesn't care *how* a page gets loaded, only what comes back:
// the HTTP status, the page title, the visible text and the links on it.
// So we describe that with two small traits:
//
// - Browser: something that can open tabs (and be shut down at the end)
// - Tab: something that can navigate to one URL at a time
//
// Submodules:
// - http: the default Browser, built on reqwest + scraper
// - pool: a fixed-size pool of tabs the crawler checks out and back in
//
// Keeping this behind traits means the crawl tests can plug in an in-memory
// "site" instead of talking to a real server.
// =============================================================================

mod http;
mod pool;

pub use http::HttpBrowser;
pub use pool::TabPool;

use crate::error::{CheckError, NavigationError};
use async_trait::async_trait;
use url::Url;

/// What a tab saw after loading a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    /// HTTP status of the final response
    pub status: u16,
    /// Contents of <title>, trimmed
    pub title: String,
    /// Visible text of <body> (scripts and styles excluded)
    pub body_text: String,
    /// Absolute URLs of every <a href> on the page, in document order
    pub links: Vec<String>,
}

/// A source of tabs. Creating the Browser itself is the "launch" step.
#[async_trait]
pub trait Browser: Send + Sync {
    type Tab: Tab + 'static;

    /// Opens a fresh tab.
    async fn new_tab(&self) -> Result<Self::Tab, CheckError>;

    /// Shuts the browser down. Called once, after every tab is closed.
    async fn close(&self);
}

/// One tab. A tab only ever loads one page at a time.
#[async_trait]
pub trait Tab: Send {
    /// Loads `url` and returns what the page looked like.
    async fn goto(&mut self, url: &Url) -> Result<PageSnapshot, NavigationError>;

    /// Releases the tab.
    async fn close(&mut self);
}
