// src/browser/http.rs
// =============================================================================
// The default page loader: plain HTTP with reqwest, HTML parsing with scraper.
//
// A static documentation site serves fully rendered HTML, so a GET request is
// enough to see the status code, title, text and links of every page.
//
// "Launching" the browser means building the shared reqwest Client. Each tab
// holds a clone of it (Client is a cheap Arc internally), so all tabs share
// one connection pool.
// =============================================================================

use super::{Browser, PageSnapshot, Tab};
use crate::checker::extract_page;
use crate::error::{CheckError, NavigationError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpBrowser {
    client: Client,
    timeout: Duration,
}

impl HttpBrowser {
    /// Builds the HTTP client. Failing here is fatal for the crawl.
    pub fn launch(timeout: Duration) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("docs-link-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckError::Launch(e.to_string()))?;

        Ok(HttpBrowser { client, timeout })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    type Tab = HttpTab;

    async fn new_tab(&self) -> Result<HttpTab, CheckError> {
        Ok(HttpTab {
            client: self.client.clone(),
            timeout: self.timeout,
        })
    }

    async fn close(&self) {
        debug!("http browser closed");
    }
}

pub struct HttpTab {
    client: Client,
    timeout: Duration,
}

#[async_trait]
impl Tab for HttpTab {
    async fn goto(&mut self, url: &Url) -> Result<PageSnapshot, NavigationError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| categorize_error(url, self.timeout, e))?;

        let status = response.status().as_u16();

        // Links are resolved against where we ended up after redirects,
        // just like a browser's a.href
        let final_url = response.url().clone();

        let html = response
            .text()
            .await
            .map_err(|e| categorize_error(url, self.timeout, e))?;

        let page = extract_page(&html, &final_url);

        Ok(PageSnapshot {
            status,
            title: page.title,
            body_text: page.body_text,
            links: page.links,
        })
    }

    async fn close(&mut self) {}
}

// Sorts reqwest failures into the kinds the report cares about
fn categorize_error(url: &Url, timeout: Duration, error: reqwest::Error) -> NavigationError {
    let url = url.to_string();
    let message = error_chain(&error);

    if error.is_timeout() {
        NavigationError::Timeout {
            url,
            timeout_ms: timeout.as_millis(),
        }
    } else if error.is_connect() {
        let lower = message.to_lowercase();
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
            NavigationError::Dns { url, message }
        } else {
            NavigationError::ConnectionRefused { url, message }
        }
    } else {
        NavigationError::Other(message)
    }
}

// reqwest's top-level message is terse ("error sending request"); the useful
// part (e.g. "Connection refused") lives further down the source chain
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }

    message
}
