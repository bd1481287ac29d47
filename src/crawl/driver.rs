// src/crawl/driver.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Push every seed onto the frontier at depth 0
// 2. While there's an idle tab and work to do, pop the newest entry and hand
//    it (with the tab) to a spawned navigation task
// 3. When a task finishes, take the tab back, record the status, classify the
//    page, and push its new links at depth + 1
// 4. Stop when the frontier is empty and nothing is loading, or when the page
//    budget is used up
//
// Only this loop touches the crawl state. Navigation tasks just own a tab and
// a URL and hand their result back through the JoinSet, so there's no locking
// anywhere. With a pool of one tab this is exactly the old sequential crawl.
//
// Every per-page problem becomes an entry in the failure record. The only
// errors that escape are launch failures and a panicked navigation task.
// =============================================================================

use super::classify::{classify_page, FailureReason};
use super::frontier::{normalize_link, Frontier, FrontierEntry};
use crate::browser::{Browser, PageSnapshot, Tab, TabPool};
use crate::config::{CrawlConfig, SeedSet};
use crate::console::Console;
use crate::error::{CheckError, NavigationError};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Everything a finished crawl knows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Normalized URL -> HTTP status of every page that loaded
    pub visited: BTreeMap<String, u16>,
    /// Normalized URL -> depth it was first reached at
    pub depths: BTreeMap<String, usize>,
    /// URL -> why it's broken
    pub failures: BTreeMap<String, FailureReason>,
    /// URLs that were discovered but sat deeper than max_depth
    pub skipped_depth: BTreeSet<String>,
}

// Mutable state of one run. Built fresh per crawl, owned by the loop.
#[derive(Default)]
struct CrawlState {
    frontier: Frontier,
    visited: BTreeMap<String, u16>,
    depths: BTreeMap<String, usize>,
    failures: BTreeMap<String, FailureReason>,
    skipped_depth: BTreeSet<String>,
    // Pages whose navigation threw; never retried, not counted as visited
    attempted: HashSet<String>,
    in_flight: HashSet<String>,
}

impl CrawlState {
    fn seeded(seeds: &SeedSet) -> Result<Self, CheckError> {
        let mut state = CrawlState::default();

        for mut url in seeds.urls()? {
            url.set_fragment(None);
            state.frontier.push(url, 0);
        }

        Ok(state)
    }

    fn is_known(&self, url: &str) -> bool {
        self.visited.contains_key(url) || self.attempted.contains(url) || self.in_flight.contains(url)
    }

    // Pages that count against max_pages: loaded, or loading and possibly
    // about to be. Failed navigations don't use up the budget.
    fn reserved(&self) -> usize {
        self.visited.len() + self.in_flight.len()
    }

    fn mark_visited(&mut self, url: &str, status: u16, depth: usize) {
        let previous = self.visited.insert(url.to_string(), status);
        debug_assert!(previous.is_none(), "page visited twice: {}", url);
        // Reached again by a shorter path after an earlier depth skip
        self.skipped_depth.remove(url);
        self.depths.entry(url.to_string()).or_insert(depth);
    }

    fn into_outcome(self) -> CrawlOutcome {
        CrawlOutcome {
            visited: self.visited,
            depths: self.depths,
            failures: self.failures,
            skipped_depth: self.skipped_depth,
        }
    }
}

// What a navigation task hands back
struct Navigation<T> {
    tab: T,
    entry: FrontierEntry,
    result: Result<PageSnapshot, NavigationError>,
}

pub struct Crawler<B: Browser> {
    browser: B,
    config: CrawlConfig,
    console: Console,
}

impl<B: Browser> Crawler<B> {
    pub fn new(browser: B, config: CrawlConfig) -> Self {
        Crawler {
            browser,
            config,
            console: Console::default(),
        }
    }

    /// Sends progress lines somewhere other than stdout.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Crawls from `seeds` until the frontier runs dry or a limit is hit.
    ///
    /// The tab pool and the browser are always closed before this returns,
    /// whether the crawl finished or failed.
    pub async fn run(self, seeds: &SeedSet) -> Result<CrawlOutcome, CheckError> {
        let origin_host = seeds.origin_host().map(str::to_string);
        let mut state = match CrawlState::seeded(seeds) {
            Ok(state) => state,
            Err(e) => {
                self.browser.close().await;
                return Err(e);
            }
        };

        let mut pool = match TabPool::open(&self.browser, self.config.pool_size()).await {
            Ok(pool) => pool,
            Err(e) => {
                self.browser.close().await;
                return Err(e);
            }
        };

        info!(
            seeds = state.frontier.len(),
            tabs = pool.size(),
            max_depth = self.config.max_depth,
            max_pages = self.config.max_pages,
            "crawl started"
        );

        let result = self
            .drive(&mut state, &mut pool, origin_host.as_deref())
            .await;

        pool.close_all().await;
        self.browser.close().await;
        self.console.line("\nBrowser closed");

        result?;

        info!(
            visited = state.visited.len(),
            failures = state.failures.len(),
            "crawl finished"
        );
        Ok(state.into_outcome())
    }

    async fn drive(
        &self,
        state: &mut CrawlState,
        pool: &mut TabPool<B::Tab>,
        origin_host: Option<&str>,
    ) -> Result<(), CheckError> {
        let mut tasks: JoinSet<Navigation<B::Tab>> = JoinSet::new();

        loop {
            self.dispatch(state, pool, &mut tasks);

            // Nothing loading and nothing dispatchable: we're done
            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok(navigation) => {
                    pool.checkin(navigation.tab);
                    state.in_flight.remove(navigation.entry.url.as_str());
                    self.record(state, navigation.entry, navigation.result, origin_host);
                }
                Err(e) => {
                    // The tab went down with the task. Collect the others so
                    // they can still be closed, then give up.
                    while let Some(Ok(navigation)) = tasks.join_next().await {
                        pool.checkin(navigation.tab);
                    }
                    return Err(CheckError::Task(e.to_string()));
                }
            }
        }

        Ok(())
    }

    // Hands frontier entries to idle tabs until one of them runs out or the
    // page budget is spent
    fn dispatch(
        &self,
        state: &mut CrawlState,
        pool: &mut TabPool<B::Tab>,
        tasks: &mut JoinSet<Navigation<B::Tab>>,
    ) {
        while state.reserved() < self.config.max_pages && pool.idle() > 0 {
            let Some(entry) = state.frontier.pop() else {
                break;
            };

            if state.is_known(entry.url.as_str()) {
                continue;
            }

            if entry.depth > self.config.max_depth {
                // Once per URL, however often it's rediscovered too deep
                if state.skipped_depth.insert(entry.url.to_string()) {
                    self.console
                        .line(format!("\nSkipping (max depth): {}", entry.url));
                }
                continue;
            }

            let Some(mut tab) = pool.checkout() else {
                break;
            };

            self.console
                .line(format!("\nChecking: {} (depth: {})", entry.url, entry.depth));
            state.in_flight.insert(entry.url.to_string());

            tasks.spawn(async move {
                let result = tab.goto(&entry.url).await;
                Navigation { tab, entry, result }
            });
        }
    }

    fn record(
        &self,
        state: &mut CrawlState,
        entry: FrontierEntry,
        result: Result<PageSnapshot, NavigationError>,
        origin_host: Option<&str>,
    ) {
        let url = entry.url.to_string();

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.console.line(format!("  ❌ Error: {}", e));
                warn!(url = %url, error = %e, "navigation failed");
                state.attempted.insert(url.clone());
                state.failures.insert(url, FailureReason::Navigation(e));
                return;
            }
        };

        state.mark_visited(&url, page.status, entry.depth);

        match classify_page(&page) {
            Some(reason @ FailureReason::HttpStatus(_)) => {
                self.console.line(format!("  ❌ Status: {}", page.status));
                state.failures.insert(url, reason);
                return;
            }
            Some(reason) => {
                self.console.line(format!("  ✅ Status: {}", page.status));
                self.console.line("  ⚠️ Warning: Page may contain error messages");
                if let FailureReason::ErrorTitle(title) = &reason {
                    self.console.line(format!("  ⚠️ Page title: \"{}\"", title));
                }
                state.failures.insert(url.clone(), reason);
            }
            None => self.console.line(format!("  ✅ Status: {}", page.status)),
        }

        self.console.line(format!("  Found {} links", page.links.len()));

        let mut queued = 0;
        for link in &page.links {
            let Some(next) = normalize_link(link, origin_host, self.config.include_external) else {
                continue;
            };

            if state.is_known(next.as_str()) {
                continue;
            }

            if state.frontier.push(next, entry.depth + 1) {
                queued += 1;
            }
        }

        debug!(url = %url, queued, "links queued");
    }
}
