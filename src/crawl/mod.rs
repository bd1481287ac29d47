// src/crawl/mod.rs
// =============================================================================
// This module crawls a running documentation site and classifies every page.
//
// Features:
// - Depth-first crawl from a set of seed URLs
// - Same-origin restriction (external links are skipped unless enabled)
// - Depth and page-count limits
// - A pool of tabs that load several pages at once
// - Detection of "soft 404" pages that return 200 but show an error
//
// Submodules:
// - frontier: the work stack and link normalization
// - classify: deciding whether a page is broken
// - driver: the crawl loop itself
// =============================================================================

mod classify;
mod driver;
mod frontier;

pub use classify::{FailureCategory, FailureReason};
pub use driver::{CrawlOutcome, Crawler};
