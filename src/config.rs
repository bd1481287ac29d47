// src/config.rs
// =============================================================================
// Crawl configuration and seed URLs.
//
// The defaults here match the documentation site this tool was written for:
// a dev server on localhost:3000 plus a handful of deep entry points that are
// not always reachable from the home page.
//
// The CLI (cli.rs) fills these structs in; everything downstream only ever
// sees an immutable CrawlConfig and a resolved list of seed URLs.
// =============================================================================

use crate::error::CheckError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REPORT_PATH: &str = "link-check-results.json";
pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Entry points appended to the base URL in addition to the base itself.
pub const DEFAULT_SEED_PATHS: &[&str] = &[
    "/docs",
    "/docs/code-walkthrough/master-secret-generation",
    "/docs/code-walkthrough/kek-version-creation",
    "/docs/code-walkthrough/admin-setup",
    "/docs/code-walkthrough/log-creation",
    "/docs/code-walkthrough/user-provisioning",
    "/docs/code-walkthrough/log-reading",
    "/docs/code-walkthrough/key-rotation",
    "/docs/code-snippets/typescript-client-sdk/src/crypto/KeyDerivation",
    "/docs/code-snippets/typescript-client-sdk/src/auth/AuthManager",
];

/// Limits for one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Pages deeper than this are skipped (seeds are depth 0)
    pub max_depth: usize,
    /// Hard cap on the number of distinct pages processed
    pub max_pages: usize,
    /// Follow links whose host differs from the base URL's host
    pub include_external: bool,
    /// Per-navigation timeout
    pub timeout: Duration,
    /// Number of tabs in the pool, which is also how many pages load at once
    pub concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_depth: 5,
            max_pages: 100,
            include_external: false,
            timeout: Duration::from_millis(30_000),
            concurrency: 3,
        }
    }
}

impl CrawlConfig {
    /// Pool size, never zero.
    pub fn pool_size(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// The starting points of a crawl.
#[derive(Debug, Clone)]
pub struct SeedSet {
    base: Url,
    paths: Vec<String>,
}

impl SeedSet {
    pub fn new(base_url: &str) -> Result<Self, CheckError> {
        let base = Url::parse(base_url).map_err(|source| CheckError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(SeedSet {
            base,
            paths: Vec::new(),
        })
    }

    /// Seed set with the built-in documentation entry points.
    pub fn with_default_paths(base_url: &str) -> Result<Self, CheckError> {
        let mut seeds = Self::new(base_url)?;
        seeds.extend(DEFAULT_SEED_PATHS.iter().map(|p| p.to_string()));
        Ok(seeds)
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = String>) {
        self.paths.extend(paths);
    }

    /// Host that decides whether a discovered link is external.
    pub fn origin_host(&self) -> Option<&str> {
        self.base.host_str()
    }

    /// The base URL followed by every extra path, appended verbatim.
    pub fn urls(&self) -> Result<Vec<Url>, CheckError> {
        let base = self.base.as_str().trim_end_matches('/');
        let mut urls = vec![self.base.clone()];

        for path in &self.paths {
            let raw = format!("{}{}", base, path);
            let url = Url::parse(&raw).map_err(|source| CheckError::InvalidUrl {
                url: raw.clone(),
                source,
            })?;
            urls.push(url);
        }

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = CrawlConfig::default();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_pages, 100);
        assert!(!config.include_external);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.concurrency, 3);
    }

    #[test]
    fn test_pool_size_never_zero() {
        let config = CrawlConfig {
            concurrency: 0,
            ..CrawlConfig::default()
        };
        assert_eq!(config.pool_size(), 1);
    }

    #[test]
    fn test_seed_urls_append_paths_to_base() {
        let mut seeds = SeedSet::new("http://localhost:3000").unwrap();
        seeds.extend(vec!["/docs".to_string(), "/docs/intro".to_string()]);

        let urls: Vec<String> = seeds.urls().unwrap().iter().map(|u| u.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:3000/",
                "http://localhost:3000/docs",
                "http://localhost:3000/docs/intro",
            ]
        );
        assert_eq!(seeds.origin_host(), Some("localhost"));
    }

    #[test]
    fn test_default_seed_paths_included() {
        let seeds = SeedSet::with_default_paths(DEFAULT_BASE_URL).unwrap();
        assert_eq!(seeds.urls().unwrap().len(), DEFAULT_SEED_PATHS.len() + 1);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SeedSet::new("not a url"),
            Err(CheckError::InvalidUrl { .. })
        ));
    }
}
