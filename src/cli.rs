// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
//   site      crawl the running docs site
//   markdown  check relative links in the Markdown sources
//   all       both of the above, one after the other
//   sidebar   regenerate sidebars.ts from the docs directory
// =============================================================================

use crate::config::{
    CrawlConfig, SeedSet, DEFAULT_BASE_URL, DEFAULT_CONTENT_DIR, DEFAULT_REPORT_PATH,
};
use crate::error::CheckError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "docs-link-check",
    version,
    about = "Crawl a documentation site and its Markdown sources for broken links",
    long_about = "docs-link-check crawls a locally running documentation site, flags pages that \
                  fail or look like error pages, and checks relative links in the Markdown \
                  sources. Finding broken links is a normal result: the exit status only \
                  reports whether the check itself ran, unless --fail-on-broken is given."
)]
pub struct Cli {
    /// Print results as JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Exit with status 1 when anything broken was found (for CI)
    #[arg(long, global = true)]
    pub fail_on_broken: bool,

    /// Show debug logging on stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the site and report broken pages
    ///
    /// Example: docs-link-check site --base-url http://localhost:3000 --max-depth 3
    Site {
        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Check relative links in Markdown files
    ///
    /// Example: docs-link-check markdown --content-dir content
    Markdown {
        #[command(flatten)]
        markdown: MarkdownArgs,
    },

    /// Crawl the site, then check the Markdown sources
    All {
        #[command(flatten)]
        crawl: CrawlArgs,

        #[command(flatten)]
        markdown: MarkdownArgs,
    },

    /// Regenerate the sidebar configuration from the docs directory
    Sidebar {
        /// Directory holding components/, architecture/, deployment/, ...
        #[arg(long, default_value = "docs")]
        docs_dir: PathBuf,

        /// Sidebar file to rewrite in place
        #[arg(long, default_value = "sidebars.ts")]
        sidebar_file: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Root of the site; its host decides which links are "external"
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Extra seed path appended to the base URL (repeatable)
    #[arg(long = "seed", value_name = "PATH")]
    pub seeds: Vec<String>,

    /// Don't add the built-in documentation entry points as seeds
    #[arg(long)]
    pub no_default_seeds: bool,

    /// Pages deeper than this many links from a seed are skipped
    #[arg(long, default_value_t = CrawlConfig::default().max_depth)]
    pub max_depth: usize,

    /// Stop after this many pages
    #[arg(long, default_value_t = CrawlConfig::default().max_pages)]
    pub max_pages: usize,

    /// Also follow links to other hosts
    #[arg(long)]
    pub include_external: bool,

    /// Per-page navigation timeout in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Number of tabs, i.e. pages loaded at once
    #[arg(long, default_value_t = CrawlConfig::default().concurrency)]
    pub concurrency: usize,

    /// Where to write the JSON report
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    pub report: PathBuf,

    /// Previous report to compare against
    #[arg(long)]
    pub baseline: Option<PathBuf>,
}

impl CrawlArgs {
    pub fn config(&self) -> CrawlConfig {
        CrawlConfig {
            max_depth: self.max_depth,
            max_pages: self.max_pages,
            include_external: self.include_external,
            timeout: Duration::from_millis(self.timeout_ms),
            concurrency: self.concurrency,
        }
    }

    pub fn seeds(&self) -> Result<SeedSet, CheckError> {
        let mut seeds = if self.no_default_seeds {
            SeedSet::new(&self.base_url)?
        } else {
            SeedSet::with_default_paths(&self.base_url)?
        };
        seeds.extend(self.seeds.iter().cloned());
        Ok(seeds)
    }
}

#[derive(Args, Debug, Clone)]
pub struct MarkdownArgs {
    /// Root of the Markdown sources
    #[arg(long, default_value = DEFAULT_CONTENT_DIR)]
    pub content_dir: PathBuf,
}
