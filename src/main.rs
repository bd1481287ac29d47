// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up diagnostic logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code:
//      0 = the check ran (broken links are a normal result)
//      1 = something was broken and --fail-on-broken was given
//      2 = the check itself couldn't run
// =============================================================================

mod browser; // src/browser/ - page loading (tabs, pool)
mod checker; // src/checker/ - HTML and Markdown link extraction
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl limits and seeds
mod console; // src/console.rs - where progress lines go
mod crawl; // src/crawl/ - the crawl loop
mod error; // src/error.rs - error types
mod logging; // src/logging.rs - tracing setup
mod report; // src/report.rs - summary and JSON report
mod sidebar; // src/sidebar.rs - sidebars.ts regeneration

use anyhow::Result;
use browser::HttpBrowser;
use checker::MarkdownReport;
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs, MarkdownArgs};
use console::Console;
use crawl::Crawler;
use report::{CrawlReport, Summary};
use std::path::Path;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "fatal error");
            eprintln!("Fatal error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let console = Console::for_output(cli.json);

    let broken = match &cli.command {
        Commands::Site { crawl } => {
            let report = handle_site_check(crawl, cli.json, &console).await?;
            if cli.json {
                println!("{}", report.to_json()?);
            }
            report.broken_links.len()
        }
        Commands::Markdown { markdown } => {
            let report = handle_markdown_check(markdown, cli.json, &console)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            report.broken.len()
        }
        Commands::All { crawl, markdown } => {
            let site = handle_site_check(crawl, cli.json, &console).await?;
            let markdown = handle_markdown_check(markdown, cli.json, &console)?;
            if cli.json {
                // One document, so stdout stays parseable
                let combined = serde_json::json!({ "site": site, "markdown": markdown });
                println!("{}", serde_json::to_string_pretty(&combined)?);
            }
            site.broken_links.len() + markdown.broken.len()
        }
        Commands::Sidebar {
            docs_dir,
            sidebar_file,
        } => {
            handle_sidebar(docs_dir, sidebar_file)?;
            0
        }
    };

    if cli.fail_on_broken && broken > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Crawls the site, prints the summary (unless the caller wants JSON) and
// writes the report
async fn handle_site_check(args: &CrawlArgs, json: bool, console: &Console) -> Result<CrawlReport> {
    let config = args.config();
    let seeds = args.seeds()?;

    console.line("Launching browser...");
    let browser = HttpBrowser::launch(config.timeout)?;

    let outcome = Crawler::new(browser, config)
        .with_console(console.clone())
        .run(&seeds)
        .await?;
    let report = CrawlReport::from_outcome(&outcome, chrono::Utc::now());

    if !json {
        Summary::from_outcome(&outcome).print();
    }

    report.save(&args.report)?;
    console.line(format!("\nResults saved to {}", args.report.display()));

    if let Some(baseline_path) = &args.baseline {
        match CrawlReport::load(baseline_path) {
            Ok(baseline) => report.compare(&baseline).print(console),
            Err(e) => warn!(error = %e, "could not load baseline report"),
        }
    }

    Ok(report)
}

// Checks the Markdown sources
fn handle_markdown_check(
    args: &MarkdownArgs,
    json: bool,
    console: &Console,
) -> Result<MarkdownReport> {
    console.line("\nChecking Markdown links in content files...");

    let cwd = std::env::current_dir()?;
    let report = checker::check_markdown_links(&args.content_dir, &cwd);
    console.line(format!("Found {} Markdown files", report.files_scanned));

    if !json {
        report.print();
    }

    Ok(report)
}

fn handle_sidebar(docs_dir: &Path, sidebar_file: &Path) -> Result<()> {
    let update = sidebar::update_sidebar(docs_dir, sidebar_file)?;

    for label in &update.replaced {
        println!("  updated {}", label);
    }
    for label in &update.inserted {
        println!("  added {}", label);
    }
    for label in &update.skipped {
        println!("  ⚠️ no place for {} (previous section missing)", label);
    }

    Ok(())
}
