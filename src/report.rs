// src/report.rs
// =============================================================================
// Turning a finished crawl into something people (and CI) can read.
//
// Two outputs:
// - Summary: the console breakdown printed at the end of a run
// - CrawlReport: the JSON file written to disk. Keys are sorted (BTreeMap) so
//   two reports from different runs diff cleanly, and a previous report can
//   be loaded back to see what broke or got fixed since.
//
// The JSON shape:
//   {
//     "checkedPages": { "<url>": <status>, ... },
//     "brokenLinks":  { "<url>": "<reason>", ... },
//     "pageDepths":   { "<url>": <depth>, ... },
//     "timestamp":    "2024-05-01T12:00:00.000Z"
//   }
// =============================================================================

use crate::console::Console;
use crate::crawl::{CrawlOutcome, FailureCategory};
use crate::error::CheckError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub checked_pages: BTreeMap<String, u16>,
    pub broken_links: BTreeMap<String, String>,
    /// Depth each page was first reached at. Older reports don't have it.
    #[serde(default)]
    pub page_depths: BTreeMap<String, usize>,
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
}

impl CrawlReport {
    pub fn from_outcome(outcome: &CrawlOutcome, at: DateTime<Utc>) -> Self {
        CrawlReport {
            checked_pages: outcome.visited.clone(),
            broken_links: outcome
                .failures
                .iter()
                .map(|(url, reason)| (url.clone(), reason.to_string()))
                .collect(),
            page_depths: outcome.depths.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CheckError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| CheckError::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let json = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// What changed relative to an earlier report.
    pub fn compare(&self, baseline: &CrawlReport) -> ReportDiff {
        let newly_broken = self
            .broken_links
            .keys()
            .filter(|url| !baseline.broken_links.contains_key(*url))
            .cloned()
            .collect();

        // Only count a link as fixed if we actually looked at it this time
        let fixed = baseline
            .broken_links
            .keys()
            .filter(|url| !self.broken_links.contains_key(*url))
            .filter(|url| self.checked_pages.contains_key(*url))
            .cloned()
            .collect();

        ReportDiff {
            newly_broken,
            fixed,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportDiff {
    pub newly_broken: Vec<String>,
    pub fixed: Vec<String>,
}

impl ReportDiff {
    pub fn print(&self, console: &Console) {
        console.line("\n=== CHANGES SINCE BASELINE ===");
        if self.newly_broken.is_empty() && self.fixed.is_empty() {
            console.line("No changes");
            return;
        }
        for url in &self.newly_broken {
            console.line(format!("  + broken: {}", url));
        }
        for url in &self.fixed {
            console.line(format!("  - fixed:  {}", url));
        }
    }
}

/// The end-of-run breakdown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_pages: usize,
    pub broken: usize,
    pub skipped_for_depth: usize,
    pub connection_errors: Vec<(String, String)>,
    pub error_message_pages: Vec<(String, String)>,
    pub other_errors: Vec<(String, String)>,
    pub bad_status_pages: Vec<(String, u16)>,
}

impl Summary {
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut summary = Summary {
            total_pages: outcome.visited.len(),
            broken: outcome.failures.len(),
            skipped_for_depth: outcome.skipped_depth.len(),
            ..Summary::default()
        };

        for (url, reason) in &outcome.failures {
            let entry = (url.clone(), reason.to_string());
            match reason.category() {
                FailureCategory::ConnectionRefused => summary.connection_errors.push(entry),
                FailureCategory::ErrorPage => summary.error_message_pages.push(entry),
                FailureCategory::Other => summary.other_errors.push(entry),
            }
        }

        summary.bad_status_pages = outcome
            .visited
            .iter()
            .filter(|(_, status)| **status >= 400)
            .map(|(url, status)| (url.clone(), *status))
            .collect();

        summary
    }

    pub fn print(&self) {
        println!("\n=== SUMMARY ===");
        println!("Total pages checked: {}", self.total_pages);
        println!("Broken links: {}", self.broken);
        if self.skipped_for_depth > 0 {
            println!("Skipped (max depth): {}", self.skipped_for_depth);
        }

        print_section("CONNECTION ERRORS", &self.connection_errors);
        print_section("PAGES WITH ERROR MESSAGES", &self.error_message_pages);
        print_section("OTHER ERRORS", &self.other_errors);

        if !self.bad_status_pages.is_empty() {
            println!("\n=== PAGES WITH BAD STATUS ===");
            for (url, status) in &self.bad_status_pages {
                println!("{}: {}", url, status);
            }
        }
    }
}

fn print_section(title: &str, entries: &[(String, String)]) {
    if entries.is_empty() {
        return;
    }
    println!("\n=== {} ===", title);
    for (url, reason) in entries {
        println!("{}: {}", url, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::FailureReason;
    use crate::error::NavigationError;
    use chrono::TimeZone;

    fn outcome() -> CrawlOutcome {
        let mut outcome = CrawlOutcome::default();
        outcome.visited.insert("http://localhost:3000/".to_string(), 200);
        outcome.visited.insert("http://localhost:3000/gone".to_string(), 404);
        outcome.visited.insert("http://localhost:3000/soft".to_string(), 200);
        outcome.depths.insert("http://localhost:3000/".to_string(), 0);
        outcome
            .skipped_depth
            .insert("http://localhost:3000/deep".to_string());

        outcome.failures.insert(
            "http://localhost:3000/gone".to_string(),
            FailureReason::HttpStatus(404),
        );
        outcome.failures.insert(
            "http://localhost:3000/soft".to_string(),
            FailureReason::ErrorContent { status: 200 },
        );
        outcome.failures.insert(
            "http://localhost:3000/down".to_string(),
            FailureReason::Navigation(NavigationError::ConnectionRefused {
                url: "http://localhost:3000/down".to_string(),
                message: "Connection refused".to_string(),
            }),
        );
        outcome
    }

    #[test]
    fn test_report_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = CrawlReport::from_outcome(&outcome(), at);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["checkedPages"]["http://localhost:3000/gone"], 404);
        assert_eq!(json["brokenLinks"]["http://localhost:3000/gone"], "HTTP status: 404");
        assert_eq!(json["brokenLinks"].as_object().unwrap().len(), 3);
        assert_eq!(json["pageDepths"]["http://localhost:3000/"], 0);
    }

    #[test]
    fn test_report_without_depths_still_loads() {
        let json = r#"{
            "checkedPages": { "http://localhost:3000/": 200 },
            "brokenLinks": {},
            "timestamp": "2024-05-01T12:00:00.000Z"
        }"#;
        let report: CrawlReport = serde_json::from_str(json).unwrap();
        assert!(report.page_depths.is_empty());
        assert_eq!(report.checked_pages.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("link-check-results.json");
        let report = CrawlReport::from_outcome(&outcome(), Utc::now());

        report.save(&path).unwrap();
        assert_eq!(CrawlReport::load(&path).unwrap(), report);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CrawlReport::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }

    #[test]
    fn test_compare_with_baseline() {
        let at = Utc::now();
        let current = CrawlReport::from_outcome(&outcome(), at);

        let mut previous = current.clone();
        previous.broken_links.remove("http://localhost:3000/soft");
        previous
            .broken_links
            .insert("http://localhost:3000/".to_string(), "HTTP status: 500".to_string());
        previous
            .broken_links
            .insert("http://localhost:3000/unseen".to_string(), "HTTP status: 500".to_string());

        let diff = current.compare(&previous);
        assert_eq!(diff.newly_broken, vec!["http://localhost:3000/soft"]);
        assert_eq!(diff.fixed, vec!["http://localhost:3000/"]);

        let lines = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        diff.print(&Console::Captured(lines.clone()));
        assert!(lines
            .lock()
            .unwrap()
            .contains(&"  + broken: http://localhost:3000/soft".to_string()));
    }

    #[test]
    fn test_summary_buckets() {
        let summary = Summary::from_outcome(&outcome());

        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.broken, 3);
        assert_eq!(summary.skipped_for_depth, 1);
        assert_eq!(summary.connection_errors.len(), 1);
        assert_eq!(summary.error_message_pages.len(), 1);
        assert_eq!(
            summary.other_errors,
            vec![(
                "http://localhost:3000/gone".to_string(),
                "HTTP status: 404".to_string()
            )]
        );
        assert_eq!(
            summary.bad_status_pages,
            vec![("http://localhost:3000/gone".to_string(), 404)]
        );
    }
}
