// src/crawl/classify.rs
// =============================================================================
// Deciding whether a loaded page is broken.
//
// Three ways a page can fail:
// 1. HTTP status >= 400
// 2. The page loaded fine (2xx/3xx) but *looks* like an error page: its title
//    or visible text matches one of the fixed patterns below. Static site
//    generators often serve their 404 page with a 200, so status alone misses
//    these.
// 3. Navigation failed outright (timeout, connection refused, ...)
//
// The pattern check is a heuristic. A legitimate page whose title contains
// "Error" will be flagged too.
// =============================================================================

use crate::browser::PageSnapshot;
use crate::error::NavigationError;
use std::fmt;

/// Body text that marks a page as an error page.
pub const BODY_ERROR_PATTERNS: &[&str] = &[
    "Page not found",
    "Error 404",
    "Cannot find",
    "Not Found",
    "The page you were looking for doesn't exist",
];

/// Title text that marks a page as an error page.
pub const TITLE_ERROR_PATTERNS: &[&str] = &["404", "Not Found", "Error", "Page not found"];

/// Why a page ended up in the failure record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    HttpStatus(u16),
    ErrorTitle(String),
    ErrorContent { status: u16 },
    Navigation(NavigationError),
}

/// Summary buckets for the end-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    ConnectionRefused,
    ErrorPage,
    Other,
}

impl FailureReason {
    pub fn category(&self) -> FailureCategory {
        match self {
            FailureReason::Navigation(e) if e.is_connection_refused() => {
                FailureCategory::ConnectionRefused
            }
            FailureReason::ErrorTitle(_) | FailureReason::ErrorContent { .. } => {
                FailureCategory::ErrorPage
            }
            _ => FailureCategory::Other,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::HttpStatus(status) => write!(f, "HTTP status: {}", status),
            FailureReason::ErrorTitle(title) => write!(f, "Page has error in title: \"{}\"", title),
            FailureReason::ErrorContent { status } => {
                write!(f, "Page contains error messages despite {} status", status)
            }
            FailureReason::Navigation(e) => write!(f, "{}", e),
        }
    }
}

/// Links are only followed from pages that didn't fail at the HTTP level.
pub fn should_extract_links(status: u16) -> bool {
    status < 400
}

// Classifies a page that loaded. Returns None for a healthy page.
//
// The status check wins over everything; after that a title match wins over
// a body match (the title makes the more specific report line).
pub fn classify_page(page: &PageSnapshot) -> Option<FailureReason> {
    if !should_extract_links(page.status) {
        return Some(FailureReason::HttpStatus(page.status));
    }

    if TITLE_ERROR_PATTERNS.iter().any(|p| page.title.contains(p)) {
        return Some(FailureReason::ErrorTitle(page.title.clone()));
    }

    if BODY_ERROR_PATTERNS.iter().any(|p| page.body_text.contains(p)) {
        return Some(FailureReason::ErrorContent {
            status: page.status,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: u16, title: &str, body: &str) -> PageSnapshot {
        PageSnapshot {
            status,
            title: title.to_string(),
            body_text: body.to_string(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_healthy_page() {
        assert_eq!(classify_page(&page(200, "Intro | Docs", "Welcome")), None);
    }

    #[test]
    fn test_status_404() {
        let reason = classify_page(&page(404, "Page not found", "Page not found")).unwrap();
        assert_eq!(reason, FailureReason::HttpStatus(404));
        assert_eq!(reason.to_string(), "HTTP status: 404");
        assert_eq!(reason.category(), FailureCategory::Other);
    }

    #[test]
    fn test_body_pattern_with_200() {
        let reason = classify_page(&page(200, "Docs", "Oops. Page not found here.")).unwrap();
        assert_eq!(
            reason.to_string(),
            "Page contains error messages despite 200 status"
        );
        assert_eq!(reason.category(), FailureCategory::ErrorPage);
    }

    #[test]
    fn test_title_wins_over_body() {
        let reason = classify_page(&page(200, "404 | Docs", "Page not found")).unwrap();
        assert_eq!(reason, FailureReason::ErrorTitle("404 | Docs".to_string()));
        assert_eq!(reason.to_string(), "Page has error in title: \"404 | Docs\"");
    }

    #[test]
    fn test_patterns_are_case_sensitive() {
        assert_eq!(classify_page(&page(200, "error handling", "page not found")), None);
    }

    #[test]
    fn test_redirect_status_is_not_a_failure() {
        assert_eq!(classify_page(&page(304, "Docs", "")), None);
        assert!(should_extract_links(399));
        assert!(!should_extract_links(400));
    }

    #[test]
    fn test_connection_refused_category() {
        let reason = FailureReason::Navigation(NavigationError::ConnectionRefused {
            url: "http://localhost:3000/".to_string(),
            message: "refused".to_string(),
        });
        assert_eq!(reason.category(), FailureCategory::ConnectionRefused);

        let other = FailureReason::Navigation(NavigationError::Other("boom".to_string()));
        assert_eq!(other.category(), FailureCategory::Other);
        assert_eq!(other.to_string(), "boom");
    }
}
