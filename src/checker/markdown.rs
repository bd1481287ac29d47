// src/checker/markdown.rs
// =============================================================================
// This module checks relative links in Markdown source files.
//
// No browser, no network: we walk the content directory, pull every
// [text](target) out of each .md/.mdx file, and make sure relative targets
// point at a file that exists.
//
// Extraction is a regex on purpose, not a Markdown parser. It won't see
// reference-style links or links split across lines, and it *will* see
// links inside code blocks.
//
// Rust concepts:
// - Path/PathBuf: Borrowed and owned filesystem paths (like &str/String)
// - LazyLock: A static that's built the first time it's used
// =============================================================================

use regex::Regex;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

/// A link found in a Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    pub text: String,
    pub target: String,
}

/// A relative link whose target doesn't exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenMarkdownLink {
    pub file: String,
    pub link: String,
    pub text: String,
}

/// A link we couldn't check (the existence check itself failed, e.g.
/// permission denied). It is neither valid nor broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnverifiedMarkdownLink {
    pub file: String,
    pub link: String,
    pub error: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownReport {
    pub files_scanned: usize,
    pub broken: Vec<BrokenMarkdownLink>,
    pub unverified: Vec<UnverifiedMarkdownLink>,
}

impl MarkdownReport {
    pub fn print(&self) {
        if self.broken.is_empty() {
            println!("\nNo broken Markdown links found!");
        } else {
            println!("\n=== BROKEN MARKDOWN LINKS ===");
            for link in &self.broken {
                println!("{}: [{}]({})", link.file, link.text, link.link);
            }
        }

        if !self.unverified.is_empty() {
            println!("\n=== UNVERIFIED MARKDOWN LINKS ===");
            for link in &self.unverified {
                println!("{}: {} ({})", link.file, link.link, link.error);
            }
        }
    }
}

/// Outcome of checking one target.
#[derive(Debug)]
enum LinkCheck {
    Valid,
    Broken,
    Unverified(io::Error),
}

// Extracts every [text](target) from Markdown text, in order
pub fn extract_markdown_links(markdown: &str) -> Vec<MarkdownLink> {
    LINK_REGEX
        .captures_iter(markdown)
        .map(|cap| MarkdownLink {
            text: cap[1].to_string(),
            target: cap[2].to_string(),
        })
        .collect()
}

// Helper function to check if a URL is an HTTP/HTTPS link
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Checks one relative link against the directory of the file it's in
fn check_relative_link(base_dir: &Path, target: &str) -> LinkCheck {
    // "#section" and "page.md#section" both lose their anchor here;
    // an empty path means "this page", which always exists
    let path = target.split('#').next().unwrap_or("");
    if path.is_empty() {
        return LinkCheck::Valid;
    }

    existence(base_dir.join(path).try_exists())
}

// A path that runs through a regular file ("b.md/c.md") doesn't resolve
// either; only other errors leave the answer open
fn existence(result: io::Result<bool>) -> LinkCheck {
    match result {
        Ok(true) => LinkCheck::Valid,
        Ok(false) => LinkCheck::Broken,
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            LinkCheck::Broken
        }
        Err(e) => LinkCheck::Unverified(e),
    }
}

/// Recursively collects Markdown files under `dir`, sorted.
pub fn find_markdown_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_markdown_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            collect_markdown_files(&path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
        {
            files.push(path);
        }
    }
    Ok(())
}

// Path of `file` as shown in the report, relative to `display_base` when
// possible, always with forward slashes
fn display_path(file: &Path, display_base: &Path) -> String {
    let relative = file.strip_prefix(display_base).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Checks every relative link in every Markdown file under `content_dir`.
///
/// File paths in the result are relative to `display_base`. A content
/// directory that can't be listed gives an empty report and unreadable files
/// are skipped; both are logged, neither is fatal.
pub fn check_markdown_links(content_dir: &Path, display_base: &Path) -> MarkdownReport {
    let mut report = MarkdownReport::default();

    let files = match find_markdown_files(content_dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(dir = %content_dir.display(), error = %e, "could not list Markdown files");
            eprintln!("Error checking Markdown links: {}", e);
            return report;
        }
    };

    report.files_scanned = files.len();

    for file in &files {
        let content = match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "could not read Markdown file");
                continue;
            }
        };

        let links = extract_markdown_links(&content);
        if links.is_empty() {
            continue;
        }

        let base_dir = file.parent().unwrap_or(Path::new("."));
        let shown = display_path(file, display_base);
        debug!(file = %shown, links = links.len(), "checking Markdown file");

        for link in links {
            if is_http_link(&link.target) {
                continue;
            }

            match check_relative_link(base_dir, &link.target) {
                LinkCheck::Valid => {}
                LinkCheck::Broken => report.broken.push(BrokenMarkdownLink {
                    file: shown.clone(),
                    link: link.target,
                    text: link.text,
                }),
                LinkCheck::Unverified(e) => {
                    warn!(file = %shown, link = %link.target, error = %e, "could not check link");
                    report.unverified.push(UnverifiedMarkdownLink {
                        file: shown.clone(),
                        link: link.target,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_simple_link() {
        let links = extract_markdown_links("Check out [Rust](https://www.rust-lang.org)!");
        assert_eq!(
            links,
            vec![MarkdownLink {
                text: "Rust".to_string(),
                target: "https://www.rust-lang.org".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_multiple_links() {
        let markdown = r#"
# Resources

- [Setup](./setup.md)
- [API](../api/index.md#auth)
- [Docs](https://doc.rust-lang.org/)
        "#;
        let links = extract_markdown_links(markdown);
        let targets: Vec<&str> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(
            targets,
            vec!["./setup.md", "../api/index.md#auth", "https://doc.rust-lang.org/"]
        );
    }

    #[test]
    fn test_reference_style_links_are_not_seen() {
        let markdown = "[ref][1]\n\n[1]: ./b.md";
        assert!(extract_markdown_links(markdown).is_empty());
    }

    #[test]
    fn test_anchor_and_empty_targets_are_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(check_relative_link(dir.path(), "#intro"), LinkCheck::Valid));
        assert!(matches!(check_relative_link(dir.path(), "#"), LinkCheck::Valid));
    }

    #[test]
    fn test_anchor_is_stripped_before_existence_check() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "# B").unwrap();

        assert!(matches!(check_relative_link(dir.path(), "./b.md#section"), LinkCheck::Valid));
        assert!(matches!(check_relative_link(dir.path(), "./c.md#section"), LinkCheck::Broken));
    }

    #[test]
    fn test_path_through_a_file_is_broken() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("b.md"), "# B").unwrap();
        fs::write(root.path().join("a.md"), "[y](./b.md/missing.md)").unwrap();

        let report = check_markdown_links(root.path(), root.path());

        assert_eq!(
            report.broken,
            vec![BrokenMarkdownLink {
                file: "a.md".to_string(),
                link: "./b.md/missing.md".to_string(),
                text: "y".to_string(),
            }]
        );
        assert!(report.unverified.is_empty());
    }

    #[test]
    fn test_check_errors_are_unverified() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(existence(Err(denied)), LinkCheck::Unverified(_)));
        let not_dir = io::Error::from(io::ErrorKind::NotADirectory);
        assert!(matches!(existence(Err(not_dir)), LinkCheck::Broken));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_reported_as_unverified() {
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("loop", root.path().join("loop")).unwrap();
        fs::write(root.path().join("a.md"), "[x](./loop) [y](./missing.md)").unwrap();

        let report = check_markdown_links(root.path(), root.path());

        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].link, "./missing.md");
        assert_eq!(report.unverified.len(), 1);
        assert_eq!(report.unverified[0].file, "a.md");
        assert_eq!(report.unverified[0].link, "./loop");
    }

    #[test]
    fn test_existing_and_missing_links() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("b.md"), "# B").unwrap();
        fs::write(
            docs.join("a.md"),
            "See [x](./b.md), [y](./missing.md) and [z](https://example.com).",
        )
        .unwrap();

        let report = check_markdown_links(root.path(), root.path());

        assert_eq!(report.files_scanned, 2);
        assert_eq!(
            report.broken,
            vec![BrokenMarkdownLink {
                file: "docs/a.md".to_string(),
                link: "./missing.md".to_string(),
                text: "y".to_string(),
            }]
        );
        assert!(report.unverified.is_empty());
    }

    #[test]
    fn test_links_resolve_against_containing_directory() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("guide").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("guide").join("index.md"), "# Guide").unwrap();
        // ../index.md is fine from guide/deep, but index.md at the root isn't
        fs::write(nested.join("page.mdx"), "[up](../index.md) [root](../../index.md)").unwrap();

        let report = check_markdown_links(root.path(), root.path());

        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].file, "guide/deep/page.mdx");
        assert_eq!(report.broken[0].link, "../../index.md");
    }

    #[test]
    fn test_external_links_never_reported() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join("a.md"),
            "[down](http://localhost:1/nothing) [z](https://example.invalid/x)",
        )
        .unwrap();

        let report = check_markdown_links(root.path(), root.path());
        assert!(report.broken.is_empty());
    }

    #[test]
    fn test_non_markdown_files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("notes.txt"), "[x](./missing.md)").unwrap();
        fs::write(root.path().join("a.md"), "no links here").unwrap();

        let files = find_markdown_files(root.path()).unwrap();
        assert_eq!(files, vec![root.path().join("a.md")]);
    }

    #[test]
    fn test_missing_content_dir_is_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        let report = check_markdown_links(&root.path().join("content"), root.path());
        assert_eq!(report, MarkdownReport::default());
    }
}
