// src/sidebar.rs
// =============================================================================
// Regenerates the docs sidebar (sidebars.ts) from what's on disk.
//
// How it works:
// 1. Scan docs/components, docs/architecture, docs/deployment, docs/security
//    and docs/api for Markdown files
// 2. Render each section's items as a JS array literal
// 3. Replace the matching `{ type: 'category', label: '...', items: [...] },`
//    block in sidebars.ts, or insert it after the previous section's block
//    if it isn't there yet
//
// This is text rewriting with regexes, not a TypeScript parser. A block ends
// at the first `],` followed by `},`. Nested categories rendered by serde end
// in `]` then `}` with no comma in between, so that pair only ever closes the
// top-level section.
// =============================================================================

use crate::error::CheckError;
use regex::{Captures, Regex};
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// One entry in a sidebar: a doc id, or a nested category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SidebarItem {
    Doc(String),
    Category(Category),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    #[serde(rename = "type")]
    kind: &'static str,
    pub label: String,
    pub items: Vec<SidebarItem>,
}

impl SidebarItem {
    pub fn doc(id: impl Into<String>) -> Self {
        SidebarItem::Doc(id.into())
    }

    pub fn category(label: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        SidebarItem::Category(Category {
            kind: "category",
            label: label.into(),
            items,
        })
    }
}

/// A top-level sidebar category generated from one docs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarSection {
    pub label: &'static str,
    pub items: Vec<SidebarItem>,
}

// (label, directory under docs/), in sidebar order after Components.
// The directory name doubles as the doc id prefix.
const PLAIN_SECTIONS: &[(&str, &str)] = &[
    ("Architecture", "architecture"),
    ("Deployment", "deployment"),
    ("Security", "security"),
    ("API Reference", "api"),
];

// Optional per-component pages, in the order they appear
const COMPONENT_PAGES: &[&str] = &["api", "configuration", "architecture", "storage-adapters"];

/// What `update_sidebar` did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SidebarUpdate {
    pub replaced: Vec<&'static str>,
    pub inserted: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Scans `docs_dir` and rewrites `sidebar_file` in place.
pub fn update_sidebar(docs_dir: &Path, sidebar_file: &Path) -> Result<SidebarUpdate, CheckError> {
    let content =
        std::fs::read_to_string(sidebar_file).map_err(|e| CheckError::io(sidebar_file, e))?;

    let sections = scan_docs(docs_dir).map_err(|e| CheckError::io(docs_dir, e))?;
    let (updated, summary) = rewrite_sidebar(&content, &sections)?;

    std::fs::write(sidebar_file, updated).map_err(|e| CheckError::io(sidebar_file, e))?;
    println!(
        "Successfully updated sidebar configuration in {}",
        sidebar_file.display()
    );

    Ok(summary)
}

/// Builds every section, Components first. Missing directories give empty
/// sections.
pub fn scan_docs(docs_dir: &Path) -> io::Result<Vec<SidebarSection>> {
    let mut sections = vec![SidebarSection {
        label: "Components",
        items: component_items(&docs_dir.join("components"))?,
    }];

    for &(label, dir) in PLAIN_SECTIONS {
        sections.push(SidebarSection {
            label,
            items: section_items(&docs_dir.join(dir), dir)?,
        });
    }

    Ok(sections)
}

// Top-level .md files first (sorted), then one category per subdirectory
fn section_items(dir: &Path, prefix: &str) -> io::Result<Vec<SidebarItem>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut items: Vec<SidebarItem> = markdown_stems(dir)?
        .into_iter()
        .map(|stem| SidebarItem::doc(format!("{}/{}", prefix, stem)))
        .collect();

    for subdir in subdirectories(dir)? {
        let docs: Vec<SidebarItem> = markdown_stems(&dir.join(&subdir))?
            .into_iter()
            .map(|stem| SidebarItem::doc(format!("{}/{}/{}", prefix, subdir, stem)))
            .collect();

        if !docs.is_empty() {
            items.push(SidebarItem::category(capitalize(&subdir), docs));
        }
    }

    Ok(items)
}

fn component_items(dir: &Path) -> io::Result<Vec<SidebarItem>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    for component in subdirectories(dir)? {
        let component_dir = dir.join(&component);
        let mut pages = vec![SidebarItem::doc(format!("components/{}/overview", component))];

        for page in COMPONENT_PAGES {
            if component_dir.join(format!("{}.md", page)).exists() {
                pages.push(SidebarItem::doc(format!("components/{}/{}", component, page)));
            }
        }

        let examples_dir = component_dir.join("examples");
        if examples_dir.is_dir() {
            let examples: Vec<SidebarItem> = markdown_stems(&examples_dir)?
                .into_iter()
                .map(|stem| SidebarItem::doc(format!("components/{}/examples/{}", component, stem)))
                .collect();
            if !examples.is_empty() {
                pages.push(SidebarItem::category("Examples", examples));
            }
        }

        items.push(SidebarItem::category(capitalize(&component), pages));
    }

    Ok(items)
}

// Sorted stems of the .md files directly inside `dir`
fn markdown_stems(dir: &Path) -> io::Result<Vec<String>> {
    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(stem) = name.strip_suffix(".md") {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

fn subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// JSON with a six-space indent, then single quotes, so it reads like the
// hand-written parts of sidebars.ts
fn render_items(items: &[SidebarItem]) -> Result<String, CheckError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"      ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buf).replace('"', "'"))
}

fn render_section(section: &SidebarSection) -> Result<String, CheckError> {
    Ok(format!(
        "{{\n      type: 'category',\n      label: '{}',\n      items: {},\n    }},",
        section.label,
        render_items(&section.items)?
    ))
}

// Matches a whole `{ type: 'category', label: '<label>', items: [...] },`
fn block_regex(label: &str) -> Regex {
    let pattern = format!(
        r"(\{{\s*type:\s*'category',\s*label:\s*'{}',\s*items:\s*\[[\s\S]*?\],\s*\}},)",
        regex::escape(label)
    );
    // The pattern is built from an escaped label, so it always compiles
    Regex::new(&pattern).unwrap()
}

/// Applies every non-empty section to `content`.
pub fn rewrite_sidebar(
    content: &str,
    sections: &[SidebarSection],
) -> Result<(String, SidebarUpdate), CheckError> {
    let mut updated = content.to_string();
    let mut summary = SidebarUpdate::default();

    for (index, section) in sections.iter().enumerate() {
        if section.items.is_empty() {
            debug!(label = section.label, "no docs for section");
            continue;
        }

        let rendered = render_section(section)?;
        let block = block_regex(section.label);

        if block.is_match(&updated) {
            updated = block
                .replacen(&updated, 1, |_: &Captures| rendered.clone())
                .into_owned();
            summary.replaced.push(section.label);
            continue;
        }

        // The new block goes right after the whole previous block
        let previous = index.checked_sub(1).map(|i| sections[i].label);
        let anchor = previous.map(block_regex);

        match anchor {
            Some(anchor) if anchor.is_match(&updated) => {
                updated = anchor
                    .replacen(&updated, 1, |caps: &Captures| {
                        format!("{}\n    {}", &caps[1], rendered)
                    })
                    .into_owned();
                summary.inserted.push(section.label);
            }
            _ => {
                warn!(label = section.label, "no place to put section in sidebar");
                summary.skipped.push(section.label);
            }
        }
    }

    Ok((updated, summary))
}
