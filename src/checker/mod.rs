// src/checker/mod.rs
// =============================================================================
// This module contains the content-level link checking logic.
//
// Submodules:
// - html: Pulls title, visible text and links out of a loaded page
// - markdown: Validates relative links in Markdown source files
//
// This file (mod.rs) is the module root - it re-exports the public API so
// other modules can write `checker::extract_page()` instead of
// `checker::html::extract_page()`.
// =============================================================================

mod html;
mod markdown;

pub use html::extract_page;
pub use markdown::{check_markdown_links, MarkdownReport};
