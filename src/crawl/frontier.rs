// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: pages we've discovered but not visited yet.
//
// It's a stack (last in, first out), so the crawl goes depth-first: the links
// found on the page we just loaded are the next ones we look at.
//
// Next to the stack we keep a HashSet of the queued URLs, so "is this URL
// already waiting?" is O(1) instead of a scan over the whole stack.
//
// This file also holds link normalization, which decides what a discovered
// link turns into before it's allowed onto the stack.
// =============================================================================

use std::collections::HashSet;
use url::Url;

/// A page waiting to be visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    /// Link hops from the nearest seed (seeds are 0)
    pub depth: usize,
}

#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<FrontierEntry>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a URL unless it's already waiting. Returns true if it was added.
    pub fn push(&mut self, url: Url, depth: usize) -> bool {
        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }
        self.stack.push(FrontierEntry { url, depth });
        true
    }

    /// Takes the most recently pushed entry.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.stack.pop()?;
        self.queued.remove(entry.url.as_str());
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

// Turns a discovered link into the URL we'd queue, or None if we shouldn't
// follow it at all
//
// Rules:
//   - must parse, be http(s), and have a host
//   - off-origin hosts are dropped unless include_external is set
//   - the #fragment is removed, so /docs/x#a and /docs/x#b are the same page
pub fn normalize_link(raw: &str, origin_host: Option<&str>, include_external: bool) -> Option<Url> {
    let mut url = Url::parse(raw).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    let host = url.host_str()?;
    if !include_external && Some(host) != origin_host {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
