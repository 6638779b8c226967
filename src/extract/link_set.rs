// src/extract/link_set.rs
// =============================================================================
// LinkSet: the result of extraction.
//
// Two rules:
// - No duplicates, comparing the full URL string case-insensitively
//   (so http://x.com/a and HTTP://X.COM/A count as the same link)
// - Iteration order is the order links were first seen in the document
//
// A HashSet answers "seen before?", a Vec keeps the order.
// =============================================================================

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: Vec<Url>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds `url` unless an equal one (ignoring case) is already present.
    // Returns true if it was added.
    pub fn insert(&mut self, url: Url) -> bool {
        let key = url.as_str().to_lowercase();
        if !self.seen.insert(key) {
            return false;
        }
        self.links.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(&url.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.links.iter()
    }

    // The links as plain strings, in first-seen order
    pub fn to_strings(&self) -> Vec<String> {
        self.links.iter().map(|u| u.as_str().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Url;
    type IntoIter = std::slice::Iter<'a, Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl IntoIterator for LinkSet {
    type Item = Url;
    type IntoIter = std::vec::IntoIter<Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

// Serialized as a plain JSON array of URL strings
impl Serialize for LinkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.links.iter().map(Url::as_str))
    }
}
