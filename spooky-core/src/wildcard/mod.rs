//! Wildcard matching over namespaced asset codes.
//!
//! Patterns use `*` as the only wildcard token. A `*` matches any run of
//! characters (including none) and freely crosses the `-`, `.` and `:`
//! separators, so `spookynights:spectralbear-*` covers every bear variant.
//! Matching is anchored at both ends and case-sensitive.
//!
//! Rule tables keyed by pattern are [`PatternTable`]s. Lookups walk them in
//! insertion order and the first matching pattern wins; this ordering is part
//! of the config contract, so user files resolve the same way on every run.

mod table;

pub use table::PatternTable;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::constants::BASE_DOMAIN;

/// Full-string glob match of `candidate` against `pattern`.
///
/// Without a `*` this is plain equality. An empty pattern only matches an
/// empty candidate.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == candidate;
    }

    let mut parts = pattern.split('*');
    let head = parts.next().unwrap_or_default();
    let Some(mut rest) = candidate.strip_prefix(head) else {
        return false;
    };

    let segments: Vec<&str> = parts.collect();
    let Some((tail, middle)) = segments.split_last() else {
        return false;
    };

    // Leftmost placement of each literal keeps the most room for the tail
    for literal in middle.iter().filter(|s| !s.is_empty()) {
        match rest.find(literal) {
            Some(idx) => rest = &rest[idx + literal.len()..],
            None => return false,
        }
    }

    rest.ends_with(tail)
}

/// Namespaced asset code (`domain:path`), e.g. `spookynights:spectralwolf-eurasian-adult-male`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetCode {
    pub domain: String,
    pub path: String,
}

impl AssetCode {
    pub fn new(domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path: path.into(),
        }
    }

    /// Parse `domain:path`; a bare path belongs to the base game domain.
    pub fn parse(code: &str) -> Self {
        match code.split_once(':') {
            Some((domain, path)) => Self::new(domain, path),
            None => Self::new(BASE_DOMAIN, code),
        }
    }

    pub fn in_domain(&self, domain: &str) -> bool {
        self.domain == domain
    }

    /// Match against a pattern string the way the host parses patterns:
    /// a pattern without a domain is read as a base game pattern.
    pub fn matches_pattern(&self, pattern: &str) -> bool {
        let (domain, path) = pattern.split_once(':').unwrap_or((BASE_DOMAIN, pattern));
        if !domain.contains('*') {
            return domain == self.domain && matches(path, &self.path);
        }
        // a star in the domain may run across the separator
        matches(pattern, &self.to_string())
    }

    /// Hyphen-separated variant segments of the path
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.path.split('-')
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

impl From<&str> for AssetCode {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl Serialize for AssetCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
