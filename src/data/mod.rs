//! Core data models for contest schedules
//!
//! This module contains the contest and result types shared by the fetcher,
//! normalizer, view filter and cache, plus the set of supported platforms.

pub mod clist;
pub mod filter;
pub mod normalize;

pub use clist::{ClistClient, ContestSource, FetchError};
pub use filter::filter_by_platform;
pub use normalize::{normalize, sort_contests};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single contest as reported by the upstream listing API
///
/// Fields this crate does not interpret are kept in `extra` and written back
/// unchanged when the contest is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    /// Platform name as reported upstream (e.g. "Codeforces")
    #[serde(default)]
    pub platform: String,
    /// Contest title
    #[serde(default)]
    pub name: String,
    /// When the contest starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the contest ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Link to the contest page
    #[serde(default)]
    pub url: String,
    /// Upstream fields passed through opaquely
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A snapshot of ongoing and upcoming contests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestResult {
    /// Contests currently running, later-ending first
    #[serde(default)]
    pub ongoing: Vec<Contest>,
    /// Contests not yet started, soonest first
    #[serde(default)]
    pub upcoming: Vec<Contest>,
    /// When this snapshot was produced
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ContestResult {
    /// Total number of contests in both sequences
    pub fn len(&self) -> usize {
        self.ongoing.len() + self.upcoming.len()
    }

    /// True when neither sequence holds a contest
    pub fn is_empty(&self) -> bool {
        self.ongoing.is_empty() && self.upcoming.is_empty()
    }
}

/// Contest-hosting sites covered by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Codeforces,
    Codechef,
    Spoj,
    Hackerrank,
    Leetcode,
}

impl Platform {
    /// Returns all supported platforms in upstream query order
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Codeforces,
            Platform::Codechef,
            Platform::Spoj,
            Platform::Hackerrank,
            Platform::Leetcode,
        ]
    }

    /// Lower-case identifier used for filtering
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Spoj => "spoj",
            Platform::Hackerrank => "hackerrank",
            Platform::Leetcode => "leetcode",
        }
    }

    /// Hostname the upstream API uses for this platform
    pub fn host(&self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces.com",
            Platform::Codechef => "codechef.com",
            Platform::Spoj => "spoj.com",
            Platform::Hackerrank => "hackerrank.com",
            Platform::Leetcode => "leetcode.com",
        }
    }

    /// Parses a platform identifier, case-insensitively
    pub fn from_str(s: &str) -> Option<Platform> {
        let s = s.to_lowercase();
        Platform::all().iter().copied().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
