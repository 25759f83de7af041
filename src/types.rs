// src/types.rs

use std::fmt;

use serde::Deserialize;
use tracing::warn;

/// How specifications are handed out to execution streams.
///
/// - `Eager`: the full list is split into one fixed bucket per stream before
///   any worker starts.
/// - `Lazy`: every stream pulls the next unclaimed spec from one shared
///   cursor until the collection is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Strategy {
    #[default]
    Eager,
    Lazy,
}

impl Strategy {
    pub const EAGER: &'static str = "eager";
    pub const LAZY: &'static str = "lazy";

    /// Resolve a raw setting into a strategy.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Any
    /// other value, including the empty string, resolves to [`Strategy::Eager`].
    /// This never fails.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            Self::LAZY => Strategy::Lazy,
            Self::EAGER | "" => Strategy::Eager,
            other => {
                warn!(
                    strategy = %other,
                    "unrecognised distribution strategy; falling back to eager"
                );
                Strategy::Eager
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Eager => Self::EAGER,
            Strategy::Lazy => Self::LAZY,
        }
    }
}

impl From<String> for Strategy {
    fn from(raw: String) -> Self {
        Strategy::parse_or_default(&raw)
    }
}

impl From<Option<&str>> for Strategy {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Strategy::parse_or_default).unwrap_or_default()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
