//! Domain types providing compile-time safety and self-documentation
//!
//! These small value types replace the bare integers and strings that the
//! wire format uses, so that a level index can't be passed where a frame
//! offset is expected and a profiler tag can't be misspelled at a call site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to one frame tuple: `(level, offset)` inside that level.
///
/// A hit-test that finds nothing returns `None` rather than a sentinel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRef {
    pub level: usize,
    pub offset: usize,
}

impl FrameRef {
    #[must_use]
    pub fn new(level: usize, offset: usize) -> Self {
        Self { level, offset }
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}#{}", self.level, self.offset)
    }
}

/// Stack-trace convention of the profiler that produced the frame labels
///
/// Selects the package-name extraction pattern. Tags without a dedicated
/// pattern are kept verbatim in `Other` and use the default pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SpyName {
    PySpy,
    RbSpy,
    GoSpy,
    Other(String),
}

impl Default for SpyName {
    fn default() -> Self {
        SpyName::Other(String::new())
    }
}

impl From<&str> for SpyName {
    fn from(tag: &str) -> Self {
        match tag {
            "pyspy" => SpyName::PySpy,
            "rbspy" => SpyName::RbSpy,
            "gospy" => SpyName::GoSpy,
            other => SpyName::Other(other.to_string()),
        }
    }
}

impl From<String> for SpyName {
    fn from(tag: String) -> Self {
        SpyName::from(tag.as_str())
    }
}

impl fmt::Display for SpyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpyName::PySpy => f.write_str("pyspy"),
            SpyName::RbSpy => f.write_str("rbspy"),
            SpyName::GoSpy => f.write_str("gospy"),
            SpyName::Other(tag) if tag.is_empty() => f.write_str("unknown"),
            SpyName::Other(tag) => f.write_str(tag),
        }
    }
}

/// Which panes the front-end shows. Purely cosmetic for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Table,
    Graph,
    #[default]
    Both,
}

impl ViewMode {
    /// Next mode in the `both → graph → table` cycle used by the toggle key
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            ViewMode::Both => ViewMode::Graph,
            ViewMode::Graph => ViewMode::Table,
            ViewMode::Table => ViewMode::Both,
        }
    }

    #[must_use]
    pub fn shows_graph(self) -> bool {
        matches!(self, ViewMode::Graph | ViewMode::Both)
    }

    #[must_use]
    pub fn shows_table(self) -> bool {
        matches!(self, ViewMode::Table | ViewMode::Both)
    }
}

/// Sort key forwarded to the table collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Name,
    #[default]
    #[serde(rename = "self")]
    SelfTicks,
    Total,
}

impl SortBy {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            SortBy::SelfTicks => SortBy::Total,
            SortBy::Total => SortBy::Name,
            SortBy::Name => SortBy::SelfTicks,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Name => f.write_str("name"),
            SortBy::SelfTicks => f.write_str("self"),
            SortBy::Total => f.write_str("total"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_name_from_tag() {
        assert_eq!(SpyName::from("pyspy"), SpyName::PySpy);
        assert_eq!(SpyName::from("rbspy"), SpyName::RbSpy);
        assert_eq!(SpyName::from("gospy"), SpyName::GoSpy);
        assert_eq!(SpyName::from("ebpfspy"), SpyName::Other("ebpfspy".to_string()));
    }

    #[test]
    fn test_spy_name_deserializes_unknown_tag() {
        let spy: SpyName = serde_json::from_str("\"phpspy\"").unwrap();
        assert_eq!(spy.to_string(), "phpspy");
    }

    #[test]
    fn test_view_mode_cycle_returns_to_start() {
        let start = ViewMode::default();
        assert_eq!(start.next().next().next(), start);
        assert!(ViewMode::Both.shows_graph() && ViewMode::Both.shows_table());
        assert!(!ViewMode::Table.shows_graph());
    }

    #[test]
    fn test_sort_defaults_match_table_defaults() {
        assert_eq!(SortBy::default().to_string(), "self");
        assert_eq!(SortDirection::default().to_string(), "desc");
    }
}
