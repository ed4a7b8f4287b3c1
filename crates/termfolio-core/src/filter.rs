#![forbid(unsafe_code)]

//! Script tag filter state.

use core::fmt;

use crate::script_tree::{ScriptTree, Visibility};

/// Filter value meaning "show everything".
pub const ALL: &str = "all";

/// Target of the script filter.
///
/// Tags are matched ASCII case-insensitively, so the value is normalized to
/// lowercase on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    /// Parse a filter button / language tag value. `"all"` (any case) and the
    /// empty string both mean [`TagFilter::All`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Tag(normalize_tag(value))
        }
    }

    /// Value as written on filter buttons (`data-filter`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Tag(tag) => tag,
        }
    }

    /// Whether a filter button carrying `value` should be marked active.
    #[must_use]
    pub fn matches_button(&self, value: &str) -> bool {
        *self == Self::parse(value)
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical form used for tag comparison.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

/// Current filter, persisted across re-renders of the scripts section.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    current: TagFilter,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &TagFilter {
        &self.current
    }

    /// Replace the current filter. Returns `true` if it changed.
    pub fn set(&mut self, filter: TagFilter) -> bool {
        if self.current == filter {
            return false;
        }
        tracing::debug!(from = %self.current, to = %filter, "script filter changed");
        self.current = filter;
        true
    }
}

/// The filter together with the tree it applies to.
///
/// The filter outlives any one tree: when the scripts section re-renders,
/// [`ScriptFilter::replace_tree`] reapplies the current filter to the new
/// rows.
#[derive(Debug, Clone, Default)]
pub struct ScriptFilter {
    state: FilterState,
    tree: Option<ScriptTree>,
}

impl ScriptFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &TagFilter {
        self.state.current()
    }

    #[must_use]
    pub fn tree(&self) -> Option<&ScriptTree> {
        self.tree.as_ref()
    }

    /// Swap in a freshly rendered tree and return its visibility under the
    /// current filter. `None` clears the tree.
    pub fn replace_tree(&mut self, tree: Option<ScriptTree>) -> Option<Visibility> {
        self.tree = tree;
        self.visibility()
    }

    /// Change the filter and return the visibility to apply, if a tree is
    /// loaded.
    pub fn set(&mut self, filter: TagFilter) -> Option<Visibility> {
        self.state.set(filter);
        self.visibility()
    }

    #[must_use]
    pub fn visibility(&self) -> Option<Visibility> {
        self.tree
            .as_ref()
            .map(|tree| tree.visibility(self.state.current()))
    }
}
