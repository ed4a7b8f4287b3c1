#![forbid(unsafe_code)]

//! Section router with lazy, single-shot section loading.
//!
//! The router decides; the host applies. [`Router::show_section`] returns a
//! [`Navigation`] describing which section and links to mark active and
//! whether a loader must start. Load bookkeeping lives here rather than in
//! DOM markers:
//!
//! ```text
//! Idle ──show──▶ Loading ──finish(ok)──▶ Loaded
//!                   │
//!                   └──finish(err)──▶ Failed ──show──▶ Loading
//! ```
//!
//! A section that is `Loading` or `Loaded` never starts another load, so two
//! loads of the same section never race. A `Failed` section retries on its
//! next visit.

use std::collections::{BTreeSet, HashMap};

/// Sections whose content is loaded from manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Scripts,
    Projects,
    Blog,
}

impl SectionKind {
    pub const ALL: [Self; 3] = [Self::Scripts, Self::Projects, Self::Blog];

    /// Map a section element id to its loader, if it has one.
    #[must_use]
    pub fn from_section_id(id: &str) -> Option<Self> {
        match id {
            "scripts" => Some(Self::Scripts),
            "projects" => Some(Self::Projects),
            "blog" => Some(Self::Blog),
            _ => None,
        }
    }

    #[must_use]
    pub const fn section_id(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Projects => "projects",
            Self::Blog => "blog",
        }
    }
}

/// Load lifecycle of one dynamic section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    /// Whether a visit in this state starts a load.
    #[must_use]
    pub const fn needs_load(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// What the host must do for one `show_section` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Requested id; nav links whose target equals it become active.
    pub target: String,
    /// Section element to activate. `None` when no section has that id, in
    /// which case every section is deactivated but links still update.
    pub section: Option<String>,
    /// Loader to start, if this visit triggers one.
    pub load: Option<SectionKind>,
}

impl Navigation {
    /// Whether the section element with id `section_id` should be active.
    #[must_use]
    pub fn is_section_active(&self, section_id: &str) -> bool {
        self.section.as_deref() == Some(section_id)
    }

    /// Whether a nav link pointing at `link_target` (its `data-section`)
    /// should be active. Links without a target never are.
    #[must_use]
    pub fn is_link_active(&self, link_target: Option<&str>) -> bool {
        link_target == Some(self.target.as_str())
    }
}

/// Navigation state for the page.
#[derive(Debug, Clone, Default)]
pub struct Router {
    sections: BTreeSet<String>,
    active: Option<String>,
    sidebar_open: bool,
    loads: HashMap<SectionKind, LoadState>,
}

impl Router {
    /// Create a router over the section element ids present on the page.
    #[must_use]
    pub fn new<I, S>(section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: section_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Activate section `id`, close the sidebar, and report any load to start.
    pub fn show_section(&mut self, id: &str) -> Navigation {
        self.sidebar_open = false;

        if !self.sections.contains(id) {
            tracing::debug!(section = id, "no section with this id");
            self.active = None;
            return Navigation {
                target: id.to_string(),
                section: None,
                load: None,
            };
        }

        self.active = Some(id.to_string());
        let load = SectionKind::from_section_id(id).filter(|&kind| {
            let state = self.loads.entry(kind).or_default();
            if state.needs_load() {
                *state = LoadState::Loading;
                true
            } else {
                false
            }
        });
        if let Some(kind) = load {
            tracing::debug!(section = kind.section_id(), "section load started");
        }

        Navigation {
            target: id.to_string(),
            section: Some(id.to_string()),
            load,
        }
    }

    /// Record the outcome of a load started by [`Self::show_section`].
    pub fn finish_load(&mut self, kind: SectionKind, ok: bool) {
        let state = if ok {
            LoadState::Loaded
        } else {
            LoadState::Failed
        };
        tracing::debug!(section = kind.section_id(), ?state, "section load finished");
        self.loads.insert(kind, state);
    }

    #[must_use]
    pub fn load_state(&self, kind: SectionKind) -> LoadState {
        self.loads.get(&kind).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Number of distinct section ids on the page.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Flip the mobile sidebar. Returns the new state.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }
}
