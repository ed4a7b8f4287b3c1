#![forbid(unsafe_code)]

//! Terminal panel cycler.
//!
//! A fixed row of terminal panels, at most one expanded at a time. Panels
//! advance on their own while the visitor is idle and stop for good the
//! first time a panel header is clicked.
//!
//! The cycler is host-driven: it never reads a clock. The host passes
//! monotonic timestamps (measured from startup) to [`PanelCycler::poll`] and
//! schedules its next timer from [`PanelCycler::next_deadline`].
//!
//! # Invariants
//!
//! 1. At most one panel is expanded (`Option<usize>` by construction).
//! 2. Auto-advance visits panels in index order modulo the panel count.
//! 3. After the first click, `poll` never yields an update again.
//! 4. Clicking the expanded panel leaves no panel expanded.

use std::time::Duration;

use crate::config::CyclerConfig;

/// DOM work for one transition.
///
/// The host collapses every panel (clearing inline transition overrides),
/// then, if `expand` is set, forces a layout read so the collapse is
/// committed before the expand class lands, then expands that panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelUpdate {
    pub expand: Option<usize>,
    /// Force a layout read between collapse and expand.
    pub reflow: bool,
}

impl PanelUpdate {
    const fn collapse_all() -> Self {
        Self {
            expand: None,
            reflow: false,
        }
    }

    const fn expand(index: usize) -> Self {
        Self {
            expand: Some(index),
            reflow: true,
        }
    }
}

/// Expand/collapse state for the terminal panels.
#[derive(Debug, Clone)]
pub struct PanelCycler {
    config: CyclerConfig,
    panel_count: usize,
    expanded: Option<usize>,
    auto_index: usize,
    user_clicked: bool,
    next_advance: Option<Duration>,
}

impl PanelCycler {
    /// Create a cycler for `panel_count` panels, all collapsed. The first
    /// auto-advance is due at `config.initial_delay()` on the host clock.
    #[must_use]
    pub fn new(panel_count: usize, config: CyclerConfig) -> Self {
        let next_advance = (panel_count > 0).then(|| config.initial_delay());
        Self {
            config,
            panel_count,
            expanded: None,
            auto_index: 0,
            user_clicked: false,
            next_advance,
        }
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    #[must_use]
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Whether auto-advance is still armed.
    #[must_use]
    pub fn auto_active(&self) -> bool {
        !self.user_clicked && self.next_advance.is_some()
    }

    /// Host time at which the next auto-advance is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.user_clicked {
            None
        } else {
            self.next_advance
        }
    }

    /// Whole milliseconds from `now` to [`Self::next_deadline`], rounded up.
    /// A timer armed for this long fires at or after the deadline.
    #[must_use]
    pub fn timer_delay_ms(&self, now: Duration) -> Option<u64> {
        let delay = self.next_deadline()?.saturating_sub(now);
        let ms = delay.as_nanos().div_ceil(1_000_000);
        Some(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    /// Handle a click on panel `index`'s header.
    ///
    /// Disables auto-advance permanently. Returns `None` for an index outside
    /// the panel set.
    pub fn click(&mut self, index: usize) -> Option<PanelUpdate> {
        if index >= self.panel_count {
            return None;
        }
        if !self.user_clicked {
            tracing::debug!(index, "panel clicked, auto-advance disabled");
        }
        self.user_clicked = true;
        self.next_advance = None;

        if self.expanded == Some(index) {
            self.expanded = None;
            Some(PanelUpdate::collapse_all())
        } else {
            self.expanded = Some(index);
            Some(PanelUpdate::expand(index))
        }
    }

    /// Advance if an auto-advance is due at `now`.
    ///
    /// An early poll yields nothing and leaves the deadline unchanged. After
    /// an advance, the next deadline is `now + interval`.
    pub fn poll(&mut self, now: Duration) -> Option<PanelUpdate> {
        if self.user_clicked || self.panel_count == 0 {
            return None;
        }
        let due = self.next_advance?;
        if now < due {
            return None;
        }

        let index = self.auto_index % self.panel_count;
        self.auto_index = self.auto_index.wrapping_add(1);
        self.expanded = Some(index);
        self.next_advance = Some(now.saturating_add(self.config.interval()));
        tracing::trace!(index, "panel auto-advance");
        Some(PanelUpdate::expand(index))
    }
}
