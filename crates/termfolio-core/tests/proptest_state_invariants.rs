//! Property-based invariant tests for the page state machines.
//!
//! Verifies:
//! 1. Cycler: at most one panel expanded after any event sequence
//! 2. Cycler: auto-advance visits panels in index order, wrapping
//! 3. Cycler: after the first click, no poll ever changes state
//! 4. Router: each dynamic section starts at most one load while in flight
//!    or loaded
//! 5. Router: only ids present on the page become active
//! 6. Escaping: output never contains raw markup characters

use std::time::Duration;

use proptest::prelude::*;
use termfolio_core::cycler::PanelCycler;
use termfolio_core::escape::escape_html;
use termfolio_core::{CyclerConfig, LoadState, Router, SectionKind};

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum CyclerEvent {
    Poll(u64),
    Click(usize),
}

fn arb_cycler_event() -> impl Strategy<Value = CyclerEvent> {
    prop_oneof![
        3 => (0u64..8_000).prop_map(CyclerEvent::Poll),
        1 => (0usize..6).prop_map(CyclerEvent::Click),
    ]
}

#[derive(Debug, Clone)]
enum RouterEvent {
    Show(&'static str),
    Finish(SectionKind, bool),
}

const IDS: &[&str] = &["home", "scripts", "projects", "blog", "contact", "nowhere"];

fn arb_router_event() -> impl Strategy<Value = RouterEvent> {
    prop_oneof![
        prop::sample::select(IDS).prop_map(RouterEvent::Show),
        (prop::sample::select(SectionKind::ALL.to_vec()), any::<bool>())
            .prop_map(|(kind, ok)| RouterEvent::Finish(kind, ok)),
    ]
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn cycler_state_stays_consistent(
        panels in 0usize..5,
        events in prop::collection::vec(arb_cycler_event(), 0..40),
    ) {
        let mut cycler = PanelCycler::new(panels, CyclerConfig::default());
        let mut now = Duration::ZERO;
        let mut clicked = false;
        for event in events {
            match event {
                CyclerEvent::Poll(step) => {
                    now += Duration::from_millis(step);
                    let update = cycler.poll(now);
                    if clicked {
                        prop_assert_eq!(update, None);
                    }
                }
                CyclerEvent::Click(index) => {
                    if cycler.click(index).is_some() {
                        clicked = true;
                    }
                }
            }
            if let Some(expanded) = cycler.expanded() {
                prop_assert!(expanded < panels);
            }
            if clicked {
                prop_assert!(!cycler.auto_active());
                prop_assert_eq!(cycler.next_deadline(), None);
            }
        }
    }

    #[test]
    fn auto_advance_wraps_in_order(panels in 1usize..6, steps in 1usize..20) {
        let mut cycler = PanelCycler::new(panels, CyclerConfig::default());
        for step in 0..steps {
            let due = cycler.next_deadline().expect("armed");
            let update = cycler.poll(due).expect("advance when due");
            prop_assert_eq!(update.expand, Some(step % panels));
        }
    }

    #[test]
    fn router_never_double_loads(events in prop::collection::vec(arb_router_event(), 0..40)) {
        let mut router = Router::new(["home", "scripts", "projects", "blog", "contact"]);
        for event in events {
            match event {
                RouterEvent::Show(id) => {
                    let before = SectionKind::from_section_id(id).map(|k| router.load_state(k));
                    let nav = router.show_section(id);
                    match before {
                        Some(LoadState::Loading | LoadState::Loaded) => {
                            prop_assert_eq!(nav.load, None);
                        }
                        Some(LoadState::Idle | LoadState::Failed) => {
                            prop_assert_eq!(nav.load, SectionKind::from_section_id(id));
                        }
                        None => prop_assert_eq!(nav.load, None),
                    }
                    prop_assert_eq!(nav.section.is_some(), id != "nowhere");
                    prop_assert_eq!(router.active(), nav.section.as_deref());
                    prop_assert!(!router.sidebar_open());
                }
                RouterEvent::Finish(kind, ok) => {
                    // Hosts only finish loads they started.
                    if router.load_state(kind) == LoadState::Loading {
                        router.finish_load(kind, ok);
                    }
                }
            }
        }
    }

    #[test]
    fn escaped_text_has_no_markup(s in any::<String>()) {
        let escaped = escape_html(&s);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    }
}
