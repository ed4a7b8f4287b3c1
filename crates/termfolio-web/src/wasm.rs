#![forbid(unsafe_code)]

//! DOM adapter: owns the page, applies core decisions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use termfolio_core::cycler::{PanelCycler, PanelUpdate};
use termfolio_core::script_tree::{
    HIDDEN_CLASS, NODE_ATTR, OPEN_CLASS, TOGGLE_ATTR, TOGGLE_HIDE, TOGGLE_VIEW,
};
use termfolio_core::{
    LoadState, Router, ScriptFilter, SectionKind, SiteConfig, TagFilter, Visibility, loader,
};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlFormElement, Window};
use web_time::Instant;

use crate::console;
use crate::dom;
use crate::fetch::WebSource;

const ACTIVE_CLASS: &str = "active";
const EXPANDED_CLASS: &str = "expanded";
/// Inline overrides left on `.to` targets by the entry animation.
const TRANSITION_OVERRIDES: &[&str] = &["opacity", "transform", "transition-delay"];

/// Resolves when a section load has injected its markup.
type LoadSignal = Shared<LocalBoxFuture<'static, ()>>;

/// Start the site behavior layer.
///
/// `options` is an optional plain object deserialized into [`SiteConfig`];
/// omitted fields keep their defaults. An invalid object is logged and
/// ignored.
#[wasm_bindgen]
pub fn start(options: Option<JsValue>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let parsed = read_options(options);
    let config = parsed.as_ref().cloned().unwrap_or_default();
    console::install(&config);
    if let Err(err) = &parsed {
        warn!(error = %err, "invalid start options, using defaults");
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let site = Rc::new(Site::new(window, document, config));
    site.bind()?;
    site.schedule_cycler();
    info!(
        sections = site.router.borrow().section_count(),
        panels = site.panels.len(),
        "site started"
    );
    Ok(())
}

fn read_options(options: Option<JsValue>) -> Result<SiteConfig, String> {
    let Some(value) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(SiteConfig::default());
    };
    let json = js_sys::JSON::stringify(&value).map_err(|err| format!("{err:?}"))?;
    SiteConfig::from_json(&String::from(json)).map_err(|err| err.to_string())
}

struct Site {
    config: SiteConfig,
    window: Window,
    document: Document,
    source: WebSource,
    started: Instant,
    panels: Vec<Element>,
    router: RefCell<Router>,
    cycler: RefCell<PanelCycler>,
    scripts: RefCell<ScriptFilter>,
    pending: RefCell<HashMap<SectionKind, LoadSignal>>,
}

impl Site {
    fn new(window: Window, document: Document, config: SiteConfig) -> Self {
        let section_ids = dom::query_all(&document, ".section")
            .into_iter()
            .map(|section| section.id())
            .filter(|id| !id.is_empty());
        let router = Router::new(section_ids);
        let panels = dom::query_all(&document, ".term-panel");
        let cycler = PanelCycler::new(panels.len(), config.cycler.clone());
        Self {
            source: WebSource::new(window.clone()),
            started: Instant::now(),
            router: RefCell::new(router),
            cycler: RefCell::new(cycler),
            scripts: RefCell::new(ScriptFilter::new()),
            pending: RefCell::new(HashMap::new()),
            panels,
            config,
            window,
            document,
        }
    }

    // ---- event wiring ----

    fn bind(self: &Rc<Self>) -> Result<(), JsValue> {
        let site = Rc::clone(self);
        let on_click = Closure::<dyn FnMut(_)>::new(move |event: Event| site.on_click(&event));
        self.document
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        if let Some(form) = self.document.get_element_by_id("contact-form") {
            let form: HtmlFormElement = form.dyn_into()?;
            let site = Rc::clone(self);
            let target = form.clone();
            let on_submit = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                event.prevent_default();
                site.acknowledge_contact(&target);
            });
            form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
            on_submit.forget();
        }
        Ok(())
    }

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };

        // Skill tags carry `data-section` too; they go through the bridge.
        if let Some(tag) = dom::closest(&target, ".tag-lang") {
            if let Some(lang) = tag.get_attribute("data-lang") {
                self.filter_from_skill(lang);
            }
            return;
        }
        if let Some(link) = dom::closest(&target, "[data-section]") {
            event.prevent_default();
            if let Some(id) = link.get_attribute("data-section") {
                self.show_section(&id);
            }
            return;
        }
        if dom::closest(&target, "#hamburger").is_some() {
            self.toggle_sidebar();
            return;
        }
        if let Some(bar) = dom::closest(&target, ".term-bar") {
            self.click_panel(&bar);
            return;
        }
        if let Some(button) = dom::closest(&target, ".filter-btn[data-filter]") {
            let value = button.get_attribute("data-filter").unwrap_or_default();
            self.set_filter(TagFilter::parse(&value));
            return;
        }
        if let Some(header) = dom::closest(&target, &format!("[{TOGGLE_ATTR}]")) {
            match header.get_attribute(TOGGLE_ATTR).as_deref() {
                Some("script") => toggle_script(&header),
                Some("group") => toggle_group(&header),
                _ => {}
            }
        }
    }

    // ---- navigation ----

    /// Activate section `id`. Returns the completion signal of the section's
    /// load while one is in flight.
    fn show_section(self: &Rc<Self>, id: &str) -> Option<LoadSignal> {
        let nav = self.router.borrow_mut().show_section(id);

        for section in dom::query_all(&self.document, ".section") {
            dom::set_class(&section, ACTIVE_CLASS, nav.is_section_active(&section.id()));
        }
        for link in dom::query_all(&self.document, ".nav-link") {
            let target = link.get_attribute("data-section");
            dom::set_class(&link, ACTIVE_CLASS, nav.is_link_active(target.as_deref()));
        }
        if let Some(sidebar) = self.document.get_element_by_id("sidebar") {
            dom::set_class(&sidebar, OPEN_CLASS, false);
        }

        if let Some(kind) = nav.load {
            self.start_load(kind);
        }

        let kind = SectionKind::from_section_id(id)?;
        if self.router.borrow().load_state(kind) == LoadState::Loading {
            self.pending.borrow().get(&kind).cloned()
        } else {
            None
        }
    }

    fn toggle_sidebar(&self) {
        let open = self.router.borrow_mut().toggle_sidebar();
        if let Some(sidebar) = self.document.get_element_by_id("sidebar") {
            dom::set_class(&sidebar, OPEN_CLASS, open);
        }
    }

    // ---- loading ----

    fn start_load(self: &Rc<Self>, kind: SectionKind) {
        let signal = Rc::clone(self).run_load(kind).boxed_local().shared();
        self.pending.borrow_mut().insert(kind, signal.clone());
        spawn_local(signal);
    }

    async fn run_load(self: Rc<Self>, kind: SectionKind) {
        let (section, tree) = match kind {
            SectionKind::Scripts => {
                let load = loader::load_scripts(&self.source, &self.config).await;
                (load.section, load.tree)
            }
            SectionKind::Projects => (
                loader::load_projects(&self.source, &self.config).await,
                None,
            ),
            SectionKind::Blog => (loader::load_blog(&self.source, &self.config).await, None),
        };

        let container_id = self.container_id(kind);
        match self.document.get_element_by_id(container_id) {
            Some(container) => container.set_inner_html(&section.html),
            None => warn!(container = container_id, "section container missing"),
        }
        if kind == SectionKind::Scripts {
            let visibility = self.scripts.borrow_mut().replace_tree(tree);
            self.apply_filter(visibility.as_ref());
        }
        self.router
            .borrow_mut()
            .finish_load(kind, section.is_loaded());
    }

    fn container_id(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Scripts => &self.config.scripts_container,
            SectionKind::Projects => &self.config.projects_container,
            SectionKind::Blog => &self.config.blog_container,
        }
    }

    // ---- filter ----

    /// Show the scripts section, wait for its content, then filter by `lang`.
    fn filter_from_skill(self: &Rc<Self>, lang: String) {
        let pending = self.show_section(SectionKind::Scripts.section_id());
        let site = Rc::clone(self);
        spawn_local(async move {
            if let Some(done) = pending {
                done.await;
            }
            site.set_filter(TagFilter::parse(&lang));
        });
    }

    fn set_filter(&self, filter: TagFilter) {
        let visibility = self.scripts.borrow_mut().set(filter);
        self.apply_filter(visibility.as_ref());
    }

    /// Mark the active filter button and hide rows outside `visibility`.
    fn apply_filter(&self, visibility: Option<&Visibility>) {
        let filter = self.scripts.borrow().current().clone();
        for button in dom::query_all(&self.document, ".filter-btn") {
            let on = button
                .get_attribute("data-filter")
                .is_some_and(|value| filter.matches_button(&value));
            dom::set_class(&button, ACTIVE_CLASS, on);
        }

        let Some(visibility) = visibility else {
            return;
        };
        let Some(container) = self
            .document
            .get_element_by_id(&self.config.scripts_container)
        else {
            return;
        };

        for row in dom::query_all_in(&container, &format!("[{NODE_ATTR}]")) {
            let Some(id) = row
                .get_attribute(NODE_ATTR)
                .and_then(|value| value.parse().ok())
            else {
                continue;
            };
            let node = visibility.get(id);
            dom::set_class(&row, HIDDEN_CLASS, !node.visible);
            if node.force_open {
                dom::set_class(&row, OPEN_CLASS, true);
            }
        }
        debug!(%filter, visible = visibility.visible_count(), "filter applied");
    }

    // ---- terminal panels ----

    fn click_panel(&self, bar: &Element) {
        let Some(panel) = dom::closest(bar, ".term-panel") else {
            return;
        };
        let Some(index) = self.panels.iter().position(|p| *p == panel) else {
            return;
        };
        let update = self.cycler.borrow_mut().click(index);
        if let Some(update) = update {
            self.apply_panel_update(update);
        }
    }

    fn apply_panel_update(&self, update: PanelUpdate) {
        for panel in &self.panels {
            dom::set_class(panel, EXPANDED_CLASS, false);
            for target in dom::query_all_in(panel, ".to") {
                dom::clear_inline_style(&target, TRANSITION_OVERRIDES);
            }
        }
        let Some(panel) = update.expand.and_then(|index| self.panels.get(index)) else {
            return;
        };
        if update.reflow {
            dom::force_reflow(panel);
        }
        dom::set_class(panel, EXPANDED_CLASS, true);
    }

    /// Arm a timer for the cycler's next deadline, if any.
    fn schedule_cycler(self: &Rc<Self>) {
        let Some(delay_ms) = self.cycler.borrow().timer_delay_ms(self.started.elapsed()) else {
            return;
        };
        let site = Rc::clone(self);
        let callback = Closure::once_into_js(move || site.on_cycler_timer());
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            )
        {
            warn!(error = ?err, "could not schedule panel timer");
        }
    }

    fn on_cycler_timer(self: &Rc<Self>) {
        let update = self.cycler.borrow_mut().poll(self.started.elapsed());
        if let Some(update) = update {
            self.apply_panel_update(update);
        }
        self.schedule_cycler();
    }

    // ---- contact ----

    fn acknowledge_contact(&self, form: &HtmlFormElement) {
        if let Some(feedback) = self.document.get_element_by_id("form-feedback") {
            feedback.set_text_content(Some(&self.config.contact_ack));
        }
        form.reset();
        debug!("contact form acknowledged");
    }
}

// ---- script rows ----

fn toggle_script(header: &Element) {
    let Some(card) = dom::closest(header, ".script-card") else {
        return;
    };
    let Some(body) = dom::query_in(&card, ".script-body") else {
        return;
    };
    let open = dom::toggle_class(&body, OPEN_CLASS);
    if let Some(label) = dom::query_in(header, ".script-toggle") {
        label.set_text_content(Some(if open { TOGGLE_HIDE } else { TOGGLE_VIEW }));
    }
}

fn toggle_group(header: &Element) {
    if let Some(group) = dom::closest(header, ".script-group") {
        dom::toggle_class(&group, OPEN_CLASS);
    }
}
