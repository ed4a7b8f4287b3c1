//! Section loader tests over an in-memory content source.

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use termfolio_core::loader::{load_blog, load_projects, load_scripts};
use termfolio_core::script_tree::MISSING_SOURCE;
use termfolio_core::testing::{FetchEvent, MemorySource};
use termfolio_core::{ContentError, LoadStatus, SectionKind, SiteConfig, TagFilter};

fn config() -> SiteConfig {
    SiteConfig::default()
}

fn event_index(events: &[FetchEvent], wanted: &FetchEvent) -> usize {
    events
        .iter()
        .position(|event| event == wanted)
        .unwrap_or_else(|| panic!("missing {wanted:?} in {events:?}"))
}

/// Every path in `details` is requested before any of them completes.
fn assert_fetched_concurrently(source: &MemorySource, details: &[&str]) {
    let events = source.events();
    let last_request = details
        .iter()
        .map(|path| event_index(&events, &FetchEvent::Requested((*path).to_string())))
        .max()
        .expect("details");
    let first_completion = details
        .iter()
        .map(|path| event_index(&events, &FetchEvent::Completed((*path).to_string())))
        .min()
        .expect("details");
    assert!(
        last_request < first_completion,
        "detail fetches ran one after another: {events:?}"
    );
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in {html}"))
}

// ---- scripts ----

const SCRIPTS: &str = r#"[
    {"group":"Linux","icon":"🐧","tags":["linux"],"items":[
        {"file":"backup.sh","lang":"bash","desc":"Timestamped <backup>"},
        {"file":"ping.sh","name":"ping sweep","lang":"bash","tags":["net"]}
    ]},
    {"file":"backup.sh","name":"backup again","lang":"bash"},
    {"file":"gone.py","lang":"python"}
]"#;

fn scripts_source() -> MemorySource {
    MemorySource::new()
        .with_file("scripts/index.json", SCRIPTS)
        .with_file("scripts/backup.sh", "tar czf \"$1\" <dir>")
        .with_file("scripts/ping.sh", "ping -c1 host")
}

#[test]
fn scripts_fetch_each_file_once() {
    let source = scripts_source();
    let load = block_on(load_scripts(&source, &config()));
    assert!(load.section.is_loaded());
    assert_eq!(load.section.kind, SectionKind::Scripts);
    assert_eq!(source.request_count("scripts/index.json"), 1);
    assert_eq!(source.request_count("scripts/backup.sh"), 1);
    assert_eq!(source.request_count("scripts/ping.sh"), 1);
    assert_eq!(source.request_count("scripts/gone.py"), 1);
}

#[test]
fn scripts_render_escaped_sources_and_placeholders() {
    let source = scripts_source();
    let load = block_on(load_scripts(&source, &config()));
    let html = &load.section.html;
    assert!(html.contains("tar czf &quot;$1&quot; &lt;dir&gt;"));
    assert!(html.contains("Timestamped &lt;backup&gt;"));
    assert!(html.contains(MISSING_SOURCE));
    assert!(html.contains("sl-py"));
    assert!(html.contains("<span class=\"script-group-count\">2</span>"));
}

#[test]
fn scripts_tree_feeds_the_filter() {
    let source = scripts_source();
    let load = block_on(load_scripts(&source, &config()));
    let tree = load.tree.expect("tree");
    let vis = tree.visibility(&TagFilter::parse("NET"));
    // group, backup.sh (inside), ping.sh, backup again, gone.py
    let visible: Vec<bool> = (0..tree.len()).map(|id| vis.is_visible(id)).collect();
    assert_eq!(visible, vec![true, false, true, false, false]);
    assert!(vis.get(0).force_open);
}

#[test]
fn script_files_fetch_concurrently_and_render_in_tree_order() {
    let source = scripts_source()
        .with_default_latency(1)
        .with_latency("scripts/backup.sh", 3);
    let load = block_on(load_scripts(&source, &config()));
    assert_fetched_concurrently(
        &source,
        &["scripts/backup.sh", "scripts/ping.sh", "scripts/gone.py"],
    );
    assert_eq!(
        source.completions(),
        vec![
            "scripts/index.json",
            "scripts/ping.sh",
            "scripts/gone.py",
            "scripts/backup.sh",
        ]
    );
    let html = &load.section.html;
    assert!(position(html, "tar czf") < position(html, "ping -c1 host"));
}

#[test]
fn empty_scripts_manifest_shows_hint() {
    let source = MemorySource::new().with_file("scripts/index.json", "[]");
    let load = block_on(load_scripts(&source, &config()));
    assert!(load.section.is_loaded());
    assert_eq!(
        load.section.html,
        "<p class=\"loading-msg\">No scripts yet. Add entries to scripts/index.json.</p>"
    );
    assert!(load.tree.expect("tree").is_empty());
}

#[test]
fn invalid_scripts_manifest_fails_section() {
    let source = MemorySource::new().with_file("scripts/index.json", r#"[{"name":"x"}]"#);
    let load = block_on(load_scripts(&source, &config()));
    assert!(load.tree.is_none());
    match &load.section.status {
        LoadStatus::Failed(ContentError::Parse { path, message }) => {
            assert_eq!(path, "scripts/index.json");
            assert!(message.contains("either"), "message: {message}");
        }
        other => panic!("unexpected status: {other:?}"),
    }
    assert!(load.section.html.contains("<code>scripts/index.json</code>"));
}

// ---- projects ----

const PROJECT_A: &str = r#"{"name":"Alpha","icon":"🚀","desc":"first","tags":["rust"]}"#;

#[test]
fn projects_keep_manifest_order_and_degrade_per_card() {
    let source = MemorySource::new()
        .with_file(
            "projects/index.json",
            r#"["a", {"group":"g","projects":["b"]}]"#,
        )
        .with_file("projects/a/project.json", PROJECT_A);
    let load = block_on(load_projects(&source, &config()));
    assert!(load.is_loaded());
    assert_eq!(
        source.requests(),
        vec![
            "projects/index.json",
            "projects/a/project.json",
            "projects/g/b/project.json",
        ]
    );

    let html = &load.html;
    let alpha = html.find("<h3>Alpha</h3>").expect("alpha card");
    let group = html.find("g/</span>").expect("group header");
    let missing = html.find("Missing project.json").expect("degraded card");
    assert!(alpha < group && group < missing);
    assert!(html.contains("href=\"projects/a/index.html\""));
    assert!(html.contains("<h3>b</h3>"));
}

#[test]
fn project_cards_fetch_concurrently_and_keep_manifest_order() {
    let source = MemorySource::new()
        .with_file(
            "projects/index.json",
            r#"["a", {"group":"g","projects":["b"]}, "c"]"#,
        )
        .with_file("projects/a/project.json", r#"{"name":"Alpha"}"#)
        .with_file("projects/g/b/project.json", r#"{"name":"Beta"}"#)
        .with_file("projects/c/project.json", r#"{"name":"Gamma"}"#)
        .with_default_latency(1)
        .with_latency("projects/a/project.json", 3);
    let load = block_on(load_projects(&source, &config()));

    let details = [
        "projects/a/project.json",
        "projects/g/b/project.json",
        "projects/c/project.json",
    ];
    assert_fetched_concurrently(&source, &details);
    // The first card answers last.
    assert_eq!(
        source.completions(),
        vec![
            "projects/index.json",
            "projects/g/b/project.json",
            "projects/c/project.json",
            "projects/a/project.json",
        ]
    );
    let html = &load.html;
    let alpha = position(html, "<h3>Alpha</h3>");
    let beta = position(html, "<h3>Beta</h3>");
    let gamma = position(html, "<h3>Gamma</h3>");
    assert!(alpha < beta && beta < gamma);
}

#[test]
fn empty_projects_manifest() {
    let source = MemorySource::new().with_file("projects/index.json", "[]");
    let load = block_on(load_projects(&source, &config()));
    assert!(load.is_loaded());
    assert!(load.html.contains("No projects found."));
}

#[test]
fn projects_manifest_from_file_url_explains_server() {
    let source = MemorySource::new()
        .with_network_error("projects/index.json")
        .opened_from_file();
    let load = block_on(load_projects(&source, &config()));
    assert!(!load.is_loaded());
    assert!(load.html.contains("python3 -m http.server 8000"));
}

// ---- blog ----

#[test]
fn blog_degrades_single_post() {
    let source = MemorySource::new()
        .with_file("blog/index.json", r#"["hello", "broken"]"#)
        .with_file(
            "blog/hello/post.json",
            r#"{"title":"Hello","date":"2024-01-01","tag":"meta","desc":"first post"}"#,
        )
        .with_file("blog/broken/post.json", "{not json");
    let load = block_on(load_blog(&source, &config()));
    assert!(load.is_loaded());
    let hello = load.html.find("<h3>Hello</h3>").expect("hello card");
    let broken = load
        .html
        .find("<h3>broken</h3><p>Could not load post.json</p>")
        .expect("degraded card");
    assert!(hello < broken);
    assert!(load.html.contains("href=\"blog/hello/index.html\""));
}

#[test]
fn blog_posts_fetch_concurrently_and_keep_index_order() {
    let mut source = MemorySource::new()
        .with_file("blog/index.json", r#"["one", "two", "three"]"#)
        .with_default_latency(1)
        .with_latency("blog/one/post.json", 4)
        .with_latency("blog/two/post.json", 2);
    for (slug, title) in [("one", "First"), ("two", "Second"), ("three", "Third")] {
        source = source.with_file(
            format!("blog/{slug}/post.json"),
            format!(r#"{{"title":"{title}"}}"#),
        );
    }
    let load = block_on(load_blog(&source, &config()));

    assert_fetched_concurrently(
        &source,
        &["blog/one/post.json", "blog/two/post.json", "blog/three/post.json"],
    );
    assert_eq!(
        source.completions(),
        vec![
            "blog/index.json",
            "blog/three/post.json",
            "blog/two/post.json",
            "blog/one/post.json",
        ]
    );
    let html = &load.html;
    let first = position(html, "<h3>First</h3>");
    let second = position(html, "<h3>Second</h3>");
    let third = position(html, "<h3>Third</h3>");
    assert!(first < second && second < third);
}

#[test]
fn missing_blog_index_reports_status() {
    let source = MemorySource::new();
    let load = block_on(load_blog(&source, &config()));
    assert_eq!(
        load.status,
        LoadStatus::Failed(ContentError::Status {
            path: "blog/index.json".into(),
            status: 404,
        })
    );
    assert!(load.html.contains("HTTP 404"));
}

#[test]
fn custom_paths_are_honored() {
    let mut config = config();
    config.blog_index = "posts.json".into();
    config.blog_dir = "writing/".into();
    let source = MemorySource::new()
        .with_file("posts.json", r#"["x"]"#)
        .with_file("writing/x/post.json", r#"{"title":"X"}"#);
    let load = block_on(load_blog(&source, &config));
    assert!(load.html.contains("href=\"writing/x/index.html\""));
}
