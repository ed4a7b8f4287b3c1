#![forbid(unsafe_code)]

//! Section loaders: fetch a manifest, fetch its detail files in parallel,
//! render markup.
//!
//! Loaders never fail. A manifest that cannot be fetched or parsed yields a
//! section-level placeholder and [`LoadStatus::Failed`]; a detail file that
//! cannot be fetched degrades only its own card. Output order always follows
//! manifest order, independent of completion order.

use futures::future::join_all;
use tracing::{info, warn};

use crate::blog;
use crate::config::SiteConfig;
use crate::error::ContentError;
use crate::manifest::{PostMeta, ProjectEntry, ProjectMeta, ScriptNode};
use crate::markup::{loading_msg, section_error};
use crate::projects::{self, ProjectLayout};
use crate::router::SectionKind;
use crate::script_tree::{ScriptSources, ScriptTree};
use crate::source::{ContentSource, fetch_json};

/// Outcome of a section load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// The manifest itself failed; `html` holds the placeholder.
    Failed(ContentError),
}

/// Rendered section content, ready to replace the container's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLoad {
    pub kind: SectionKind,
    pub html: String,
    pub status: LoadStatus,
}

impl SectionLoad {
    fn loaded(kind: SectionKind, html: String) -> Self {
        Self {
            kind,
            html,
            status: LoadStatus::Loaded,
        }
    }

    fn failed<S: ContentSource>(kind: SectionKind, source: &S, err: ContentError) -> Self {
        warn!(section = kind.section_id(), error = %err, "section manifest unavailable");
        Self {
            kind,
            html: section_error(err.path(), &err, source.is_local_file()),
            status: LoadStatus::Failed(err),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }
}

/// Scripts section content plus the tree the filter operates on.
#[derive(Debug, Clone)]
pub struct ScriptsLoad {
    pub section: SectionLoad,
    /// `None` when the manifest failed to load.
    pub tree: Option<ScriptTree>,
}

/// Load the scripts section.
pub async fn load_scripts<S: ContentSource>(source: &S, config: &SiteConfig) -> ScriptsLoad {
    let kind = SectionKind::Scripts;
    let manifest: Vec<ScriptNode> = match fetch_json(source, &config.scripts_manifest).await {
        Ok(manifest) => manifest,
        Err(err) => {
            return ScriptsLoad {
                section: SectionLoad::failed(kind, source, err),
                tree: None,
            };
        }
    };

    let tree = ScriptTree::from_manifest(manifest);
    if tree.is_empty() {
        let msg = format!(
            "No scripts yet. Add entries to {}.",
            config.scripts_manifest
        );
        return ScriptsLoad {
            section: SectionLoad::loaded(kind, loading_msg(&msg)),
            tree: Some(tree),
        };
    }

    let dir = config.scripts_dir.trim_end_matches('/');
    let files = tree.referenced_files();
    let fetches = files.iter().map(|&file| async move {
        let path = format!("{dir}/{file}");
        (file, source.fetch_text(&path).await)
    });

    let mut sources = ScriptSources::new();
    for (file, result) in join_all(fetches).await {
        match result {
            Ok(text) => sources.insert(file, text),
            Err(err) => warn!(file, error = %err, "script source unavailable"),
        }
    }

    let html = tree.render(&sources, config);
    info!(
        section = kind.section_id(),
        nodes = tree.len(),
        files = files.len(),
        fetched = sources.len(),
        "section loaded"
    );
    ScriptsLoad {
        section: SectionLoad::loaded(kind, html),
        tree: Some(tree),
    }
}

/// Load the projects section.
pub async fn load_projects<S: ContentSource>(source: &S, config: &SiteConfig) -> SectionLoad {
    let kind = SectionKind::Projects;
    let entries: Vec<ProjectEntry> = match fetch_json(source, &config.projects_manifest).await {
        Ok(entries) => entries,
        Err(err) => return SectionLoad::failed(kind, source, err),
    };

    let layout = ProjectLayout::from_manifest(&entries, &config.projects_dir);
    let cards = join_all(layout.cards().map(|card| async move {
        let path = card.meta_path();
        let meta = fetch_json::<_, ProjectMeta>(source, &path).await;
        if let Err(err) = &meta {
            warn!(slug = %card.slug, error = %err, "project metadata unavailable");
        }
        projects::render_card(card, meta.as_ref())
    }))
    .await;

    info!(section = kind.section_id(), cards = cards.len(), "section loaded");
    SectionLoad::loaded(kind, layout.render(cards))
}

/// Load the blog section.
pub async fn load_blog<S: ContentSource>(source: &S, config: &SiteConfig) -> SectionLoad {
    let kind = SectionKind::Blog;
    let slugs: Vec<String> = match fetch_json(source, &config.blog_index).await {
        Ok(slugs) => slugs,
        Err(err) => return SectionLoad::failed(kind, source, err),
    };

    let dir = config.blog_dir.as_str();
    let cards = join_all(slugs.iter().map(|slug| async move {
        let path = blog::post_meta_path(dir, slug);
        let post = fetch_json::<_, PostMeta>(source, &path).await;
        if let Err(err) = &post {
            warn!(slug = %slug, error = %err, "post metadata unavailable");
        }
        blog::render_card(dir, slug, post.as_ref())
    }))
    .await;

    info!(section = kind.section_id(), cards = cards.len(), "section loaded");
    SectionLoad::loaded(kind, blog::render_grid(cards))
}
