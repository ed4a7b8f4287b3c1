#![forbid(unsafe_code)]

//! Project grid layout and card rendering.
//!
//! The manifest is walked linearly into [`ProjectBlock`]s: each bare slug is
//! a standalone card, each `{ group, projects }` object a labeled sub-grid
//! wrapping only its own slugs. Two groups never merge, even with equal
//! labels, and standalone cards may sit between them.

use std::fmt::Write;

use crate::error::ContentError;
use crate::escape::{escape_html, escape_html_into};
use crate::manifest::{ProjectEntry, ProjectMeta};
use crate::markup::{loading_msg, push_pills};

/// Label for a group whose `group` value is empty.
pub const UNNAMED_GROUP_LABEL: &str = "Projects";
/// Thumbnail glyph for projects with neither image nor icon.
pub const DEFAULT_PROJECT_ICON: &str = "📁";
/// Shown when the manifest yields no blocks.
pub const EMPTY_MESSAGE: &str = "No projects found.";

/// A project card slot: where its files live and how to name it on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCardRef {
    pub slug: String,
    /// Folder path relative to the site root, e.g. `projects/games/snake`.
    pub folder: String,
}

impl ProjectCardRef {
    /// Path of the card's `project.json`.
    #[must_use]
    pub fn meta_path(&self) -> String {
        format!("{}/project.json", self.folder)
    }
}

/// One top-level unit of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectBlock {
    Standalone(ProjectCardRef),
    Group {
        label: String,
        cards: Vec<ProjectCardRef>,
    },
}

/// Linearized projects manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectLayout {
    blocks: Vec<ProjectBlock>,
}

impl ProjectLayout {
    /// Resolve manifest entries against `projects_dir`.
    #[must_use]
    pub fn from_manifest(entries: &[ProjectEntry], projects_dir: &str) -> Self {
        let dir = projects_dir.trim_end_matches('/');
        let mut blocks = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                ProjectEntry::Slug(slug) => blocks.push(ProjectBlock::Standalone(ProjectCardRef {
                    slug: slug.clone(),
                    folder: format!("{dir}/{slug}"),
                })),
                ProjectEntry::Group(group) => {
                    let Some(name) = &group.group else {
                        tracing::debug!("skipping project entry without `group`");
                        continue;
                    };
                    let cards = group
                        .projects
                        .iter()
                        .map(|slug| ProjectCardRef {
                            slug: slug.clone(),
                            folder: if name.is_empty() {
                                format!("{dir}/{slug}")
                            } else {
                                format!("{dir}/{name}/{slug}")
                            },
                        })
                        .collect();
                    let label = if name.is_empty() {
                        UNNAMED_GROUP_LABEL.to_string()
                    } else {
                        name.clone()
                    };
                    blocks.push(ProjectBlock::Group { label, cards });
                }
            }
        }
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[ProjectBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every card slot in manifest order.
    pub fn cards(&self) -> impl Iterator<Item = &ProjectCardRef> + '_ {
        self.blocks.iter().flat_map(|block| match block {
            ProjectBlock::Standalone(card) => std::slice::from_ref(card).iter(),
            ProjectBlock::Group { cards, .. } => cards.iter(),
        })
    }

    /// Assemble the grid from per-card markup given in [`Self::cards`] order.
    #[must_use]
    pub fn render(&self, cards: Vec<String>) -> String {
        if self.blocks.is_empty() {
            return loading_msg(EMPTY_MESSAGE);
        }
        debug_assert_eq!(cards.len(), self.cards().count());

        let mut cards = cards.into_iter();
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                ProjectBlock::Standalone(_) => {
                    out.push_str(&cards.next().unwrap_or_default());
                }
                ProjectBlock::Group { label, cards: refs } => {
                    out.push_str(
                        "\n<div class=\"project-group\">\
                         \n  <div class=\"project-group-header\">\
                         \n    <span class=\"project-group-label\">",
                    );
                    escape_html_into(&mut out, label);
                    out.push_str(
                        "/</span>\
                         \n  </div>\
                         \n  <div class=\"projects-subgrid\">",
                    );
                    for _ in refs {
                        out.push_str(&cards.next().unwrap_or_default());
                    }
                    out.push_str("</div></div>");
                }
            }
        }
        out
    }
}

/// Render one card from its fetched metadata, or a degraded card naming the
/// slug when the fetch failed.
#[must_use]
pub fn render_card(card: &ProjectCardRef, meta: Result<&ProjectMeta, &ContentError>) -> String {
    let Ok(meta) = meta else {
        return format!(
            "<div class=\"project-card project-card-err\">\
             <div class=\"project-thumb project-thumb-icon\">⚠️</div>\
             <div class=\"project-info\"><h3>{}</h3><p>Missing project.json</p></div></div>",
            escape_html(&card.slug)
        );
    };

    let folder = escape_html(&card.folder);
    let name = escape_html(&meta.name);
    let thumb = match meta.image() {
        Some(image) => format!(
            "<div class=\"project-thumb\"><img src=\"{folder}/{}\" alt=\"{name}\"></div>",
            escape_html(image)
        ),
        None => format!(
            "<div class=\"project-thumb project-thumb-icon\">{}</div>",
            escape_html(meta.icon().unwrap_or(DEFAULT_PROJECT_ICON))
        ),
    };

    let mut out = String::new();
    let _ = write!(
        out,
        "\n<a href=\"{folder}/{}\" class=\"project-card\">\
         \n  {thumb}\
         \n  <div class=\"project-info\">\
         \n    <h3>{name}</h3>\
         \n    <p>{}</p>\
         \n    <div class=\"project-tags\">",
        escape_html(meta.link()),
        escape_html(&meta.desc),
    );
    push_pills(&mut out, "project-tag", &meta.tags);
    out.push_str("</div>\n  </div>\n</a>");
    out
}
