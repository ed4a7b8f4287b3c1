#![forbid(unsafe_code)]

//! Typed content manifests.
//!
//! Three externally-authored JSON shapes drive the dynamic sections:
//!
//! - `scripts/index.json`: a forest of [`ScriptNode`] values, each either a
//!   leaf (`file`) or a group (`group` + `items`).
//! - `projects/index.json`: a sequence of [`ProjectEntry`] values, each a bare
//!   slug or a `{ group, projects }` batch. Each slug resolves to a
//!   [`ProjectMeta`] file.
//! - `blog/index.json`: a sequence of slugs, each resolving to a [`PostMeta`].
//!
//! Parsing is strict where the shape is ambiguous (a script node must be
//! exactly one variant) and lenient where the site tolerates omissions
//! (missing descriptions or tags default to empty).

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ContentError;

/// Language assigned to script leaves that omit `lang`.
pub const DEFAULT_LANG: &str = "text";

/// Decode `text` fetched from `path` as `T`.
pub fn parse_json<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, ContentError> {
    serde_json::from_str(text).map_err(|err| ContentError::parse(path, &err))
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

/// One node of the scripts manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawScriptNode")]
pub enum ScriptNode {
    Leaf(ScriptLeaf),
    Group(ScriptGroup),
}

/// A single script file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLeaf {
    /// File name relative to the scripts directory.
    pub file: String,
    /// Display name. Defaults to `file`.
    pub name: String,
    /// Language key, used for the badge and as an implicit tag.
    pub lang: String,
    /// Tags declared on this leaf only.
    pub tags: Vec<String>,
    pub desc: String,
}

/// A named group of nested script nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptGroup {
    /// Group label, from the manifest's `group` key.
    pub name: String,
    pub icon: Option<String>,
    /// Tags inherited by every descendant leaf.
    pub tags: Vec<String>,
    pub items: Vec<ScriptNode>,
}

/// Wire form of a script node before variant resolution.
#[derive(Deserialize)]
struct RawScriptNode {
    file: Option<String>,
    group: Option<String>,
    name: Option<String>,
    lang: Option<String>,
    icon: Option<String>,
    desc: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    items: Option<Vec<ScriptNode>>,
}

impl TryFrom<RawScriptNode> for ScriptNode {
    type Error = String;

    fn try_from(raw: RawScriptNode) -> Result<Self, Self::Error> {
        match (raw.file, raw.group) {
            (Some(file), None) => {
                if raw.items.is_some() {
                    return Err(format!("script leaf `{file}` must not carry `items`"));
                }
                Ok(Self::Leaf(ScriptLeaf {
                    name: raw.name.unwrap_or_else(|| file.clone()),
                    lang: raw.lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
                    tags: raw.tags,
                    desc: raw.desc.unwrap_or_default(),
                    file,
                }))
            }
            (None, Some(name)) => Ok(Self::Group(ScriptGroup {
                name,
                icon: raw.icon.filter(|icon| !icon.is_empty()),
                tags: raw.tags,
                items: raw.items.unwrap_or_default(),
            })),
            (Some(file), Some(group)) => Err(format!(
                "script node cannot be both leaf `{file}` and group `{group}`"
            )),
            (None, None) => Err("script node needs either `file` or `group`".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// One entry of the projects manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProjectEntry {
    /// Standalone project at `projects/{slug}/`.
    Slug(String),
    /// Batch of projects at `projects/{group}/{slug}/`.
    Group(ProjectGroup),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectGroup {
    /// Folder prefix and label. An object without `group` is ignored; an
    /// empty `group` means no prefix.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

/// Contents of `project.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    pub name: String,
    pub icon: Option<String>,
    /// Image file name inside the project folder.
    pub image: Option<String>,
    pub desc: String,
    pub tags: Vec<String>,
    /// Entry page inside the project folder. Default: `index.html`
    pub link: Option<String>,
}

impl ProjectMeta {
    /// Image file, treating an empty string as absent.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref().filter(|s| !s.is_empty())
    }

    /// Entry page, defaulting to `index.html`.
    #[must_use]
    pub fn link(&self) -> &str {
        self.link
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("index.html")
    }
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

/// Contents of `post.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    pub title: String,
    pub date: String,
    pub tag: String,
    pub desc: String,
}
