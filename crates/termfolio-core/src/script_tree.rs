#![forbid(unsafe_code)]

//! Script tree: flattening, tag inheritance, visibility, and rendering.
//!
//! The manifest forest is flattened into a preorder arena ([`ScriptTree`]).
//! Preorder ids give two properties the folds below rely on:
//!
//! - a parent's id is always smaller than its children's, so a forward scan
//!   is a top-down walk (tag inheritance), and
//! - a reverse scan visits every child before its parent, so it is a
//!   bottom-up walk (leaf counts, visibility).
//!
//! Rendered markup tags every row with `data-node="{id}"`; the host applies a
//! [`Visibility`] by id instead of re-rendering on each filter change.
//!
//! # Invariants
//!
//! 1. Under [`TagFilter::All`] every node is visible and none is forced open.
//! 2. Under a tag filter, a leaf is visible iff the tag is in its own tags,
//!    its language, or any ancestor group's tags.
//! 3. A group is visible iff at least one direct child is visible, and every
//!    visible group is forced open.
//! 4. Rows display only their own tags; inherited tags affect matching only.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use crate::config::SiteConfig;
use crate::escape::escape_html_into;
use crate::filter::{TagFilter, normalize_tag};
use crate::manifest::{ScriptLeaf, ScriptNode};
use crate::markup::push_pills;

/// Preorder index of a node in a [`ScriptTree`].
pub type NodeId = usize;

/// Attribute carrying the node id on rendered rows and groups.
pub const NODE_ATTR: &str = "data-node";
/// Attribute on clickable headers: `script` for leaves, `group` for groups.
pub const TOGGLE_ATTR: &str = "data-toggle";
/// Class applied to filtered-out rows and groups.
pub const HIDDEN_CLASS: &str = "hidden";
/// Class marking open groups and expanded script bodies.
pub const OPEN_CLASS: &str = "open";
/// Toggle label while a script body is collapsed.
pub const TOGGLE_VIEW: &str = "▼ view";
/// Toggle label while a script body is expanded.
pub const TOGGLE_HIDE: &str = "▲ hide";
/// Source text shown when a script file could not be fetched.
pub const MISSING_SOURCE: &str = "# (could not load file)";
/// Icon for groups that declare none.
pub const DEFAULT_GROUP_ICON: &str = "📁";

/// Node payload in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(ScriptLeaf),
    Group {
        name: String,
        icon: Option<String>,
        tags: Vec<String>,
    },
}

/// One arena entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Nesting depth; top-level nodes are `0`.
    pub depth: usize,
}

impl TreeNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Tags declared on this node only.
    #[must_use]
    pub fn own_tags(&self) -> &[String] {
        match &self.kind {
            NodeKind::Leaf(leaf) => &leaf.tags,
            NodeKind::Group { tags, .. } => tags,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Flattened scripts manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl ScriptTree {
    /// Flatten a manifest forest in preorder.
    #[must_use]
    pub fn from_manifest(manifest: Vec<ScriptNode>) -> Self {
        let mut tree = Self::default();
        for node in manifest {
            let id = tree.push_node(node, None, 0);
            tree.roots.push(id);
        }
        tree
    }

    fn push_node(&mut self, node: ScriptNode, parent: Option<NodeId>, depth: usize) -> NodeId {
        let id = self.nodes.len();
        match node {
            ScriptNode::Leaf(leaf) => self.nodes.push(TreeNode {
                kind: NodeKind::Leaf(leaf),
                parent,
                children: Vec::new(),
                depth,
            }),
            ScriptNode::Group(group) => {
                self.nodes.push(TreeNode {
                    kind: NodeKind::Group {
                        name: group.name,
                        icon: group.icon,
                        tags: group.tags,
                    },
                    parent,
                    children: Vec::with_capacity(group.items.len()),
                    depth,
                });
                for item in group.items {
                    let child = self.push_node(item, Some(id), depth + 1);
                    self.nodes[id].children.push(child);
                }
            }
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Distinct leaf file names, in first-reference order.
    #[must_use]
    pub fn referenced_files(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Leaf(leaf) => Some(leaf.file.as_str()),
                NodeKind::Group { .. } => None,
            })
            .filter(|file| seen.insert(*file))
            .collect()
    }

    /// Effective tag set per node: own tags (plus language, for leaves)
    /// unioned with every ancestor's effective set. Normalized lowercase.
    #[must_use]
    pub fn effective_tags(&self) -> Vec<BTreeSet<String>> {
        let mut effective: Vec<BTreeSet<String>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let mut tags = node
                .parent
                .map(|parent| effective[parent].clone())
                .unwrap_or_default();
            tags.extend(node.own_tags().iter().map(|t| normalize_tag(t)));
            if let NodeKind::Leaf(leaf) = &node.kind {
                tags.insert(normalize_tag(&leaf.lang));
            }
            effective.push(tags);
        }
        effective
    }

    /// Number of leaf descendants per node (a leaf counts itself).
    #[must_use]
    pub fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for id in (0..self.nodes.len()).rev() {
            let node = &self.nodes[id];
            counts[id] = if node.is_leaf() {
                1
            } else {
                node.children.iter().map(|&child| counts[child]).sum()
            };
        }
        counts
    }

    /// Visibility of every node under `filter`.
    #[must_use]
    pub fn visibility(&self, filter: &TagFilter) -> Visibility {
        let TagFilter::Tag(target) = filter else {
            return Visibility::all_visible(self.nodes.len());
        };

        let effective = self.effective_tags();
        let mut nodes = vec![NodeVisibility::default(); self.nodes.len()];
        for id in (0..self.nodes.len()).rev() {
            let node = &self.nodes[id];
            nodes[id] = if node.is_leaf() {
                NodeVisibility {
                    visible: effective[id].contains(target),
                    force_open: false,
                }
            } else {
                let visible = node.children.iter().any(|&child| nodes[child].visible);
                NodeVisibility {
                    visible,
                    force_open: visible,
                }
            };
        }
        Visibility { nodes }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Render the whole forest. Top-level groups start open, nested groups
    /// closed, script bodies collapsed.
    #[must_use]
    pub fn render(&self, sources: &ScriptSources, config: &SiteConfig) -> String {
        let counts = self.leaf_counts();
        let mut out = String::with_capacity(self.nodes.len() * 256);
        for &root in &self.roots {
            self.render_node(&mut out, root, &counts, sources, config);
        }
        out
    }

    fn render_node(
        &self,
        out: &mut String,
        id: NodeId,
        counts: &[usize],
        sources: &ScriptSources,
        config: &SiteConfig,
    ) {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Leaf(leaf) => render_leaf(out, id, leaf, sources, config),
            NodeKind::Group { name, icon, tags } => {
                let open = if node.depth == 0 { " open" } else { "" };
                let _ = write!(
                    out,
                    "\n<div class=\"script-group{open}\" {NODE_ATTR}=\"{id}\" data-depth=\"{}\">\
                     \n  <div class=\"script-group-header\" {TOGGLE_ATTR}=\"group\">\
                     \n    <span class=\"script-group-icon\">",
                    node.depth
                );
                escape_html_into(out, icon.as_deref().unwrap_or(DEFAULT_GROUP_ICON));
                out.push_str("</span>\n    <span class=\"script-group-name\">");
                escape_html_into(out, name);
                out.push_str("</span>\n");
                push_tag_row(out, tags);
                let _ = write!(
                    out,
                    "    <span class=\"script-group-count\">{}</span>\
                     \n  </div>\
                     \n  <div class=\"script-group-body\">",
                    counts[id]
                );
                for &child in &node.children {
                    self.render_node(out, child, counts, sources, config);
                }
                out.push_str("\n  </div>\n</div>");
            }
        }
    }
}

fn render_leaf(
    out: &mut String,
    id: NodeId,
    leaf: &ScriptLeaf,
    sources: &ScriptSources,
    config: &SiteConfig,
) {
    let _ = write!(out, "\n<div class=\"script-card\" {NODE_ATTR}=\"{id}\" data-lang=\"");
    escape_html_into(out, &leaf.lang);
    let _ = write!(
        out,
        "\">\n  <div class=\"script-header\" {TOGGLE_ATTR}=\"script\">\
         \n    <div class=\"script-meta\">\
         \n      <span class=\"script-lang "
    );
    escape_html_into(out, config.lang_class(&leaf.lang));
    out.push_str("\">");
    escape_html_into(out, &leaf.lang);
    out.push_str("</span>\n      <span class=\"script-name\">");
    escape_html_into(out, &leaf.name);
    out.push_str("</span>\n    </div>\n    <p class=\"script-desc\">");
    escape_html_into(out, &leaf.desc);
    out.push_str("</p>\n");
    push_tag_row(out, &leaf.tags);
    let _ = write!(
        out,
        "    <span class=\"script-toggle\">{TOGGLE_VIEW}</span>\
         \n  </div>\
         \n  <div class=\"script-body\">\
         \n    <pre><code>"
    );
    escape_html_into(out, sources.get(&leaf.file));
    out.push_str("</code></pre>\n  </div>\n</div>");
}

fn push_tag_row(out: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    out.push_str("    <div class=\"script-tags\">");
    push_pills(out, "script-tag", tags);
    out.push_str("</div>\n");
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Fetched script file contents keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct ScriptSources {
    files: HashMap<String, String>,
}

impl ScriptSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.files.insert(file.into(), text.into());
    }

    /// Contents of `file`, or [`MISSING_SOURCE`] if it was not fetched.
    #[must_use]
    pub fn get(&self, file: &str) -> &str {
        self.files.get(file).map_or(MISSING_SOURCE, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Filter outcome for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeVisibility {
    pub visible: bool,
    /// Group must be opened so its matches are not hidden.
    pub force_open: bool,
}

/// Filter outcome for a whole tree, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    nodes: Vec<NodeVisibility>,
}

impl Visibility {
    fn all_visible(len: usize) -> Self {
        Self {
            nodes: vec![
                NodeVisibility {
                    visible: true,
                    force_open: false,
                };
                len
            ],
        }
    }

    /// Outcome for `id`; unknown ids are hidden.
    #[must_use]
    pub fn get(&self, id: NodeId) -> NodeVisibility {
        self.nodes.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).visible
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visible).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeVisibility)> + '_ {
        self.nodes.iter().copied().enumerate()
    }
}
