//! Property-based invariant tests for the script tree filter.
//!
//! Verifies:
//! 1. `all` shows every node and forces nothing open
//! 2. A leaf is visible iff the tag is in its own tags, its language, or an
//!    ancestor group's tags (checked against a direct ancestor walk)
//! 3. A group is visible iff some descendant leaf is visible
//! 4. Visible groups are forced open; hidden ones are not
//! 5. Group leaf counts equal the number of leaf descendants
//! 6. Filter matching ignores ASCII case
//! 7. Rendering tags every node exactly once with `data-node`

use std::collections::BTreeSet;

use proptest::prelude::*;
use termfolio_core::manifest::{ScriptGroup, ScriptLeaf, ScriptNode};
use termfolio_core::script_tree::{NodeKind, ScriptSources};
use termfolio_core::{ScriptTree, SiteConfig, TagFilter};

// ── Strategy helpers ──────────────────────────────────────────────────

const TAGS: &[&str] = &["linux", "net", "diag", "Net", "backup"];
const LANGS: &[&str] = &["bash", "python", "powershell", "text"];

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(TAGS), 0..3)
        .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

fn arb_leaf() -> impl Strategy<Value = ScriptNode> {
    (0u8..6, prop::sample::select(LANGS), arb_tags()).prop_map(|(n, lang, tags)| {
        let file = format!("s{n}.sh");
        ScriptNode::Leaf(ScriptLeaf {
            name: file.clone(),
            file,
            lang: lang.to_string(),
            tags,
            desc: String::new(),
        })
    })
}

fn arb_node() -> impl Strategy<Value = ScriptNode> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        (arb_tags(), prop::collection::vec(inner, 0..4)).prop_map(|(tags, items)| {
            ScriptNode::Group(ScriptGroup {
                name: "group".to_string(),
                icon: None,
                tags,
                items,
            })
        })
    })
}

fn arb_tree() -> impl Strategy<Value = ScriptTree> {
    prop::collection::vec(arb_node(), 0..5).prop_map(ScriptTree::from_manifest)
}

fn arb_filter() -> impl Strategy<Value = TagFilter> {
    prop_oneof![
        Just(TagFilter::All),
        prop::sample::select(TAGS).prop_map(TagFilter::parse),
        prop::sample::select(LANGS).prop_map(TagFilter::parse),
        Just(TagFilter::parse("nomatch")),
    ]
}

/// Tags matching leaf `id` by walking its ancestor chain directly.
fn ancestor_walk_tags(tree: &ScriptTree, id: usize) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let node = tree.node(current).expect("node in tree");
        tags.extend(node.own_tags().iter().map(|t| t.to_ascii_lowercase()));
        if let NodeKind::Leaf(leaf) = &node.kind {
            tags.insert(leaf.lang.to_ascii_lowercase());
        }
        cursor = node.parent;
    }
    tags
}

fn has_visible_leaf_below(tree: &ScriptTree, id: usize, filter: &str) -> bool {
    let node = tree.node(id).expect("node in tree");
    if node.is_leaf() {
        return ancestor_walk_tags(tree, id).contains(filter);
    }
    node.children
        .iter()
        .any(|&child| has_visible_leaf_below(tree, child, filter))
}

fn count_leaves_below(tree: &ScriptTree, id: usize) -> usize {
    let node = tree.node(id).expect("node in tree");
    if node.is_leaf() {
        1
    } else {
        node.children
            .iter()
            .map(|&child| count_leaves_below(tree, child))
            .sum()
    }
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn all_filter_shows_everything(tree in arb_tree()) {
        let vis = tree.visibility(&TagFilter::All);
        prop_assert_eq!(vis.visible_count(), tree.len());
        for (_, node) in vis.iter() {
            prop_assert!(node.visible);
            prop_assert!(!node.force_open);
        }
    }

    #[test]
    fn visibility_matches_ancestor_walk(tree in arb_tree(), filter in arb_filter()) {
        let vis = tree.visibility(&filter);
        let TagFilter::Tag(tag) = &filter else {
            return Ok(());
        };
        for id in 0..tree.len() {
            let expected = has_visible_leaf_below(&tree, id, tag);
            prop_assert_eq!(vis.is_visible(id), expected, "node {}", id);
            let node = tree.node(id).expect("node in tree");
            if !node.is_leaf() {
                prop_assert_eq!(vis.get(id).force_open, expected);
            }
        }
    }

    #[test]
    fn leaf_counts_match_descendants(tree in arb_tree()) {
        let counts = tree.leaf_counts();
        for (id, count) in counts.iter().enumerate() {
            prop_assert_eq!(*count, count_leaves_below(&tree, id));
        }
    }

    #[test]
    fn filter_ignores_case(tree in arb_tree(), tag in prop::sample::select(TAGS)) {
        let lower = tree.visibility(&TagFilter::parse(&tag.to_ascii_lowercase()));
        let upper = tree.visibility(&TagFilter::parse(&tag.to_ascii_uppercase()));
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn render_tags_each_node_once(tree in arb_tree()) {
        let html = tree.render(&ScriptSources::new(), &SiteConfig::default());
        for id in 0..tree.len() {
            let marker = format!("data-node=\"{id}\"");
            prop_assert_eq!(html.matches(&marker).count(), 1, "node {}", id);
        }
    }
}
