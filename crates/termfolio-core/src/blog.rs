#![forbid(unsafe_code)]

//! Blog grid rendering.

use crate::error::ContentError;
use crate::escape::escape_html;
use crate::manifest::PostMeta;
use crate::markup::loading_msg;

/// Shown when the blog index is empty.
pub const EMPTY_MESSAGE: &str =
    "No posts yet. Add folders to blog/ and list them in blog/index.json.";

/// Path of a post's metadata file.
#[must_use]
pub fn post_meta_path(blog_dir: &str, slug: &str) -> String {
    format!("{}/{slug}/post.json", blog_dir.trim_end_matches('/'))
}

/// Render one post card, or a degraded card citing the slug.
#[must_use]
pub fn render_card(blog_dir: &str, slug: &str, post: Result<&PostMeta, &ContentError>) -> String {
    let Ok(post) = post else {
        return format!(
            "<div class=\"blog-card\"><h3>{}</h3><p>Could not load post.json</p></div>",
            escape_html(slug)
        );
    };
    format!(
        "\n<a href=\"{}/{}/index.html\" class=\"blog-card\">\
         \n  <div class=\"blog-meta\">\
         \n    <span class=\"blog-date\">{}</span>\
         \n    <span class=\"blog-tag\">{}</span>\
         \n  </div>\
         \n  <h3>{}</h3>\
         \n  <p>{}</p>\
         \n  <span class=\"blog-read\">Read →</span>\
         \n</a>",
        escape_html(blog_dir.trim_end_matches('/')),
        escape_html(slug),
        escape_html(&post.date),
        escape_html(&post.tag),
        escape_html(&post.title),
        escape_html(&post.desc),
    )
}

/// Join rendered cards, substituting the empty-state message.
#[must_use]
pub fn render_grid(cards: Vec<String>) -> String {
    if cards.is_empty() {
        return loading_msg(EMPTY_MESSAGE);
    }
    cards.concat()
}
