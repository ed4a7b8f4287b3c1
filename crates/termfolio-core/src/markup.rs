#![forbid(unsafe_code)]

//! Markup fragments shared by the section renderers.

use std::fmt::Write;

use crate::error::ContentError;
use crate::escape::{escape_html, escape_html_into};

/// Append one `<span class="{class}">` pill per tag.
pub fn push_pills(out: &mut String, class: &str, tags: &[String]) {
    for tag in tags {
        let _ = write!(out, "<span class=\"{class}\">");
        escape_html_into(out, tag);
        out.push_str("</span>");
    }
}

/// A `loading-msg` paragraph holding plain text.
#[must_use]
pub fn loading_msg(text: &str) -> String {
    format!("<p class=\"loading-msg\">{}</p>", escape_html(text))
}

/// Section-level placeholder for a manifest that could not be loaded.
///
/// Pages opened from `file://` get an explanation of why `fetch()` is
/// blocked instead of the raw error.
#[must_use]
pub fn section_error(file: &str, err: &ContentError, local_file: bool) -> String {
    if local_file {
        return concat!(
            "<p class=\"loading-msg\">\n",
            "  ⚠️ You're opening the site directly as a file (<code>file://</code>).<br>\n",
            "  Browsers block <code>fetch()</code> on local files for security reasons.<br><br>\n",
            "  <strong>To test locally, run a simple server:</strong><br>\n",
            "  <code>python3 -m http.server 8000</code><br>\n",
            "  Then open <a href=\"http://localhost:8000\" style=\"color:var(--accent)\">",
            "http://localhost:8000</a><br><br>\n",
            "  On GitHub Pages this will work automatically.\n",
            "</p>"
        )
        .to_string();
    }
    format!(
        "<p class=\"loading-msg\">Could not load <code>{}</code> - make sure the file exists.\
         <br><small>{}</small></p>",
        escape_html(file),
        escape_html(&err.detail()),
    )
}
