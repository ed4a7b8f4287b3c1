#![forbid(unsafe_code)]

//! HTML escaping for text interpolated into markup strings.
//!
//! Every authored string that reaches an HTML fragment (names, descriptions,
//! tags, titles, file contents, attribute values) goes through
//! [`escape_html_into`]. The five escaped characters cover both text content
//! and double- or single-quoted attribute values.

/// HTML-escape a string into the output buffer.
pub fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape a string into a new allocation.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html_into(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_all_special_chars() {
        assert_eq!(
            escape_html("<script>alert(\"hi&bye\")</script>"),
            "&lt;script&gt;alert(&quot;hi&amp;bye&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn escapes_single_quote() {
        assert_eq!(escape_html("it's"), "it&#039;s");
    }

    #[test]
    fn passthrough_normal() {
        assert_eq!(escape_html("Hello World 123"), "Hello World 123");
    }

    #[test]
    fn ampersand_escaped_first_not_twice() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn empty_and_unicode() {
        assert_eq!(escape_html(""), "");
        assert_eq!(escape_html("📁 café"), "📁 café");
    }

    #[test]
    fn into_appends() {
        let mut out = String::from("<p>");
        escape_html_into(&mut out, "<b>\"x\"</b>");
        out.push_str("</p>");
        assert_eq!(out, "<p>&lt;b&gt;&quot;x&quot;&lt;/b&gt;</p>");
    }
}
