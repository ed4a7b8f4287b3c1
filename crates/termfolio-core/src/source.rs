#![forbid(unsafe_code)]

//! Content retrieval seam.
//!
//! Loaders are written against [`ContentSource`] so the same fetch-render
//! pipelines run over `window.fetch` in the browser and over in-memory files
//! in tests.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::ContentError;
use crate::manifest::parse_json;

/// Something that can retrieve site-relative files as text.
pub trait ContentSource {
    /// Fetch `path` (relative to the page) as text. Non-success responses
    /// are errors.
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, ContentError>>;

    /// Whether the page was opened from the local filesystem, where browsers
    /// refuse `fetch()`. Only affects placeholder wording.
    fn is_local_file(&self) -> bool {
        false
    }
}

/// Fetch `path` and decode it as JSON.
pub async fn fetch_json<S, T>(source: &S, path: &str) -> Result<T, ContentError>
where
    S: ContentSource,
    T: DeserializeOwned,
{
    let text = source.fetch_text(path).await?;
    parse_json(path, &text)
}
