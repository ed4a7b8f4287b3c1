#![forbid(unsafe_code)]

//! Core: content model, markup rendering, and UI state for the termfolio site.
//!
//! Everything in this crate is host-agnostic and deterministic. The web
//! adapter (`termfolio-web`) owns the DOM and the clock; this crate owns the
//! decisions:
//!
//! - **Manifests**: typed script/project/blog manifests with strict parsing.
//! - **Rendering**: HTML fragments with every authored string escaped.
//! - **Script tree**: effective-tag accumulation and bottom-up visibility.
//! - **State machines**: section router and terminal panel cycler.
//! - **Loaders**: fetch-render pipelines written against [`ContentSource`].

pub mod blog;
pub mod config;
pub mod cycler;
pub mod error;
pub mod escape;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod manifest;
pub mod markup;
pub mod projects;
pub mod router;
pub mod script_tree;
pub mod source;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::{CyclerConfig, SiteConfig};
pub use error::ContentError;
pub use filter::{FilterState, ScriptFilter, TagFilter};
pub use loader::{LoadStatus, ScriptsLoad, SectionLoad};
pub use router::{LoadState, Navigation, Router, SectionKind};
pub use script_tree::{ScriptTree, Visibility};
pub use source::ContentSource;
