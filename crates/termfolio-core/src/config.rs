#![forbid(unsafe_code)]

//! Site configuration.
//!
//! The host may pass a JSON-compatible options object at startup; any field
//! it omits takes the default shown here. Defaults match the layout of the
//! published site, so most pages never pass options at all.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::logging::LogConfig;

// ---------------------------------------------------------------------------
// Cycler
// ---------------------------------------------------------------------------

/// Timing for the terminal panel auto-advance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CyclerConfig {
    /// Delay from startup to the first auto-advance.
    /// Default: 900ms
    pub initial_delay_ms: u64,

    /// Delay between consecutive auto-advances.
    /// Default: 3400ms
    pub interval_ms: u64,
}

impl Default for CyclerConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 900,
            interval_ms: 3400,
        }
    }
}

impl CyclerConfig {
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// Top-level configuration for the site behavior layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scripts manifest path. Default: `scripts/index.json`
    pub scripts_manifest: String,
    /// Directory leaf `file` names resolve against. Default: `scripts`
    pub scripts_dir: String,
    /// Projects manifest path. Default: `projects/index.json`
    pub projects_manifest: String,
    /// Directory project folders live under. Default: `projects`
    pub projects_dir: String,
    /// Blog index path. Default: `blog/index.json`
    pub blog_index: String,
    /// Directory post folders live under. Default: `blog`
    pub blog_dir: String,

    /// Element id the script tree is injected into. Default: `scripts-list`
    pub scripts_container: String,
    /// Element id the project grid is injected into. Default: `projects-grid`
    pub projects_container: String,
    /// Element id the blog grid is injected into. Default: `blog-grid`
    pub blog_container: String,

    /// Language badge CSS class by `lang` value.
    pub lang_classes: BTreeMap<String, String>,
    /// Badge class for languages missing from `lang_classes`. Default: `sl-bash`
    pub default_lang_class: String,

    /// Text shown after the contact form is submitted.
    pub contact_ack: String,

    /// Maximum tracing level: `off`, `error`, `warn`, `info`, `debug`, `trace`.
    /// Default: `info`
    pub log_level: String,

    /// Prefix log lines with a UTC `HH:MM:SS` timestamp. Default: false
    pub log_timestamps: bool,

    /// Terminal panel auto-advance timing.
    pub cycler: CyclerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let lang_classes = [
            ("bash", "sl-bash"),
            ("powershell", "sl-ps"),
            ("python", "sl-py"),
            ("js", "sl-js"),
            ("html", "sl-html"),
        ]
        .into_iter()
        .map(|(lang, class)| (lang.to_string(), class.to_string()))
        .collect();

        Self {
            scripts_manifest: "scripts/index.json".into(),
            scripts_dir: "scripts".into(),
            projects_manifest: "projects/index.json".into(),
            projects_dir: "projects".into(),
            blog_index: "blog/index.json".into(),
            blog_dir: "blog".into(),
            scripts_container: "scripts-list".into(),
            projects_container: "projects-grid".into(),
            blog_container: "blog-grid".into(),
            lang_classes,
            default_lang_class: "sl-bash".into(),
            contact_ack: "✓ Message sent! (connect to Formspree or similar to make this real)"
                .into(),
            log_level: "info".into(),
            log_timestamps: false,
            cycler: CyclerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a JSON options object, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Badge class for a script language.
    #[must_use]
    pub fn lang_class(&self, lang: &str) -> &str {
        self.lang_classes
            .get(lang)
            .map_or(self.default_lang_class.as_str(), String::as_str)
    }

    /// Parsed `log_level`, falling back to `INFO` for unknown values.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Line format for [`crate::logging::ConsoleLayer`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            show_time: self.log_timestamps,
            ..LogConfig::default()
        }
    }
}
