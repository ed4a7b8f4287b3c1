#![forbid(unsafe_code)]

//! Browser console sink for the core tracing layer.

use termfolio_core::SiteConfig;
use termfolio_core::logging::{ConsoleLayer, LogSink};
use tracing::Level;
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

/// Routes each level to the matching `console.*` method so devtools level
/// filtering keeps working.
pub(crate) struct BrowserConsole;

impl LogSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
        }
    }
}

/// Install the global subscriber. A second call is ignored.
pub(crate) fn install(config: &SiteConfig) {
    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::with_config(BrowserConsole, config.log_config()))
        .with(config.level_filter());
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        web_sys::console::debug_1(&JsValue::from_str("termfolio: tracing already installed"));
    }
}
