#![forbid(unsafe_code)]

//! WASM frontend for termfolio.
//!
//! This crate is host-specific: it binds DOM events, injects rendered
//! markup, implements content fetching over `window.fetch`, and schedules
//! the panel cycler's timers. All decisions are delegated to
//! `termfolio-core`.
//!
//! The JS entry point is `start(options?)`:
//!
//! ```js
//! import init, { start } from "./pkg/termfolio_web.js";
//! await init();
//! start({ log_level: "debug", cycler: { interval_ms: 5000 } });
//! ```

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::start;

/// `location.protocol` of pages opened straight from disk.
pub const LOCAL_FILE_PROTOCOL: &str = "file:";

/// Whether a `location.protocol` value means the page was opened from the
/// local filesystem, where browsers refuse `fetch()`.
#[must_use]
pub fn is_local_protocol(protocol: &str) -> bool {
    protocol.eq_ignore_ascii_case(LOCAL_FILE_PROTOCOL)
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
pub fn start() {
    tracing::debug!("termfolio-web start() is a no-op outside wasm32");
}
