#![forbid(unsafe_code)]

//! [`ContentSource`] over `window.fetch`.

use termfolio_core::{ContentError, ContentSource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use crate::is_local_protocol;

pub(crate) struct WebSource {
    window: Window,
    local_file: bool,
}

impl WebSource {
    pub(crate) fn new(window: Window) -> Self {
        let local_file = window
            .location()
            .protocol()
            .is_ok_and(|protocol| is_local_protocol(&protocol));
        Self { window, local_file }
    }
}

impl ContentSource for WebSource {
    async fn fetch_text(&self, path: &str) -> Result<String, ContentError> {
        let network = |err: JsValue| ContentError::Network {
            path: path.to_string(),
            message: js_message(&err),
        };

        let resp = JsFuture::from(self.window.fetch_with_str(path))
            .await
            .map_err(network)?;
        let resp: Response = resp.dyn_into().map_err(network)?;
        if !resp.ok() {
            return Err(ContentError::Status {
                path: path.to_string(),
                status: resp.status(),
            });
        }

        let body = JsFuture::from(resp.text().map_err(network)?)
            .await
            .map_err(network)?;
        body.as_string().ok_or_else(|| ContentError::Network {
            path: path.to_string(),
            message: "response body is not text".to_string(),
        })
    }

    fn is_local_file(&self) -> bool {
        self.local_file
    }
}

/// Best-effort message from a thrown JS value.
fn js_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
