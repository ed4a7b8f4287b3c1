#![forbid(unsafe_code)]

//! In-memory [`ContentSource`] for loader tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::error::ContentError;
use crate::source::ContentSource;

/// One entry in a [`MemorySource`] fetch log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    Requested(String),
    Completed(String),
}

/// Serves files from a map; anything missing answers HTTP 404.
///
/// Every request and completion is logged so tests can assert on fetch
/// counts and on how fetches overlap. A response can be held back for a
/// number of polls with [`MemorySource::with_latency`].
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    offline: Vec<String>,
    local_file: bool,
    latency: HashMap<String, usize>,
    default_latency: usize,
    log: Rc<RefCell<Vec<FetchEvent>>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.files.insert(path.into(), body.into());
        self
    }

    /// Fail `path` with a network error instead of a status.
    #[must_use]
    pub fn with_network_error(mut self, path: impl Into<String>) -> Self {
        self.offline.push(path.into());
        self
    }

    /// Pretend the page was opened from `file://`.
    #[must_use]
    pub fn opened_from_file(mut self) -> Self {
        self.local_file = true;
        self
    }

    /// Answer `path` only after it has been polled `polls` extra times.
    #[must_use]
    pub fn with_latency(mut self, path: impl Into<String>, polls: usize) -> Self {
        self.latency.insert(path.into(), polls);
        self
    }

    /// Latency for every path without its own [`Self::with_latency`].
    #[must_use]
    pub fn with_default_latency(mut self, polls: usize) -> Self {
        self.default_latency = polls;
        self
    }

    /// Requests and completions so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<FetchEvent> {
        self.log.borrow().clone()
    }

    /// Paths requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                FetchEvent::Requested(path) => Some(path.clone()),
                FetchEvent::Completed(_) => None,
            })
            .collect()
    }

    /// Paths answered so far, in completion order.
    #[must_use]
    pub fn completions(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                FetchEvent::Completed(path) => Some(path.clone()),
                FetchEvent::Requested(_) => None,
            })
            .collect()
    }

    /// Number of requests made for `path`.
    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }

    fn respond(&self, path: &str) -> Result<String, ContentError> {
        if self.offline.iter().any(|p| p == path) {
            return Err(ContentError::Network {
                path: path.to_string(),
                message: "Failed to fetch".to_string(),
            });
        }
        self.files.get(path).cloned().ok_or_else(|| ContentError::Status {
            path: path.to_string(),
            status: 404,
        })
    }
}

impl ContentSource for MemorySource {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, ContentError>> {
        self.log
            .borrow_mut()
            .push(FetchEvent::Requested(path.to_string()));
        PendingFetch {
            path: path.to_string(),
            remaining: self
                .latency
                .get(path)
                .copied()
                .unwrap_or(self.default_latency),
            result: Some(self.respond(path)),
            log: Rc::clone(&self.log),
        }
    }

    fn is_local_file(&self) -> bool {
        self.local_file
    }
}

/// Response that stays pending for `remaining` polls, waking itself each
/// time so the executor keeps driving it.
struct PendingFetch {
    path: String,
    remaining: usize,
    result: Option<Result<String, ContentError>>,
    log: Rc<RefCell<Vec<FetchEvent>>>,
}

impl Future for PendingFetch {
    type Output = Result<String, ContentError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.remaining > 0 {
            self.remaining -= 1;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.log
            .borrow_mut()
            .push(FetchEvent::Completed(self.path.clone()));
        let path = self.path.clone();
        Poll::Ready(self.result.take().unwrap_or_else(|| {
            Err(ContentError::Network {
                path,
                message: "polled after completion".to_string(),
            })
        }))
    }
}
