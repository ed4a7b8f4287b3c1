#![forbid(unsafe_code)]

//! Content fetch and parse errors.

/// Failure to obtain or decode one content file.
///
/// Every variant carries the relative path that was requested so that
/// placeholders and log lines can cite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The request could not be issued or the transport failed.
    Network { path: String, message: String },
    /// The server answered with a non-success status.
    Status { path: String, status: u16 },
    /// The body was not valid JSON for the expected shape.
    Parse { path: String, message: String },
}

impl ContentError {
    /// Build a [`ContentError::Parse`] from a serde error.
    pub fn parse(path: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Relative path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Network { path, .. } | Self::Status { path, .. } | Self::Parse { path, .. } => {
                path
            }
        }
    }

    /// Human-readable detail, without the path.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Network { message, .. } | Self::Parse { message, .. } => message.clone(),
            Self::Status { status, .. } => format!("HTTP {status}"),
        }
    }
}

impl core::fmt::Display for ContentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network { path, message } => write!(f, "fetch {path} failed: {message}"),
            Self::Status { path, status } => write!(f, "fetch {path} returned HTTP {status}"),
            Self::Parse { path, message } => write!(f, "parse {path} failed: {message}"),
        }
    }
}

impl std::error::Error for ContentError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_cites_path() {
        let err = ContentError::Status {
            path: "blog/index.json".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "fetch blog/index.json returned HTTP 404");
        assert_eq!(err.path(), "blog/index.json");
        assert_eq!(err.detail(), "HTTP 404");
    }

    #[test]
    fn parse_wraps_serde_message() {
        let serde_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = ContentError::parse("scripts/index.json", &serde_err);
        assert_eq!(err.path(), "scripts/index.json");
        assert!(err.to_string().starts_with("parse scripts/index.json failed:"));
    }
}
