//! Error types for storefront-core.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while reading CMS content documents.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Underlying I/O failure other than "file absent".
    #[error("content I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not valid JSON.
    #[error("failed to parse content at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ContentError {
    ContentError::Io {
        path: path.into(),
        source,
    }
}

/// Failure reported by a store collaborator (store-data fetch or router).
///
/// `status` mirrors the HTTP response status of the failed upstream call,
/// when there was one. Statuses below 500 mean "this content does not exist".
/// A failure that started as a [`ContentError`] keeps it as its source.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub status: Option<u16>,
    pub message: String,
    source: Option<Arc<ContentError>>,
}

impl StoreError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        StoreError {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// `404` for content that genuinely does not exist.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Some(404), message)
    }

    /// A failure with no response status attached.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// True when the status marks a client-side miss rather than a server fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status, Some(status) if status < 500)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "store request failed with status {status}: {}", self.message),
            None => write!(f, "store request failed: {}", self.message),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl From<ContentError> for StoreError {
    fn from(err: ContentError) -> Self {
        StoreError {
            status: None,
            message: "CMS content lookup failed".to_string(),
            source: Some(Arc::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(StoreError::not_found("gone").is_not_found());
        assert!(StoreError::new(Some(410), "gone").is_not_found());
        assert!(!StoreError::new(Some(500), "boom").is_not_found());
        assert!(!StoreError::other("no status").is_not_found());
    }

    #[test]
    fn content_failures_keep_their_source() {
        use std::error::Error as _;

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::from(ContentError::Parse {
            path: PathBuf::from("content/blog/broken.json"),
            source: parse,
        });
        assert_eq!(err.status, None);
        assert!(!err.is_not_found());

        let source = err.source().expect("content source");
        let content = source.downcast_ref::<ContentError>().expect("ContentError");
        assert!(matches!(content, ContentError::Parse { .. }));
        assert!(source.source().is_some(), "parse error chain dropped");
        assert!(content.to_string().contains("broken.json"));
    }

    #[test]
    fn display_includes_status() {
        let err = StoreError::not_found("no product at /shoe");
        assert_eq!(
            err.to_string(),
            "store request failed with status 404: no product at /shoe"
        );
    }
}
