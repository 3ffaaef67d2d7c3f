//! Error types for storefront-renderer.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use storefront_core::StoreError;

/// All errors that can arise while resolving and rendering a URL.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (syntax, missing include, runtime failure).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure from the store-data fetch or the storefront router.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A descriptor named a resource or collection with no template.
    #[error("no template registered for '{0}'")]
    UnknownTemplate(String),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RenderError {
    /// Response status attached anywhere in this error's source chain.
    ///
    /// Template functions report store failures as chained tera errors, so the
    /// chain is walked until a [`StoreError`] turns up.
    pub fn status(&self) -> Option<u16> {
        if let RenderError::Store(err) = self {
            return err.status;
        }
        let mut source: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = source {
            if let Some(store) = err.downcast_ref::<StoreError>() {
                return store.status;
            }
            source = err.source();
        }
        None
    }

    /// True for not-found-class failures, which fall through instead of failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(status) if status < 500)
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
