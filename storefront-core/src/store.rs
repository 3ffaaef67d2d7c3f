//! Store collaborators consumed by the renderer.
//!
//! Both traits are object-safe through `async_trait` and are shared as
//! `Arc<dyn …>` for the lifetime of the process.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::types::RouteDescriptor;

/// Bulk store data merged wholesale into every render context.
pub type StoreData = Map<String, Value>;

/// One-shot fetch of the bulk store data.
#[async_trait]
pub trait StoreDataSource: Send + Sync {
    async fn fetch(&self) -> Result<StoreData, StoreError>;
}

/// Maps URLs to store resources and resolves their content.
#[async_trait]
pub trait StorefrontRouter: Send + Sync {
    /// Map a URL to a resource descriptor. `Ok(None)` means "no match";
    /// a rejection with a status below 500 means "not found".
    async fn map(&self, url: &str) -> Result<Option<RouteDescriptor>, StoreError>;

    /// Resolve the content of a resource descriptor.
    async fn resolve(&self, route: &RouteDescriptor) -> Result<Value, StoreError>;
}
