//! File-backed store collaborators.
//!
//! Used by the CLI to prerender a site from JSON exports instead of a live
//! store API.
//!
//! Routes file shape:
//!
//! ```text
//! {
//!   "/shoe-123": { "resource": "products", "slug": "shoe-123", "content": { ... } },
//!   "/nike":     { "resource": "brands", "content": { ... } }
//! }
//! ```

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::store::{StoreData, StoreDataSource, StorefrontRouter};
use crate::types::RouteDescriptor;

// ---------------------------------------------------------------------------
// Store data
// ---------------------------------------------------------------------------

/// Reads the bulk store data from a JSON object file.
///
/// No path, or a path that doesn't exist, yields an empty map.
#[derive(Debug, Clone, Default)]
pub struct JsonStoreData {
    path: Option<PathBuf>,
}

impl JsonStoreData {
    pub fn new(path: Option<PathBuf>) -> Self {
        JsonStoreData { path }
    }
}

#[async_trait]
impl StoreDataSource for JsonStoreData {
    async fn fetch(&self) -> Result<StoreData, StoreError> {
        let Some(path) = &self.path else {
            return Ok(StoreData::new());
        };
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StoreData::new()),
            Err(err) => {
                return Err(StoreError::other(format!("reading {}: {err}", path.display())))
            }
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::other(format!(
                "{} must contain a JSON object",
                path.display()
            ))),
            Err(err) => Err(StoreError::other(format!("parsing {}: {err}", path.display()))),
        }
    }
}

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct RouteEntry {
    resource: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    content: Value,
}

/// Router answering from a fixed URL → resource table.
#[derive(Debug, Clone, Default)]
pub struct JsonRouter {
    routes: HashMap<String, RouteEntry>,
}

impl JsonRouter {
    /// Parse a routes document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let routes = serde_json::from_str(json)?;
        Ok(JsonRouter { routes })
    }

    /// Load a routes file. A missing file yields a router with no routes.
    pub fn load(path: &std::path::Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents)
                .map_err(|e| StoreError::other(format!("parsing {}: {e}", path.display()))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(StoreError::other(format!("reading {}: {err}", path.display()))),
        }
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

#[async_trait]
impl StorefrontRouter for JsonRouter {
    async fn map(&self, url: &str) -> Result<Option<RouteDescriptor>, StoreError> {
        let entry = self
            .routes
            .get(url)
            .ok_or_else(|| StoreError::not_found(format!("no store resource at {url}")))?;
        Ok(Some(RouteDescriptor::resource(
            url,
            entry.resource.clone(),
            entry.slug.clone(),
        )))
    }

    async fn resolve(&self, route: &RouteDescriptor) -> Result<Value, StoreError> {
        self.routes
            .get(route.path())
            .map(|entry| entry.content.clone())
            .ok_or_else(|| StoreError::not_found(format!("no content for {}", route.path())))
    }
}

/// Router for sites without store resources: every URL is "not found".
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRouter;

#[async_trait]
impl StorefrontRouter for NullRouter {
    async fn map(&self, url: &str) -> Result<Option<RouteDescriptor>, StoreError> {
        Err(StoreError::not_found(format!("no store resource at {url}")))
    }

    async fn resolve(&self, route: &RouteDescriptor) -> Result<Value, StoreError> {
        Err(StoreError::not_found(format!("no content for {}", route.path())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
