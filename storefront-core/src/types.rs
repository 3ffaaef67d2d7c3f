//! Domain types shared by the resolver, the renderer and the store collaborators.
//!
//! A [`RouteDescriptor`] is created fresh for every request and consumed once.
//! It is always in exactly one of the states described by [`RouteKind`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Store resources
// ---------------------------------------------------------------------------

/// Store entity types whose URLs are identified by the storefront router.
pub const STORE_RESOURCES: &[&str] = &["products", "brands", "categories", "collections"];

/// Execution mode of the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// No caching; templates and content are re-read on every request.
    #[default]
    Development,
    /// Templates precompiled and content cached for the process lifetime.
    Production,
}

impl ExecutionMode {
    /// Interpret the value of the mode environment variable.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("production") => ExecutionMode::Production,
            _ => ExecutionMode::Development,
        }
    }

    pub fn is_dev(self) -> bool {
        matches!(self, ExecutionMode::Development)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Development => write!(f, "development"),
            ExecutionMode::Production => write!(f, "production"),
        }
    }
}

/// How resource and collection templates are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    /// Parse every template once at startup and reuse it.
    Precompiled,
    /// Load and parse the template file from disk on every call.
    OnDemand,
}

impl From<ExecutionMode> for TemplateMode {
    fn from(mode: ExecutionMode) -> Self {
        match mode {
            ExecutionMode::Production => TemplateMode::Precompiled,
            ExecutionMode::Development => TemplateMode::OnDemand,
        }
    }
}

// ---------------------------------------------------------------------------
// RouteDescriptor
// ---------------------------------------------------------------------------

/// The unit passed between the route resolver and the renderer.
///
/// `filename` is private and never serialized, so a descriptor exposed to a
/// template context can't leak a filesystem path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip)]
    filename: Option<PathBuf>,
    /// Router-specific fields (ids, names) carried through to templates.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Borrowed view of the mutually exclusive descriptor states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind<'a> {
    /// Served by rendering a page-specific template file directly.
    Page { filename: &'a Path },
    /// Served by the storefront router's own resolution.
    Resource { resource: &'a str },
    /// Served by the generic template of a CMS collection.
    Collection { collection: &'a str, slug: &'a str },
    /// Not a content route.
    Unresolved,
}

impl RouteDescriptor {
    /// Descriptor with no classification yet.
    pub fn new(path: impl Into<String>) -> Self {
        RouteDescriptor {
            path: path.into(),
            resource: None,
            collection: None,
            slug: None,
            filename: None,
            extra: Map::new(),
        }
    }

    pub fn page(path: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        RouteDescriptor {
            filename: Some(filename.into()),
            ..Self::new(path)
        }
    }

    pub fn resource(
        path: impl Into<String>,
        resource: impl Into<String>,
        slug: Option<String>,
    ) -> Self {
        RouteDescriptor {
            resource: Some(resource.into()),
            slug,
            ..Self::new(path)
        }
    }

    pub fn collection(
        path: impl Into<String>,
        collection: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        RouteDescriptor {
            collection: Some(collection.into()),
            slug: Some(slug.into()),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Remove and return the page filename. A stray `filename` field that
    /// arrived through deserialization is dropped as well.
    pub fn take_filename(&mut self) -> Option<PathBuf> {
        self.extra.remove("filename");
        self.filename.take()
    }

    /// Classify the descriptor. A filename wins over a resource, which wins
    /// over a collection; a collection without a slug is unresolved.
    pub fn kind(&self) -> RouteKind<'_> {
        if let Some(filename) = &self.filename {
            return RouteKind::Page { filename: filename.as_path() };
        }
        if let Some(resource) = &self.resource {
            return RouteKind::Resource { resource: resource.as_str() };
        }
        match (&self.collection, &self.slug) {
            (Some(collection), Some(slug)) => RouteKind::Collection {
                collection: collection.as_str(),
                slug: slug.as_str(),
            },
            _ => RouteKind::Unresolved,
        }
    }

    /// Key of the shared template serving this descriptor, if any.
    pub fn template_key(&self) -> Option<&str> {
        self.resource.as_deref().or(self.collection.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execution_mode_from_env() {
        assert_eq!(ExecutionMode::from_env_value(Some("production")), ExecutionMode::Production);
        assert_eq!(ExecutionMode::from_env_value(Some(" Production ")), ExecutionMode::Production);
        assert_eq!(ExecutionMode::from_env_value(Some("staging")), ExecutionMode::Development);
        assert_eq!(ExecutionMode::from_env_value(None), ExecutionMode::Development);
    }

    #[test]
    fn template_mode_follows_execution_mode() {
        assert_eq!(TemplateMode::from(ExecutionMode::Production), TemplateMode::Precompiled);
        assert_eq!(TemplateMode::from(ExecutionMode::Development), TemplateMode::OnDemand);
    }

    #[test]
    fn kinds_are_exclusive() {
        let page = RouteDescriptor::page("/about", "/site/pages/about.html");
        assert!(matches!(page.kind(), RouteKind::Page { .. }));

        let product = RouteDescriptor::resource("/shoe", "products", None);
        assert_eq!(product.kind(), RouteKind::Resource { resource: "products" });
        assert_eq!(product.template_key(), Some("products"));

        let post = RouteDescriptor::collection("/blog/hi", "blog", "hi");
        assert_eq!(post.kind(), RouteKind::Collection { collection: "blog", slug: "hi" });

        assert_eq!(RouteDescriptor::new("/x").kind(), RouteKind::Unresolved);
    }

    #[test]
    fn filename_is_never_serialized() {
        let page = RouteDescriptor::page("/about", "/site/pages/about.html");
        let value = serde_json::to_value(&page).expect("serialize");
        assert_eq!(value, json!({ "path": "/about" }));
    }

    #[test]
    fn deserializes_router_fields_into_extra() {
        let route: RouteDescriptor = serde_json::from_value(json!({
            "path": "/shoe-123",
            "resource": "products",
            "_id": "5e8f",
        }))
        .expect("deserialize");
        assert_eq!(route.template_key(), Some("products"));
        assert_eq!(route.extra()["_id"], json!("5e8f"));
        assert!(route.filename().is_none());
    }

    #[test]
    fn take_filename_strips_page_state() {
        let mut page = RouteDescriptor::page("/about", "/site/pages/about.html");
        assert_eq!(page.take_filename(), Some(PathBuf::from("/site/pages/about.html")));
        assert_eq!(page.kind(), RouteKind::Unresolved);
    }

    #[test]
    fn take_filename_drops_deserialized_filename_field() {
        let mut route: RouteDescriptor = serde_json::from_value(json!({
            "path": "/x",
            "filename": "/etc/passwd",
        }))
        .expect("deserialize");
        assert!(route.take_filename().is_none());
        let value = serde_json::to_value(&route).expect("serialize");
        assert!(value.get("filename").is_none());
    }
}
