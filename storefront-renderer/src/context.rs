//! Render context: the parameters a template sees for one request.
//!
//! Keys, later ones overriding earlier ones:
//!
//! 1. base settings: `settings`, `lang`, `store_id`, `primary_color`,
//!    `secondary_color`, `dev_mode`, `store_format`
//! 2. every key of the shared store data
//! 3. `route`, the active descriptor, never carrying a filename
//!
//! Request-scoped functions are installed on the engine for one call only:
//! `cms(key=...)`, `dictionary()` and `resolve_route()`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tera::{Context, Tera};
use tokio::runtime::Handle;
use tokio::sync::OnceCell;

use storefront_core::{
    Config, ContentError, ContentStore, RouteDescriptor, RouteKind, StoreData, StoreError,
    StorefrontRouter,
};

/// Build the parameter object for one render call.
pub fn build_context(config: &Config, shared: &StoreData, route: &RouteDescriptor) -> Context {
    let mut ctx = Context::new();
    ctx.insert("settings", &config.settings);
    ctx.insert("lang", &config.lang);
    ctx.insert("store_id", &config.store_id);
    ctx.insert("primary_color", &config.primary_color);
    ctx.insert("secondary_color", &config.secondary_color);
    ctx.insert("dev_mode", &config.mode.is_dev());
    ctx.insert("store_format", &config.format);
    for (key, value) in shared {
        ctx.insert(key.as_str(), value);
    }
    ctx.insert("route", route);
    ctx
}

/// State owned by a single render call.
///
/// The resolved-content slot starts empty and is filled at most once, the
/// first time a template asks for it; the error outcome is kept as well.
pub struct RequestScope {
    route: RouteDescriptor,
    lang: String,
    content: Arc<ContentStore>,
    router: Arc<dyn StorefrontRouter>,
    resolved: OnceCell<Result<Value, StoreError>>,
}

impl RequestScope {
    pub fn new(
        route: RouteDescriptor,
        lang: impl Into<String>,
        content: Arc<ContentStore>,
        router: Arc<dyn StorefrontRouter>,
    ) -> Self {
        RequestScope {
            route,
            lang: lang.into(),
            content,
            router,
            resolved: OnceCell::new(),
        }
    }

    /// CMS document or folder listing; `null` when absent.
    pub fn cms(&self, key: &str) -> Result<Value, ContentError> {
        self.content.get(key).map(|lookup| lookup.into_value())
    }

    /// Dictionary of the active language; `null` when absent.
    pub fn dictionary(&self) -> Result<Value, ContentError> {
        self.content.dictionary(&self.lang).map(|lookup| lookup.into_value())
    }

    /// Resolved content of the active route, computed on first use.
    pub async fn resolved(&self) -> Result<Value, StoreError> {
        self.resolved.get_or_init(|| self.resolve()).await.clone()
    }

    /// True once [`RequestScope::resolved`] has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    async fn resolve(&self) -> Result<Value, StoreError> {
        match self.route.kind() {
            RouteKind::Resource { .. } => self.router.resolve(&self.route).await,
            RouteKind::Collection { collection, slug } => {
                let content = self.cms(&format!("{collection}/{slug}"))?;
                Ok(json!({
                    "collection": collection,
                    "slug": slug,
                    "content": content,
                }))
            }
            RouteKind::Page { .. } | RouteKind::Unresolved => Ok(json!({})),
        }
    }

    /// Register this scope's functions on `tera`.
    ///
    /// `resolve_route()` blocks on `handle`, so the engine must render on a
    /// blocking thread, never on a runtime worker.
    pub fn install(self: &Arc<Self>, tera: &mut Tera, handle: Handle) {
        let scope = Arc::clone(self);
        tera.register_function("cms", move |args: &HashMap<String, Value>| {
            let key = args
                .get("key")
                .and_then(Value::as_str)
                .ok_or_else(|| tera::Error::msg("cms() requires a string `key` argument"))?;
            scope
                .cms(key)
                .map_err(|e| tera::Error::chain(format!("cms(key=\"{key}\") failed"), e))
        });

        let scope = Arc::clone(self);
        tera.register_function("dictionary", move |_: &HashMap<String, Value>| {
            scope
                .dictionary()
                .map_err(|e| tera::Error::chain("dictionary() failed", e))
        });

        let scope = Arc::clone(self);
        tera.register_function("resolve_route", move |_: &HashMap<String, Value>| {
            handle
                .block_on(scope.resolved())
                .map_err(|e| tera::Error::chain("resolve_route() failed", e))
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
