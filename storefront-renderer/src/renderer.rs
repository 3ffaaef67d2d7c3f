//! Renderer orchestrator: URL in, markup or fall-through out.
//!
//! For every call:
//!
//! 1. wait for the shared store data (fetched at most once per renderer)
//! 2. classify the URL with the [`RouteResolver`]
//! 3. build a request-scoped context around the shared data
//! 4. render the page file, or the cache entry for the resource/collection
//! 5. classify failures: statuses below 500 fall through, the rest are fatal

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::OnceCell;

use storefront_core::{
    Config, ContentStore, RouteDescriptor, RouteKind, StoreData, StoreDataSource, StoreError,
    StorefrontRouter,
};

use crate::cache::TemplateCache;
use crate::context::{build_context, RequestScope};
use crate::error::RenderError;
use crate::resolver::RouteResolver;

enum Target {
    File(PathBuf),
    Key(String),
}

/// Shared, immutable-after-init rendering state. Cheap to share behind `Arc`.
pub struct Renderer {
    config: Arc<Config>,
    cache: Arc<TemplateCache>,
    content: Arc<ContentStore>,
    router: Arc<dyn StorefrontRouter>,
    resolver: RouteResolver,
    source: Arc<dyn StoreDataSource>,
    store_data: OnceCell<Result<Arc<StoreData>, StoreError>>,
}

impl Renderer {
    /// Build the renderer, compiling templates according to
    /// `config.template_mode`.
    pub fn new(
        config: Config,
        source: Arc<dyn StoreDataSource>,
        router: Arc<dyn StorefrontRouter>,
    ) -> Self {
        let cache = TemplateCache::from_config(&config);
        Self::with_cache(config, cache, source, router)
    }

    pub fn with_cache(
        config: Config,
        cache: TemplateCache,
        source: Arc<dyn StoreDataSource>,
        router: Arc<dyn StorefrontRouter>,
    ) -> Self {
        let content = Arc::new(ContentStore::new(config.paths.content.clone(), config.mode));
        let resolver = RouteResolver::new(
            config.paths.pages.clone(),
            config.cms_collections.clone(),
            Arc::clone(&router),
        );
        Renderer {
            config: Arc::new(config),
            cache: Arc::new(cache),
            content,
            router,
            resolver,
            source,
            store_data: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Start the shared store-data fetch without rendering anything.
    pub async fn warm_up(&self) -> Result<(), RenderError> {
        self.store_data().await.map(|_| ())
    }

    /// Render `url`. `route` skips URL classification when it has a path.
    ///
    /// `Ok(None)` means the URL is not a content page and should be served by
    /// other means (static files, a generic not-found page).
    pub async fn render(
        &self,
        url: &str,
        route: Option<RouteDescriptor>,
    ) -> Result<Option<String>, RenderError> {
        match self.try_render(url, route).await {
            Ok(markup) => Ok(markup),
            Err(err) if err.is_not_found() => {
                tracing::debug!(url, status = ?err.status(), error = %err, "content not found, falling through");
                Ok(None)
            }
            Err(err) => {
                tracing::error!(url, error = %err, "render failed");
                Err(err)
            }
        }
    }

    async fn try_render(
        &self,
        url: &str,
        route: Option<RouteDescriptor>,
    ) -> Result<Option<String>, RenderError> {
        let shared = self.store_data().await?;

        let Some(mut route) = self.resolver.resolve(url, route).await? else {
            return Ok(None);
        };
        let target = match (route.take_filename(), route.kind()) {
            (Some(file), _) => Target::File(file),
            (None, RouteKind::Resource { resource }) => Target::Key(resource.to_owned()),
            (None, RouteKind::Collection { collection, .. }) => Target::Key(collection.to_owned()),
            (None, RouteKind::Page { .. } | RouteKind::Unresolved) => {
                tracing::debug!(url, "descriptor has nothing to render");
                return Ok(None);
            }
        };

        let ctx = build_context(&self.config, &shared, &route);
        let scope = Arc::new(RequestScope::new(
            route,
            self.config.lang.clone(),
            Arc::clone(&self.content),
            Arc::clone(&self.router),
        ));

        let cache = Arc::clone(&self.cache);
        let handle = Handle::current();
        let markup = tokio::task::spawn_blocking(move || {
            let install = |tera: &mut tera::Tera| scope.install(tera, handle);
            match target {
                Target::File(file) => cache.render_file(&file, &ctx, install),
                Target::Key(key) => cache.render(&key, &ctx, install),
            }
        })
        .await??;

        Ok(Some(markup))
    }

    /// The one shared store-data fetch. Concurrent first callers wait on the
    /// same initialization; the outcome, success or failure, is kept.
    async fn store_data(&self) -> Result<Arc<StoreData>, RenderError> {
        let result = self
            .store_data
            .get_or_init(|| async {
                let data = self.source.fetch().await.map(Arc::new);
                match &data {
                    Ok(data) => tracing::info!(keys = data.len(), "store data loaded"),
                    Err(err) => tracing::error!(error = %err, "store data fetch failed"),
                }
                data
            })
            .await;
        result.clone().map_err(RenderError::from)
    }
}
