//! URL classification.
//!
//! Decision order, first match wins:
//!
//! 1. a pre-resolved descriptor with a non-empty path is returned unchanged
//! 2. `/` is treated as `/index`
//! 3. URLs failing [`is_content_path`] are static files → `None`
//! 4. `pages/<url>.html` exists → page descriptor carrying the filename
//! 5. `/<collection>/<slug>` with a configured CMS collection → collection
//!    descriptor (content existence is checked later, on resolution)
//! 6. anything else is mapped by the storefront router

use std::path::PathBuf;
use std::sync::Arc;

use storefront_core::paths::{join_key, TEMPLATE_EXT};
use storefront_core::{RouteDescriptor, StoreError, StorefrontRouter};

/// First path segments reserved for static assets.
pub const ASSET_PREFIXES: &[&str] = &["assets", "img"];

/// Suffix prefixes that mark a static file. Matching is by prefix, so
/// `.json` is caught by `js` and `.jpeg` by `jp…` entries alike.
pub const STATIC_EXTENSIONS: &[&str] = &["js", "css", "txt", "png", "gif", "jpg", "jpeg", "webp", "svg"];

/// Whether `url` may address a renderable page.
///
/// A URL qualifies when, for some `/` in it, the text after that slash:
/// - does not start with a reserved asset segment (`assets`, `img`) followed
///   by `/` or the end of the URL,
/// - has a non-empty part before its first `.`,
/// - and every following `.`-separated suffix is non-empty and does not start
///   with a static file extension.
///
/// Dots elsewhere are fine: `/docs/v1.2` is a page, `/app.js` is not.
pub fn is_content_path(url: &str) -> bool {
    url.match_indices('/')
        .any(|(i, _)| matches_after_slash(&url[i + 1..]))
}

fn matches_after_slash(rest: &str) -> bool {
    let reserved = ASSET_PREFIXES.iter().any(|prefix| {
        rest.strip_prefix(prefix)
            .is_some_and(|after| after.is_empty() || after.starts_with('/'))
    });
    if reserved {
        return false;
    }

    let mut parts = rest.split('.');
    let head = parts.next().unwrap_or_default();
    if head.is_empty() {
        return false;
    }
    parts.all(|suffix| {
        !suffix.is_empty() && !STATIC_EXTENSIONS.iter().any(|ext| suffix.starts_with(ext))
    })
}

/// Classifies URLs into route descriptors.
pub struct RouteResolver {
    pages: PathBuf,
    collections: Vec<String>,
    router: Arc<dyn StorefrontRouter>,
}

impl RouteResolver {
    pub fn new(
        pages: impl Into<PathBuf>,
        collections: Vec<String>,
        router: Arc<dyn StorefrontRouter>,
    ) -> Self {
        RouteResolver {
            pages: pages.into(),
            collections,
            router,
        }
    }

    /// Classify `url`, or pass `route` through when it is already resolved.
    /// `Ok(None)` means "not a content route".
    pub async fn resolve(
        &self,
        url: &str,
        route: Option<RouteDescriptor>,
    ) -> Result<Option<RouteDescriptor>, StoreError> {
        if let Some(route) = route.filter(|r| !r.path().is_empty()) {
            return Ok(Some(route));
        }

        let url = if url == "/" { "/index" } else { url };
        if !is_content_path(url) {
            return Ok(None);
        }

        if let Some(filename) = self.page_file(url) {
            return Ok(Some(RouteDescriptor::page(url, filename)));
        }

        let mut segments = url.split('/').skip(1);
        let collection = segments.next().unwrap_or_default();
        let slug = segments.next().unwrap_or_default();
        if !slug.is_empty() && self.collections.iter().any(|c| c == collection) {
            return Ok(Some(RouteDescriptor::collection(url, collection, slug)));
        }

        self.router.map(url).await
    }

    /// `pages/<url>.html`, when that file exists.
    fn page_file(&self, url: &str) -> Option<PathBuf> {
        let base = join_key(&self.pages, url)?;
        let mut file = base.into_os_string();
        file.push(format!(".{TEMPLATE_EXT}"));
        let file = PathBuf::from(file);
        file.is_file().then_some(file)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
