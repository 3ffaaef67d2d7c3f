//! # storefront-renderer
//!
//! Tera-based server-side rendering for storefront pages. A [`Renderer`]
//! turns a request URL into HTML markup, or into `None` when the URL should
//! fall through to static file serving.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_core::{Config, JsonStoreData, NullRouter};
//! use storefront_renderer::Renderer;
//!
//! async fn home(root: &str) -> Option<String> {
//!     let renderer = Renderer::new(
//!         Config::load(root),
//!         Arc::new(JsonStoreData::new(None)),
//!         Arc::new(NullRouter),
//!     );
//!     renderer.render("/", None).await.ok().flatten()
//! }
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod helpers;
pub mod renderer;
pub mod resolver;

pub use cache::{page_urls, TemplateCache};
pub use context::{build_context, RequestScope};
pub use error::RenderError;
pub use renderer::Renderer;
pub use resolver::{is_content_path, RouteResolver};
