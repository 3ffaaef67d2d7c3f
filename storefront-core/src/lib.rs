//! Storefront core library: domain types, configuration, CMS content and
//! store collaborator contracts.
//!
//! - [`types`]: [`RouteDescriptor`] and execution/template modes
//! - [`config`]: [`Config`] loaded once from settings and env
//! - [`content`]: [`ContentStore`] for CMS JSON documents
//! - [`store`]: [`StoreDataSource`] and [`StorefrontRouter`] traits
//! - [`local`]: file-backed implementations of the store traits

pub mod config;
pub mod content;
pub mod error;
pub mod local;
pub mod paths;
pub mod store;
pub mod types;

pub use config::{Config, StoreFormat};
pub use content::{ContentStore, Lookup};
pub use error::{ContentError, StoreError};
pub use local::{JsonRouter, JsonStoreData, NullRouter};
pub use paths::SitePaths;
pub use store::{StoreData, StoreDataSource, StorefrontRouter};
pub use types::{ExecutionMode, RouteDescriptor, RouteKind, TemplateMode, STORE_RESOURCES};
