pub mod prerender;
pub mod render;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use storefront_core::{
    Config, ExecutionMode, JsonRouter, JsonStoreData, NullRouter, StorefrontRouter,
};
use storefront_renderer::Renderer;

/// Site options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Site root holding `content/` and `pages/`.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Production mode: precompiled templates and cached content.
    #[arg(long)]
    pub production: bool,

    /// JSON object merged into every render context.
    #[arg(long, value_name = "FILE")]
    pub store_data: Option<PathBuf>,

    /// JSON table mapping URLs to store resources.
    #[arg(long, value_name = "FILE")]
    pub routes: Option<PathBuf>,
}

impl SiteArgs {
    pub fn config(&self) -> Config {
        let config = Config::load(&self.root);
        if self.production {
            config.with_mode(ExecutionMode::Production)
        } else {
            config
        }
    }

    /// The routes file as a router, if one was given.
    pub fn json_router(&self) -> Result<Option<JsonRouter>> {
        self.routes
            .as_deref()
            .map(|path| {
                JsonRouter::load(path)
                    .with_context(|| format!("failed to load routes from {}", path.display()))
            })
            .transpose()
    }

    pub fn renderer(&self) -> Result<Renderer> {
        let router: Arc<dyn StorefrontRouter> = match self.json_router()? {
            Some(router) => Arc::new(router),
            None => Arc::new(NullRouter),
        };
        let source = Arc::new(JsonStoreData::new(self.store_data.clone()));
        Ok(Renderer::new(self.config(), source, router))
    }
}
