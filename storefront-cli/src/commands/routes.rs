//! `storefront routes`: list what the site can render.

use anyhow::{Context, Result};
use clap::Args;

use storefront_renderer::cache::{cache_keys, page_urls, TemplateCache};

use super::SiteArgs;

/// Arguments for `storefront routes`.
#[derive(Args, Debug)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl RoutesArgs {
    pub fn run(self) -> Result<()> {
        let config = self.site.config();
        let cache = TemplateCache::from_config(&config);

        println!("Template keys ({}):", config.mode);
        for (key, file) in cache_keys(&config) {
            let state = if cache.is_compiled(&key) {
                "precompiled"
            } else if file.is_file() {
                "on demand"
            } else {
                "missing"
            };
            println!("  {key:<14} {state}");
        }

        let urls = page_urls(&config.paths.pages).with_context(|| {
            format!("failed to list page templates under {}", config.paths.pages.display())
        })?;
        println!("Pages ({}):", urls.len());
        for url in urls {
            println!("  {url}");
        }

        if let Some(router) = self.site.json_router()? {
            let mut urls: Vec<&str> = router.urls().collect();
            urls.sort_unstable();
            println!("Store routes ({}):", urls.len());
            for url in urls {
                println!("  {url}");
            }
        }
        Ok(())
    }
}
