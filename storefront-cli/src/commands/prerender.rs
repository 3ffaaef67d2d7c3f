//! `storefront prerender`: render URLs to static HTML files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use storefront_core::paths::join_key;
use storefront_core::{Config, ContentStore, Lookup};
use storefront_renderer::page_urls;

use super::SiteArgs;

/// Arguments for `storefront prerender`.
#[derive(Args, Debug)]
pub struct PrerenderArgs {
    /// URLs to render. Defaults to every page template, routes-file URL and
    /// CMS collection entry.
    pub urls: Vec<String>,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Output directory.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,
}

impl PrerenderArgs {
    pub async fn run(self) -> Result<()> {
        let renderer = self.site.renderer()?;
        let urls = if self.urls.is_empty() {
            self.discover_urls(renderer.config())?
        } else {
            self.urls.clone()
        };

        tracing::info!(urls = urls.len(), out = %self.out.display(), "prerendering");
        renderer.warm_up().await.context("failed to load store data")?;

        let (mut written, mut skipped) = (0usize, 0usize);
        for url in &urls {
            let markup = renderer
                .render(url, None)
                .await
                .with_context(|| format!("rendering {url} failed"))?;
            let Some(markup) = markup else {
                println!("  skipped {url} (not a content route)");
                skipped += 1;
                continue;
            };

            let Some(path) = output_path(&self.out, url) else {
                bail!("cannot map {url} to a file under {}", self.out.display());
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, markup)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("  wrote {}", path.display());
            written += 1;
        }

        println!("✓ prerendered {written} page(s), {skipped} skipped");
        Ok(())
    }

    fn discover_urls(&self, config: &Config) -> Result<Vec<String>> {
        let mut urls = page_urls(&config.paths.pages).with_context(|| {
            format!("failed to list page templates under {}", config.paths.pages.display())
        })?;
        if let Some(router) = self.site.json_router()? {
            urls.extend(router.urls().map(str::to_owned));
        }

        let content = ContentStore::new(config.paths.content.clone(), config.mode);
        for collection in &config.cms_collections {
            let lookup = content
                .get(collection)
                .with_context(|| format!("failed to list CMS collection {collection}"))?;
            if let Lookup::Found(serde_json::Value::Array(slugs)) = lookup {
                urls.extend(
                    slugs
                        .iter()
                        .filter_map(|slug| slug.as_str())
                        .map(|slug| format!("/{collection}/{slug}")),
                );
            }
        }

        urls.sort();
        urls.dedup();
        Ok(urls)
    }
}

/// `<out>/<url>.html`, with `/` written as `index.html`.
fn output_path(out: &Path, url: &str) -> Option<PathBuf> {
    let url = url.trim_matches('/');
    let key = if url.is_empty() { "index" } else { url };
    let mut file = join_key(out, key)?.into_os_string();
    file.push(".html");
    Some(PathBuf::from(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths() {
        let out = Path::new("/dist");
        assert_eq!(output_path(out, "/"), Some(PathBuf::from("/dist/index.html")));
        assert_eq!(output_path(out, "/index"), Some(PathBuf::from("/dist/index.html")));
        assert_eq!(
            output_path(out, "/blog/my-post/"),
            Some(PathBuf::from("/dist/blog/my-post.html"))
        );
        assert_eq!(output_path(out, "/../etc/passwd"), None);
    }
}
