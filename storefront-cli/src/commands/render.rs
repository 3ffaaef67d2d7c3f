//! `storefront render <url>`: print the markup for one URL.

use anyhow::{Context, Result};
use clap::Args;

use storefront_core::RouteDescriptor;

use super::SiteArgs;

/// Arguments for `storefront render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// URL path to render, e.g. `/products/shoe`.
    pub url: String,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Pre-resolved route descriptor as JSON; skips URL classification.
    #[arg(long, value_name = "JSON")]
    pub route: Option<String>,
}

impl RenderArgs {
    pub async fn run(self) -> Result<()> {
        let route = self
            .route
            .as_deref()
            .map(serde_json::from_str::<RouteDescriptor>)
            .transpose()
            .context("--route must be a JSON route descriptor with a `path`")?;

        let renderer = self.site.renderer()?;
        let markup = renderer
            .render(&self.url, route)
            .await
            .with_context(|| format!("rendering {} failed", self.url))?;

        match markup {
            Some(markup) => {
                print!("{markup}");
                if !markup.ends_with('\n') {
                    println!();
                }
            }
            None => eprintln!("{} is not a content route; serve it as a static file", self.url),
        }
        Ok(())
    }
}
