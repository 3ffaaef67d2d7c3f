//! Storefront: server-side rendering CLI for storefront sites.
//!
//! # Usage
//!
//! ```text
//! storefront render <url> [--root DIR] [--production] [--store-data FILE] [--routes FILE] [--route JSON]
//! storefront prerender [<url>...] [--out DIR] [--root DIR] [--production] [--store-data FILE] [--routes FILE]
//! storefront routes [--root DIR] [--production]
//! ```
//!
//! Logs go to stderr and honor `RUST_LOG` (default `info`).

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{prerender::PrerenderArgs, render::RenderArgs, routes::RoutesArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    version,
    about = "Render storefront pages from Tera templates, CMS content and store data",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one URL and print the markup.
    Render(RenderArgs),

    /// Render URLs to static HTML files.
    Prerender(PrerenderArgs),

    /// List template cache keys and page templates.
    Routes(RoutesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => runtime()?.block_on(args.run()),
        Commands::Prerender(args) => runtime()?.block_on(args.run()),
        Commands::Routes(args) => args.run(),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
