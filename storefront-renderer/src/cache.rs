//! Template cache: render functions keyed by resource or collection name.
//!
//! # File layout
//!
//! | Key kind        | Template file                    |
//! |-----------------|----------------------------------|
//! | Store resource  | `pages/#<resource>.html`         |
//! | CMS collection  | `pages/#cms/<collection>.html`   |
//! | Page-specific   | `pages/<url>.html` (never keyed) |
//!
//! Every other `.html` file under `pages/` is loaded alongside the entry
//! template so `{% include %}` and `{% extends %}` resolve.
//!
//! With [`TemplateMode::Precompiled`] each entry is parsed once at startup;
//! an entry that fails to compile is logged and served on demand instead.
//! With [`TemplateMode::OnDemand`] every call reads and parses from disk, so
//! template edits show up without a restart. Entries never change after
//! [`TemplateCache::build`].

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use storefront_core::paths::TEMPLATE_EXT;
use storefront_core::{Config, StoreFormat, TemplateMode, STORE_RESOURCES};

use crate::error::{io_err, RenderError};
use crate::helpers;

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(io_err(dir, err)),
    };
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file()
            && path.extension().and_then(|s| s.to_str()) == Some(TEMPLATE_EXT)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Every template under `pages`, as `(name, contents)` sorted by name.
fn load_template_files(pages: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let mut files = Vec::new();
    collect_template_files(pages, &mut files)?;
    files.sort();
    let mut templates = Vec::with_capacity(files.len());
    for path in files {
        let rel = path.strip_prefix(pages).unwrap_or(path.as_path());
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((normalize_template_name(rel), contents));
    }
    Ok(templates)
}

/// Add includable templates, skipping files that fail to parse.
fn add_includes(tera: &mut Tera, includes: Vec<(String, String)>) {
    if includes.is_empty() || tera.add_raw_templates(includes.clone()).is_ok() {
        return;
    }
    for (name, content) in includes {
        if let Err(err) = tera.add_raw_template(&name, &content) {
            tracing::debug!(template = %name, error = %err, "skipping unparsable include");
        }
    }
}

/// Parse `file` into a fresh engine together with every other template under
/// `pages`. Errors in `file` itself are returned; errors in the others are not.
fn compile(pages: &Path, file: &Path, format: &StoreFormat) -> Result<(Tera, String), RenderError> {
    let contents = std::fs::read_to_string(file).map_err(|e| io_err(file, e))?;
    let name = normalize_template_name(file.strip_prefix(pages).unwrap_or(file));

    let includes: Vec<(String, String)> = load_template_files(pages)?
        .into_iter()
        .filter(|(n, _)| *n != name)
        .collect();

    let mut tera = Tera::default();
    helpers::register(&mut tera, format);
    add_includes(&mut tera, includes);
    tera.add_raw_template(&name, &contents)?;
    Ok((tera, name))
}

// ---------------------------------------------------------------------------
// TemplateCache
// ---------------------------------------------------------------------------

enum Entry {
    Compiled { tera: Tera, name: String },
    OnDemand { file: PathBuf },
}

/// Immutable map from content key to render function.
pub struct TemplateCache {
    pages: PathBuf,
    format: StoreFormat,
    entries: BTreeMap<String, Entry>,
}

/// Content keys and their template files: store resources, then CMS collections.
pub fn cache_keys(config: &Config) -> Vec<(String, PathBuf)> {
    let resources = STORE_RESOURCES
        .iter()
        .map(|r| (r.to_string(), config.paths.resource_template(r)));
    let collections = config
        .cms_collections
        .iter()
        .map(|c| (c.clone(), config.paths.collection_template(c)));
    resources.chain(collections).collect()
}

impl TemplateCache {
    /// Build the cache for every key of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::build(
            &config.paths.pages,
            cache_keys(config),
            config.template_mode,
            &config.format,
        )
    }

    /// Build the cache. Compilation failures never abort startup.
    pub fn build(
        pages: &Path,
        keys: Vec<(String, PathBuf)>,
        mode: TemplateMode,
        format: &StoreFormat,
    ) -> Self {
        let mut entries = BTreeMap::new();
        let mut compiled = 0usize;

        for (key, file) in keys {
            let entry = match mode {
                TemplateMode::OnDemand => Entry::OnDemand { file },
                TemplateMode::Precompiled => match compile(pages, &file, format) {
                    Ok((tera, name)) => {
                        compiled += 1;
                        Entry::Compiled { tera, name }
                    }
                    Err(RenderError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                        tracing::debug!(key = %key, file = %file.display(), "no template for key");
                        Entry::OnDemand { file }
                    }
                    Err(err) => {
                        tracing::error!(key = %key, error = %err, "template failed to compile, rendering on demand");
                        Entry::OnDemand { file }
                    }
                },
            };
            entries.insert(key, entry);
        }

        tracing::info!(?mode, keys = entries.len(), compiled, "template cache ready");
        TemplateCache {
            pages: pages.to_path_buf(),
            format: format.clone(),
            entries,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_compiled(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Entry::Compiled { .. }))
    }

    /// Render the entry for `key`. `install` adds request-scoped functions to
    /// the engine used for this call only.
    pub fn render<F>(&self, key: &str, ctx: &Context, install: F) -> Result<String, RenderError>
    where
        F: FnOnce(&mut Tera),
    {
        match self.entries.get(key) {
            Some(Entry::Compiled { tera, name }) => {
                let mut tera = tera.clone();
                install(&mut tera);
                Ok(tera.render(name, ctx)?)
            }
            Some(Entry::OnDemand { file }) => self.render_file(file, ctx, install),
            None => Err(RenderError::UnknownTemplate(key.to_string())),
        }
    }

    /// One-off render of a template file. Nothing is cached.
    pub fn render_file<F>(&self, file: &Path, ctx: &Context, install: F) -> Result<String, RenderError>
    where
        F: FnOnce(&mut Tera),
    {
        let (mut tera, name) = compile(&self.pages, file, &self.format)?;
        install(&mut tera);
        Ok(tera.render(&name, ctx)?)
    }
}

/// URLs served by page-specific templates (`pages/about/us.html` → `/about/us`).
///
/// Keyed templates (names starting with `#`) are excluded.
pub fn page_urls(pages: &Path) -> Result<Vec<String>, RenderError> {
    let mut files = Vec::new();
    collect_template_files(pages, &mut files)?;
    let mut urls: Vec<String> = files
        .iter()
        .filter_map(|f| f.strip_prefix(pages).ok())
        .map(|rel| normalize_template_name(&rel.with_extension("")))
        .filter(|name| !name.starts_with('#'))
        .map(|name| format!("/{name}"))
        .collect();
    urls.sort();
    Ok(urls)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
