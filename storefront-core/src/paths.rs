use std::path::{Path, PathBuf};

pub const PAGES_DIR: &str = "pages";
pub const CONTENT_DIR: &str = "content";
pub const SETTINGS_FILE: &str = "settings.json";
pub const TEMPLATE_EXT: &str = "html";
pub const CMS_TEMPLATES_DIR: &str = "#cms";

/// Directory layout of a storefront site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub pages: PathBuf,
    pub content: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        SitePaths {
            pages: root.join(PAGES_DIR),
            content: root.join(CONTENT_DIR),
            root,
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.content.join(SETTINGS_FILE)
    }

    /// `pages/#<resource>.html`
    pub fn resource_template(&self, resource: &str) -> PathBuf {
        self.pages.join(format!("#{resource}.{TEMPLATE_EXT}"))
    }

    /// `pages/#cms/<collection>.html`
    pub fn collection_template(&self, collection: &str) -> PathBuf {
        self.pages
            .join(CMS_TEMPLATES_DIR)
            .join(format!("{collection}.{TEMPLATE_EXT}"))
    }

    pub fn collection_templates_dir(&self) -> PathBuf {
        self.pages.join(CMS_TEMPLATES_DIR)
    }
}

/// Join a slash-separated logical key onto `base`.
///
/// Returns `None` for empty keys and keys with `.`/`..` segments, so a key can
/// never address anything outside `base`.
pub fn join_key(base: &Path, key: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    let mut any = false;
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        path.push(segment);
        any = true;
    }
    any.then_some(path)
}
