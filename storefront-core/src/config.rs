//! Process-wide storefront configuration.
//!
//! Computed once at startup from `content/settings.json` and the environment.
//! Loading never fails: an absent or malformed settings document degrades to
//! the documented defaults with a warning.
//!
//! | Field             | Source                                              | Default   |
//! |-------------------|-----------------------------------------------------|-----------|
//! | `mode`            | `STOREFRONT_ENV` (`production` or anything else)    | dev       |
//! | `lang`            | `settings.lang`                                     | `en_us`   |
//! | `store_id`        | `settings.store_id`, then `ECOM_STORE_ID`           | `1011`    |
//! | `primary_color`   | `settings.primary_color`                            | `#3fe3e3` |
//! | `secondary_color` | `settings.secondary_color`                          | `#5e1efe` |

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::paths::{SitePaths, TEMPLATE_EXT};
use crate::types::{ExecutionMode, TemplateMode};

pub const ENV_MODE: &str = "STOREFRONT_ENV";
pub const ENV_STORE_ID: &str = "ECOM_STORE_ID";

pub const DEFAULT_LANG: &str = "en_us";
pub const DEFAULT_STORE_ID: u64 = 1011;
pub const DEFAULT_PRIMARY_COLOR: &str = "#3fe3e3";
pub const DEFAULT_SECONDARY_COLOR: &str = "#5e1efe";

/// Store formatting settings used by the template helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreFormat {
    pub currency: String,
    pub currency_symbol: String,
    pub country_code: String,
}

impl Default for StoreFormat {
    fn default() -> Self {
        StoreFormat {
            currency: "USD".to_string(),
            currency_symbol: "$".to_string(),
            country_code: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub paths: SitePaths,
    pub mode: ExecutionMode,
    pub template_mode: TemplateMode,
    pub lang: String,
    pub store_id: u64,
    pub primary_color: String,
    pub secondary_color: String,
    /// Raw settings document.
    pub settings: Map<String, Value>,
    pub format: StoreFormat,
    /// Recognized CMS collection names, in order.
    pub cms_collections: Vec<String>,
}

impl Config {
    /// Load configuration for the site rooted at `root` from the process env.
    pub fn load(root: impl Into<PathBuf>) -> Self {
        Self::load_with(root, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with<F>(root: impl Into<PathBuf>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let paths = SitePaths::new(root);
        let settings = read_settings(&paths.settings_file());
        let mode = ExecutionMode::from_env_value(env(ENV_MODE).as_deref());
        let cms_collections = discover_collections(&paths.collection_templates_dir());
        Self::from_settings(paths, mode, settings, env(ENV_STORE_ID), cms_collections)
    }

    fn from_settings(
        paths: SitePaths,
        mode: ExecutionMode,
        settings: Map<String, Value>,
        env_store_id: Option<String>,
        cms_collections: Vec<String>,
    ) -> Self {
        let text = |key: &str, default: &str| {
            settings
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let defaults = StoreFormat::default();
        let format = StoreFormat {
            currency: text("currency", &defaults.currency),
            currency_symbol: text("currency_symbol", &defaults.currency_symbol),
            country_code: text("country_code", &defaults.country_code),
        };

        Config {
            template_mode: TemplateMode::from(mode),
            lang: text("lang", DEFAULT_LANG),
            store_id: resolve_store_id(settings.get("store_id"), env_store_id.as_deref()),
            primary_color: text("primary_color", DEFAULT_PRIMARY_COLOR),
            secondary_color: text("secondary_color", DEFAULT_SECONDARY_COLOR),
            format,
            cms_collections,
            settings,
            mode,
            paths,
        }
    }

    /// Override the template mode chosen from the execution mode.
    pub fn with_template_mode(mut self, template_mode: TemplateMode) -> Self {
        self.template_mode = template_mode;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self.template_mode = TemplateMode::from(mode);
        self
    }

    /// Replace the discovered CMS collection list.
    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cms_collections = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_cms_collection(&self, name: &str) -> bool {
        self.cms_collections.iter().any(|c| c == name)
    }
}

fn read_settings(path: &Path) -> Map<String, Value> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "settings not readable, using defaults");
            return Map::new();
        }
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "settings is not a JSON object, using defaults");
            Map::new()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "malformed settings, using defaults");
            Map::new()
        }
    }
}

fn resolve_store_id(setting: Option<&Value>, env: Option<&str>) -> u64 {
    let parse = |s: &str| s.trim().parse::<u64>().ok();
    let from_setting = match setting {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => parse(s),
        _ => None,
    };
    from_setting
        .or_else(|| env.and_then(parse))
        .unwrap_or(DEFAULT_STORE_ID)
}

/// File stems of `pages/#cms/*.html`, sorted.
fn discover_collections(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXT))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
