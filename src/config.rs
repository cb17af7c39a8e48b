//! Runtime configuration from environment variables.
//! Used by: main, state.

use url::Url;

use crate::error::{Error, Result};
use crate::listview::columns::ListViewConfig;
use crate::listview::params::MAX_PER_PAGE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_PATH: &str = "auditlens.db";
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: String,
    pub admin_base_url: Option<Url>,
    pub routes_file: Option<String>,
    pub page_size: u32,
    pub view: ListViewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            db_path: DEFAULT_DB_PATH.into(),
            admin_base_url: None,
            routes_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            view: ListViewConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let admin_base_url = get("ADMIN_BASE_URL").map(|raw| Url::parse(&raw)).transpose()?;

        let page_size = match get("PAGE_SIZE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_PER_PAGE).contains(n))
                .ok_or_else(|| Error::Validation(format!("PAGE_SIZE must be 1-{MAX_PER_PAGE}, got {raw:?}")))?,
            None => defaults.page_size,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_path: get("DB_PATH").unwrap_or(defaults.db_path),
            admin_base_url,
            routes_file: get("ROUTES_FILE"),
            page_size,
            view: ListViewConfig {
                hide_extra: flag(get("HIDE_EXTRA")),
                hide_extra_changed: flag(get("HIDE_EXTRA_CHANGED")),
            },
        })
    }
}

fn flag(value: Option<String>) -> bool {
    value.map(|v| v == "true" || v == "1").unwrap_or(false)
}
