use std::path::PathBuf;

/// Store used when neither `--store-url` nor `TASKBOARD_STORE_URL` is given.
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8787";

/// Port the local store listens on by default.
pub const DEFAULT_STORE_PORT: u16 = 8787;

/// Collection holding task records.
pub const TASKS: &str = "tasks";

/// Collection holding the contact directory.
pub const CONTACTS: &str = "contacts";

/// Client-side configuration: where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    store_url: String,
}

impl Config {
    /// Validate and normalise a store base URL.
    pub fn new(store_url: &str) -> Result<Self, String> {
        let trimmed = store_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(format!(
                "invalid store url: {store_url} (expected http:// or https://)"
            ));
        }
        let host = trimmed.split("://").nth(1).unwrap_or_default();
        if host.is_empty() {
            return Err(format!("invalid store url: {store_url} (missing host)"));
        }
        Ok(Config {
            store_url: trimmed.to_string(),
        })
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// `{base}/{collection}.json`
    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}.json", self.store_url)
    }

    /// `{base}/{collection}/{key}.json`
    pub fn record_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{collection}/{key}.json", self.store_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_url: DEFAULT_STORE_URL.to_string(),
        }
    }
}

/// Configuration of the local document store server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub read_only: bool,
}

impl StoreConfig {
    /// `.taskboard/store.db` under `base`.
    pub fn default_db_path(base: &std::path::Path) -> PathBuf {
        base.join(".taskboard").join("store.db")
    }
}
