//! Store configuration resolution.
//!
//! # Responsibility
//! - Decide which backing store (if any) repositories should talk to.
//! - Treat blank and placeholder values as "not configured".
//!
//! # Invariants
//! - Missing configuration is never an error; it resolves to `None` and
//!   callers fall back to degraded repositories.
//! - `FANWARS_DB_PATH` takes precedence over the hosted store settings.

use std::path::PathBuf;

pub const ENV_STORE_URL: &str = "FANWARS_STORE_URL";
pub const ENV_STORE_KEY: &str = "FANWARS_STORE_KEY";
pub const ENV_DB_PATH: &str = "FANWARS_DB_PATH";

const PLACEHOLDER_URL: &str = "https://placeholder.supabase.co";
const PLACEHOLDER_KEY: &str = "placeholder-key";

/// Connection settings for the hosted relational store.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Project endpoint, e.g. `https://abc.supabase.co`. No trailing slash.
    pub url: String,
    /// Anonymous access key sent with every request.
    pub access_key: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Which store repositories should be built over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Hosted store reached over HTTP.
    Remote(RemoteConfig),
    /// Local SQLite database file.
    Local(PathBuf),
}

impl StoreConfig {
    /// Short label for logs and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Local(_) => "local",
        }
    }
}

/// Resolves store configuration from the process environment.
pub fn resolve_from_env() -> Option<StoreConfig> {
    resolve_with(|key| std::env::var(key).ok())
}

/// Resolves store configuration through an injected lookup.
///
/// Returns `None` when neither a local path nor a complete remote
/// configuration is available.
pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Option<StoreConfig> {
    if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
        return Some(StoreConfig::Local(PathBuf::from(path)));
    }

    let url = non_blank(lookup(ENV_STORE_URL)).filter(|url| url != PLACEHOLDER_URL)?;
    let access_key = non_blank(lookup(ENV_STORE_KEY)).filter(|key| key != PLACEHOLDER_KEY)?;

    Some(StoreConfig::Remote(RemoteConfig {
        url: url.trim_end_matches('/').to_string(),
        access_key,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
