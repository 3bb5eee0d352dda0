use serde::{Deserialize, Serialize};

use crate::model::{Engine, DEFAULT_MAX_ITEMS, DEFAULT_MAX_SKILLS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Base URL the catalog and engine paths are appended to
    pub api_base_url: String,
    /// AI builds routinely take 5-10s; keep well above that
    pub request_timeout_secs: u64,
    pub default_engine: Engine,
    pub max_skills: u8,
    pub max_items: u8,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".into(),
            request_timeout_secs: 30,
            default_engine: Engine::Ai,
            max_skills: DEFAULT_MAX_SKILLS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl AdvisorConfig {
    /// Defaults overlaid with `ADVISOR_*` environment variables.
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("ADVISOR_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            request_timeout_secs: lookup("ADVISOR_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            default_engine: lookup("ADVISOR_ENGINE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_engine),
            max_skills: lookup("ADVISOR_MAX_SKILLS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_skills),
            max_items: lookup("ADVISOR_MAX_ITEMS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_items),
        }
    }
}
