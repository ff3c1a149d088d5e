use std::env;

use serde::{Deserialize, Serialize};

fn default_suggest_url() -> String {
    "https://dle.rae.es/srv/keys?q=".to_string()
}

fn default_search_url() -> String {
    "https://dle.rae.es/".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Suggestion endpoint; the escaped query is appended as-is.
    #[serde(default = "default_suggest_url")]
    pub suggest_url: String,
    /// Base URL for word lookup pages; used as an open target, never fetched.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let suggest_url = env::var("PALABRA_SUGGEST_URL").unwrap_or_else(|_| default_suggest_url());
        let search_url = env::var("PALABRA_SEARCH_URL").unwrap_or_else(|_| default_search_url());
        let timeout_seconds = env::var("PALABRA_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            suggest_url,
            search_url,
            timeout_seconds,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            suggest_url: default_suggest_url(),
            search_url: default_search_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
