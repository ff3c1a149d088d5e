use std::env;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::network::NetworkConfig;

pub mod cache;
pub mod network;

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub cache: CacheConfig,

    /// Delay in seconds before the host re-invokes the pipeline while
    /// background detail fetches are still outstanding.
    pub refresh_rate: f64,
    /// Fetch and show per-word definitions; when off, items carry the bare
    /// suggestion only and no background jobs are launched.
    pub display_details: bool,
}

impl Config {
    pub fn new() -> Self {
        let refresh_rate = env::var("PALABRA_REFRESH_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.2);

        let display_details = env::var("PALABRA_DISPLAY_DETAILS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Config {
            network: NetworkConfig::new(),
            cache: CacheConfig::new(),

            refresh_rate,
            display_details,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
