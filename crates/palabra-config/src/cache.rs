use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.cache_dir().join("palabra"))
        .unwrap_or_else(|| PathBuf::from("/tmp/palabra"))
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Store directory, shared by the interactive process and all workers.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl CacheConfig {
    pub fn new() -> Self {
        let dir = env::var("PALABRA_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_dir());

        Self { dir }
    }

    /// Pidfiles for background jobs live next to the cached data.
    pub fn jobs_dir(&self) -> PathBuf {
        self.dir.join("jobs")
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_dir_is_under_store_dir() {
        let config = CacheConfig {
            dir: PathBuf::from("/tmp/palabra-test"),
        };
        assert_eq!(config.jobs_dir(), PathBuf::from("/tmp/palabra-test/jobs"));
    }
}
