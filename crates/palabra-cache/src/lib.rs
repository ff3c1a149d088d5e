//! File-backed key/value store shared by the interactive process and all
//! background workers. One JSON file per key, stamped with the write time.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    stored_at: u64,
    value: T,
}

pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Read a value regardless of its age. Absence is the only miss signal.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        self.read_fresh(key, Duration::ZERO)
    }

    /// Read a value no older than `max_age`; `Duration::ZERO` disables the
    /// freshness check. Corrupt entries read as absent.
    pub fn read_fresh<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age: Duration,
    ) -> Result<Option<T>, CacheError> {
        let path = self.entry_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("discarding unreadable cache entry {}: {e}", path.display());
                return Ok(None);
            }
        };

        if !max_age.is_zero() {
            let age = unix_now().saturating_sub(envelope.stored_at);
            if age > max_age.as_secs() {
                return Ok(None);
            }
        }

        Ok(Some(envelope.value))
    }

    /// Persist `value` under `key` before returning. Later writes to the same
    /// key overwrite; the rename keeps each single-key write atomic.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let envelope = Envelope {
            stored_at: unix_now(),
            value,
        };
        let encoded = serde_json::to_vec(&envelope)?;

        let path = self.entry_path(key);
        let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
        fs::write(&tmp, &encoded)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("cached {} bytes under key '{key}'", encoded.len());
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let name = utf8_percent_encode(key, NON_ALPHANUMERIC).to_string();
        self.dir.join(format!("{name}.json"))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
