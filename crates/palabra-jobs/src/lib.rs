//! Fire-and-forget background jobs, deduplicated by identity.
//!
//! A job is an independent process detached from the caller's lifetime. Its
//! only terminal effect is whatever it writes to the shared cache store; the
//! caller never waits on it and observes completion only by a later cache
//! read. Identity dedup via pidfiles is the sole safeguard against launching
//! the same fetch twice across reruns.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use nix::sys::signal;
use nix::unistd::Pid;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job runner IO error: {0}")]
    Io(#[from] io::Error),
}

/// A command to launch under a deterministic job identity.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub id: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

pub trait JobDispatch: Send + Sync {
    /// Launch the job unless one with the same identity is still running.
    /// Returns whether a process was actually spawned.
    fn start_if_not_running(&self, spec: &JobSpec) -> Result<bool, JobError>;

    /// Non-blocking liveness check by job identity.
    fn is_running(&self, id: &str) -> bool;
}

/// Pidfile-backed runner. One `<id>.pid` file per job; a stale or missing
/// pidfile reads as not-running.
pub struct PidfileRunner {
    dir: PathBuf,
}

impl PidfileRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, JobError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn pidfile(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.pid"))
    }
}

impl JobDispatch for PidfileRunner {
    fn start_if_not_running(&self, spec: &JobSpec) -> Result<bool, JobError> {
        if self.is_running(&spec.id) {
            tracing::debug!("job '{}' already running, not launching", spec.id);
            return Ok(false);
        }

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        fs::write(self.pidfile(&spec.id), child.id().to_string())?;
        tracing::info!("launched job '{}' as pid {}", spec.id, child.id());
        Ok(true)
    }

    fn is_running(&self, id: &str) -> bool {
        pid_from_file(&self.pidfile(id))
            .map(|pid| signal::kill(pid, None).is_ok())
            .unwrap_or(false)
    }
}

fn pid_from_file(path: &Path) -> Option<Pid> {
    let raw = fs::read_to_string(path).ok()?;
    let pid = raw.trim().parse::<i32>().ok()?;
    Some(Pid::from_raw(pid))
}
