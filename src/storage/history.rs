//! Version-control history lookups
//!
//! [`GitHistory`] answers "when did this content first appear" with
//! `git log -S<content>`. Content is passed as its own argument, never through
//! a shell, and glued to the `-S` flag so a leading dash cannot turn it into an
//! option. Each lookup is bounded by a timeout; a lookup that exceeds it is
//! killed and reported as a failure.
//!
//! [`FixtureHistory`] answers from a JSON map instead, for offline runs and
//! tests.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::domain::{EarliestAppearance, HistoryError};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Earliest appearance from a git repository's history
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo: PathBuf,
    timeout: Duration,
}

impl GitHistory {
    pub fn new(repo: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            repo: repo.into(),
            timeout,
        }
    }

    /// Arguments for the pickaxe search, oldest commit last
    fn log_args(content: &str) -> Vec<String> {
        vec![
            "log".to_string(),
            "--format=%cI".to_string(),
            format!("-S{}", content),
        ]
    }

    fn run_git(&self, args: &[String], content: &str) -> Result<String, HistoryError> {
        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                HistoryError::CommandFailed(format!(
                    "failed to run git in {}: {}",
                    self.repo.display(),
                    err
                ))
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HistoryError::Timeout {
                        content: content.to_string(),
                        secs: self.timeout.as_secs(),
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(err) => return Err(HistoryError::CommandFailed(err.to_string())),
            }
        };

        let stdout = collect(stdout)?;
        if status.success() {
            Ok(stdout)
        } else {
            let stderr = collect(stderr)?;
            let message = stderr.trim();
            Err(HistoryError::CommandFailed(if message.is_empty() {
                format!("git {} exited with {}", args[0], status)
            } else {
                message.to_string()
            }))
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<String>> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(handle: JoinHandle<std::io::Result<String>>) -> Result<String, HistoryError> {
    handle
        .join()
        .map_err(|_| HistoryError::CommandFailed("output reader panicked".to_string()))?
        .map_err(|err| HistoryError::CommandFailed(err.to_string()))
}

/// Oldest commit date in `git log` output (newest first)
fn parse_oldest(stdout: &str) -> Result<Option<DateTime<Utc>>, HistoryError> {
    let Some(line) = stdout.lines().map(str::trim).filter(|l| !l.is_empty()).last() else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(line)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|err| HistoryError::Parse(format!("'{}': {}", line, err)))
}

impl EarliestAppearance for GitHistory {
    fn earliest_appearance(&self, content: &str) -> Result<DateTime<Utc>, HistoryError> {
        if content.is_empty() {
            return Err(HistoryError::NotFound(String::new()));
        }

        let stdout = self.run_git(&Self::log_args(content), content)?;
        parse_oldest(&stdout)?.ok_or_else(|| HistoryError::NotFound(content.to_string()))
    }
}

/// Earliest appearance from a JSON object of `content -> timestamp`
#[derive(Debug, Clone, Default)]
pub struct FixtureHistory {
    entries: HashMap<String, DateTime<Utc>>,
}

impl FixtureHistory {
    pub fn new(entries: HashMap<String, DateTime<Utc>>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;

        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))?;

        Ok(Self { entries })
    }
}

impl EarliestAppearance for FixtureHistory {
    fn earliest_appearance(&self, content: &str) -> Result<DateTime<Utc>, HistoryError> {
        self.entries.earliest_appearance(content)
    }
}
