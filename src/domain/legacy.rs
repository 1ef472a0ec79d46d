//! Legacy ant resolution
//!
//! Legacy ants were accepted before suggestions went through the issue
//! tracker, so they have no issue to take a creation date from. Their date is
//! the earliest point the content appears in the project's history, answered
//! by an [`EarliestAppearance`] collaborator.
//!
//! Lookups are independent and read-only, so they run on a small pool of
//! scoped threads. A failed lookup aborts the run: missing history means the
//! site data is wrong and must be fixed by hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ant::LegacyAnt;
use super::dedupe::dedupe_by;
use super::site::{SiteAnt, SiteData};

#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("Content never appeared in history: '{0}'")]
    NotFound(String),

    #[error("History lookup timed out after {secs}s: '{content}'")]
    Timeout { content: String, secs: u64 },

    #[error("History command failed: {0}")]
    CommandFailed(String),

    #[error("Unable to parse history output: {0}")]
    Parse(String),
}

/// Answers when a piece of content first appeared
pub trait EarliestAppearance: Send + Sync {
    fn earliest_appearance(&self, content: &str) -> Result<DateTime<Utc>, HistoryError>;
}

impl EarliestAppearance for HashMap<String, DateTime<Utc>> {
    fn earliest_appearance(&self, content: &str) -> Result<DateTime<Utc>, HistoryError> {
        self.get(content)
            .copied()
            .ok_or_else(|| HistoryError::NotFound(content.to_string()))
    }
}

/// Resolves every legacy site ant, deduplicated by content
///
/// Results keep site order. `workers` is clamped to at least one.
pub fn resolve_legacy(
    site: &SiteData,
    history: &dyn EarliestAppearance,
    workers: usize,
) -> Result<Vec<LegacyAnt>, HistoryError> {
    let legacy: Vec<&SiteAnt> = site.legacy_ants().collect();
    let dates = lookup_all(&legacy, history, workers)?;

    let ants = legacy
        .iter()
        .zip(dates)
        .map(|(ant, created_at)| LegacyAnt::from_site(&ant.metadata(), created_at));

    Ok(dedupe_by(ants, |ant| ant.ant_content.clone()))
}

fn lookup_all(
    ants: &[&SiteAnt],
    history: &dyn EarliestAppearance,
    workers: usize,
) -> Result<Vec<DateTime<Utc>>, HistoryError> {
    let workers = workers.clamp(1, ants.len().max(1));
    let next = &AtomicUsize::new(0);
    let failed = &AtomicBool::new(false);

    let mut found: Vec<(usize, Result<DateTime<Utc>, HistoryError>)> =
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || {
                        let mut local = Vec::new();
                        while !failed.load(Ordering::Relaxed) {
                            let i = next.fetch_add(1, Ordering::Relaxed);
                            let Some(ant) = ants.get(i) else { break };
                            let result = history.earliest_appearance(&ant.content);
                            if result.is_err() {
                                failed.store(true, Ordering::Relaxed);
                            }
                            local.push((i, result));
                        }
                        local
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

    found.sort_by_key(|(i, _)| *i);
    found.into_iter().map(|(_, result)| result).collect()
}
