//! Release numbering
//!
//! Releases are assigned retroactively: every distinct UTC calendar day on which
//! an accepted or legacy ant was created becomes one release, numbered from 1 in
//! chronological order. Ants created on the same day share a release.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use super::ant::{
    AcceptedAnt, AcceptedAntWithRelease, LegacyAnt, LegacyAntWithRelease, ReleasedRecord,
    Released, Suggestion,
};

/// A numbered release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub release_number: u32,
    pub label: String,
}

impl Release {
    pub fn new(release_number: u32) -> Self {
        Self {
            release_number,
            label: format!("v{}", release_number),
        }
    }
}

/// Accepted and legacy ants with their releases assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WithReleases {
    pub accepted: Vec<AcceptedAntWithRelease>,
    pub legacy: Vec<LegacyAntWithRelease>,
}

impl WithReleases {
    /// All released ants, accepted first, in input order
    pub fn records(&self) -> Vec<&dyn ReleasedRecord> {
        self.accepted
            .iter()
            .map(|ant| ant as &dyn ReleasedRecord)
            .chain(self.legacy.iter().map(|ant| ant as &dyn ReleasedRecord))
            .collect()
    }

    /// Distinct releases, ascending
    pub fn releases(&self) -> Vec<Release> {
        releases_of(&self.records())
    }

    /// Number of the most recent release, if any
    pub fn latest_release(&self) -> Option<u32> {
        self.records().iter().map(|ant| ant.release()).max()
    }
}

/// Distinct releases referenced by the given records, ascending
pub fn releases_of(records: &[&dyn ReleasedRecord]) -> Vec<Release> {
    let numbers: BTreeSet<u32> = records.iter().map(|ant| ant.release()).collect();
    numbers.into_iter().map(Release::new).collect()
}

/// Calendar day a record is bucketed by
pub fn release_day(ant: &dyn Suggestion) -> NaiveDate {
    ant.created_at().date_naive()
}

/// Assigns release numbers by calendar day of creation
pub fn assign_releases(accepted: Vec<AcceptedAnt>, legacy: Vec<LegacyAnt>) -> WithReleases {
    let days: BTreeSet<NaiveDate> = accepted
        .iter()
        .map(|ant| release_day(ant))
        .chain(legacy.iter().map(|ant| release_day(ant)))
        .collect();

    // Releases start at 1
    let numbers: HashMap<NaiveDate, u32> = days
        .into_iter()
        .zip(1u32..)
        .collect();

    WithReleases {
        accepted: accepted
            .into_iter()
            .map(|ant| {
                let release = numbers[&release_day(&ant)];
                Released { ant, release }
            })
            .collect(),
        legacy: legacy
            .into_iter()
            .map(|ant| {
                let release = numbers[&release_day(&ant)];
                Released { ant, release }
            })
            .collect(),
    }
}
