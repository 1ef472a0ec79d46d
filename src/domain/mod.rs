//! Domain models for the ant ledger
//!
//! Contains the reconciliation logic without any file or process I/O.

mod hash;
mod site;
mod issue;
mod ant;
mod dedupe;
mod classify;
mod legacy;
mod release;
mod integrity;

pub use hash::{content_hash, HASH_MODULUS};
pub use site::{ContentMatcher, SiteAnt, SiteAntMetadata, SiteData};
pub use issue::{extract_title_content, IssueState, Label, RawIssue, AUTOGENERATED_LABEL};
pub use ant::{
    AcceptedAnt, AcceptedAntWithRelease, AntMetadata, DeclinedAnt, LegacyAnt,
    LegacyAntWithRelease, Released, ReleasedRecord, SiteRecord, Suggestion, UnseenAnt,
};
pub use dedupe::dedupe_by;
pub use classify::{classify, Classification, ClassifyError, ClassifyMode};
pub use legacy::{resolve_legacy, EarliestAppearance, HistoryError};
pub use release::{assign_releases, release_day, releases_of, Release, WithReleases};
pub use integrity::{check_integrity, Finding, IntegrityInputs, IntegrityReport, Severity};
