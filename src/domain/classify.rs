//! Issue classification
//!
//! Partitions the raw issue export into unseen, declined and accepted ants.
//!
//! | Issue | Title content | Site match | Result |
//! |-------|---------------|------------|--------|
//! | open | yes | - | Unseen |
//! | closed, `closedAt` set | yes | no | Declined |
//! | closed, `closedAt` set | yes | yes | Accepted |
//! | closed, `closedAt` null | - | - | skipped |
//! | any | no | - | skipped (or error in strict mode) |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ant::{AcceptedAnt, AntMetadata, DeclinedAnt, UnseenAnt};
use super::dedupe::dedupe_by;
use super::issue::{RawIssue, AUTOGENERATED_LABEL};
use super::site::ContentMatcher;

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("Generated issue has no backticked content in its title: '{0}'")]
    UnparseableTitle(String),
}

/// How to treat suggestion issues whose title cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyMode {
    /// Skip them silently
    #[default]
    Lenient,
    /// Fail if a bot-generated issue has no content
    Strict,
}

/// Result of classifying an issue export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub unseen: Vec<UnseenAnt>,
    pub declined: Vec<DeclinedAnt>,
    /// Deduplicated by canonical content
    pub accepted: Vec<AcceptedAnt>,
    /// Issues that were not suggestions or were malformed
    pub skipped: usize,
}

impl Classification {
    /// Every classified ant: unseen, then declined, then accepted
    pub fn ants(&self) -> Vec<AntMetadata> {
        let unseen = self.unseen.iter().cloned().map(AntMetadata::Unseen);
        let declined = self.declined.iter().cloned().map(AntMetadata::Declined);
        let accepted = self.accepted.iter().cloned().map(AntMetadata::Accepted);
        unseen.chain(declined).chain(accepted).collect()
    }
}

/// Classifies issues against the site's content
pub fn classify(
    issues: &[RawIssue],
    matcher: &ContentMatcher,
    mode: ClassifyMode,
) -> Result<Classification, ClassifyError> {
    let mut result = Classification::default();
    let mut accepted = Vec::new();

    for issue in issues {
        // Closed without a close date is malformed, never classified
        if issue.closed && issue.closed_at.is_none() {
            result.skipped += 1;
            continue;
        }

        let Some(content) = issue.content() else {
            if mode == ClassifyMode::Strict && issue.has_label(AUTOGENERATED_LABEL) {
                return Err(ClassifyError::UnparseableTitle(issue.title.clone()));
            }
            result.skipped += 1;
            continue;
        };

        let Some(closed_at) = issue.closed_at.filter(|_| issue.closed) else {
            result.unseen.push(UnseenAnt {
                original_suggestion_content: content.to_string(),
                created_at: issue.created_at,
            });
            continue;
        };

        match matcher.lookup(content) {
            Some(site) => {
                accepted.push(AcceptedAnt::from_site(site, issue.created_at, closed_at));
            }
            None => result.declined.push(DeclinedAnt {
                original_suggestion_content: content.to_string(),
                created_at: issue.created_at,
                closed_at,
            }),
        }
    }

    result.accepted = dedupe_by(accepted, |ant| ant.ant_content.clone());
    Ok(result)
}
