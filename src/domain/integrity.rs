//! Cross-source integrity checks
//!
//! Three sources describe which ants exist: the site data, the issue export
//! (via accepted ants) and the flat legacy listing. This module compares them
//! and reports every disagreement. Findings are diagnostics; nothing here
//! fails.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;

use super::ant::{AcceptedAnt, LegacyAnt};
use super::site::{ContentMatcher, SiteData};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One disagreement between sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// An accepted ant no longer resolves to a site ant
    AcceptedNotOnSite { content: String },
    /// A legacy ant's content does not resolve to a site ant
    LegacyNotOnSite { content: String },
    /// A legacy ant's original suggestion does not resolve to a site ant
    LegacyOriginalNotOnSite { content: String },
    /// An accepted ant is missing from the flat listing
    AcceptedNotListed { content: String, original: String },
    /// A listed ant is missing from the site data entirely
    ListedNotOnSite { content: String },
    /// A listed ant is on the site but was never accepted nor marked legacy
    ListedNeedsSuggestedContent { content: String },
    /// A site ant no source accounts for
    Unaccounted { content: String },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::Unaccounted { .. } | Finding::AcceptedNotListed { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::AcceptedNotOnSite { content } => {
                write!(f, "Accepted ant '{}' not found as site ant", content)
            }
            Finding::LegacyNotOnSite { content } => {
                write!(f, "Legacy ant '{}' not found as site ant content", content)
            }
            Finding::LegacyOriginalNotOnSite { content } => {
                write!(f, "Legacy ant '{}' not found as site ant original", content)
            }
            Finding::AcceptedNotListed { content, original } => {
                write!(f, "Ant ({}, {}) not in the legacy listing", content, original)
            }
            Finding::ListedNotOnSite { content } => {
                write!(f, "Listed ant '{}' is not a site ant, add it to the site data", content)
            }
            Finding::ListedNeedsSuggestedContent { content } => write!(
                f,
                "Listed ant '{}' is neither accepted nor legacy, add 'suggestedContent' to it",
                content
            ),
            Finding::Unaccounted { content } => {
                write!(f, "Site ant '{}' is not accounted for by any source", content)
            }
        }
    }
}

fn account_for(remaining: &mut BTreeSet<&str>, content: &str, original: &str) {
    remaining.remove(content);
    remaining.remove(original);
}

/// Result of an integrity check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub findings: Vec<Finding>,
    pub site_ants: usize,
    pub accepted: usize,
    pub legacy: usize,
    pub listed: usize,
}

impl IntegrityReport {
    /// Site ants nobody accounts for
    pub fn unaccounted(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Unaccounted { content } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity() == Severity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Inputs for an integrity check
pub struct IntegrityInputs<'a> {
    pub site: &'a SiteData,
    pub matcher: &'a ContentMatcher,
    pub accepted: &'a [AcceptedAnt],
    pub legacy: &'a [LegacyAnt],
    /// Entries of the flat legacy listing
    pub listed: &'a [String],
}

/// Cross-validates reconciled ants, site data and the flat listing
pub fn check_integrity(inputs: &IntegrityInputs<'_>) -> IntegrityReport {
    let IntegrityInputs { site, matcher, accepted, legacy, listed } = *inputs;

    let mut findings = Vec::new();
    // Ordered so the unaccounted warnings come out stable
    let mut remaining: BTreeSet<&str> = site.ants.iter().map(|a| a.content.as_str()).collect();

    let accepted_content: HashSet<&str> = accepted.iter().map(|a| a.ant_content.as_str()).collect();
    let accepted_original: HashSet<&str> = accepted
        .iter()
        .map(|a| a.original_suggestion_content.as_str())
        .collect();
    let legacy_content: HashSet<&str> = legacy.iter().map(|a| a.ant_content.as_str()).collect();
    let listed_set: HashSet<&str> = listed.iter().map(String::as_str).collect();

    for entry in listed {
        let on_site = matcher.contains(entry);
        let known = accepted_content.contains(entry.as_str())
            || accepted_original.contains(entry.as_str())
            || legacy_content.contains(entry.as_str());

        if !on_site {
            findings.push(Finding::ListedNotOnSite { content: entry.clone() });
        } else if !known {
            findings.push(Finding::ListedNeedsSuggestedContent { content: entry.clone() });
        }
    }

    for ant in accepted {
        if !listed_set.contains(ant.ant_content.as_str())
            && !listed_set.contains(ant.original_suggestion_content.as_str())
        {
            findings.push(Finding::AcceptedNotListed {
                content: ant.ant_content.clone(),
                original: ant.original_suggestion_content.clone(),
            });
        }
    }

    for ant in accepted {
        if matcher.contains(&ant.ant_content) {
            account_for(&mut remaining, &ant.ant_content, &ant.original_suggestion_content);
        } else {
            findings.push(Finding::AcceptedNotOnSite { content: ant.ant_content.clone() });
        }
    }

    for ant in legacy {
        if matcher.contains(&ant.ant_content) {
            account_for(&mut remaining, &ant.ant_content, &ant.original_suggestion_content);
        } else {
            findings.push(Finding::LegacyNotOnSite { content: ant.ant_content.clone() });
        }

        if matcher.contains(&ant.original_suggestion_content) {
            account_for(&mut remaining, &ant.ant_content, &ant.original_suggestion_content);
        } else {
            findings.push(Finding::LegacyOriginalNotOnSite {
                content: ant.ant_content.clone(),
            });
        }
    }

    findings.extend(remaining.into_iter().map(|content| Finding::Unaccounted {
        content: content.to_string(),
    }));

    IntegrityReport {
        findings,
        site_ants: site.ants.len(),
        accepted: accepted.len(),
        legacy: legacy.len(),
        listed: listed.len(),
    }
}
