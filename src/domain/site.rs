//! Curated site data and content matching
//!
//! The site data document is the source of truth for which ants were actually
//! accepted. Each ant has a canonical `content` (what the site displays) and may
//! carry the `suggestedContent` it was originally submitted as, before editing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hash::content_hash;

/// One curated ant from the site data document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnt {
    /// Canonical, currently displayed content
    #[serde(rename = "ant")]
    pub content: String,

    /// Content as originally submitted, if it was rewritten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_content: Option<String>,

    /// Accepted before issue tracking existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweeted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweeted_at: Option<DateTime<Utc>>,
}

impl SiteAnt {
    /// Creates a plain site ant with only canonical content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            suggested_content: None,
            legacy: None,
            tweeted: None,
            tweeted_at: None,
        }
    }

    /// Sets the originally suggested content
    pub fn with_suggested(mut self, suggested: impl Into<String>) -> Self {
        self.suggested_content = Some(suggested.into());
        self
    }

    /// Marks the ant as legacy
    pub fn legacy(mut self) -> Self {
        self.legacy = Some(true);
        self
    }

    /// Marks the ant as tweeted at the given time
    pub fn tweeted_at(mut self, at: DateTime<Utc>) -> Self {
        self.tweeted = Some(true);
        self.tweeted_at = Some(at);
        self
    }

    /// Returns true if the ant predates issue tracking
    pub fn is_legacy(&self) -> bool {
        self.legacy.unwrap_or(false)
    }

    /// Content the ant was submitted as (falls back to canonical content)
    pub fn original_content(&self) -> &str {
        self.suggested_content.as_deref().unwrap_or(&self.content)
    }

    /// Derives the metadata used for matching and output
    pub fn metadata(&self) -> SiteAntMetadata {
        SiteAntMetadata {
            ant_content: self.content.clone(),
            original_suggestion_content: self.original_content().to_string(),
            ordering: content_hash(&self.content),
            tweeted: self.tweeted.unwrap_or(false),
            tweeted_at: self.tweeted_at,
        }
    }
}

/// The site data document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(default)]
    pub version: String,
    pub ants: Vec<SiteAnt>,
}

impl SiteData {
    pub fn new(ants: Vec<SiteAnt>) -> Self {
        Self {
            version: String::new(),
            ants,
        }
    }

    /// Iterates over ants flagged as legacy
    pub fn legacy_ants(&self) -> impl Iterator<Item = &SiteAnt> {
        self.ants.iter().filter(|ant| ant.is_legacy())
    }
}

/// Metadata derived once per site ant at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAntMetadata {
    pub ant_content: String,
    pub original_suggestion_content: String,
    pub ordering: u32,
    pub tweeted: bool,
    pub tweeted_at: Option<DateTime<Utc>>,
}

/// Resolves content strings to site ants
///
/// Canonical content is checked first, then originally suggested content, so a
/// string that is one ant's canonical content and another's suggestion always
/// resolves to the canonical owner.
#[derive(Debug, Clone, Default)]
pub struct ContentMatcher {
    forward: HashMap<String, SiteAntMetadata>,
    backward: HashMap<String, SiteAntMetadata>,
}

impl ContentMatcher {
    /// Builds both lookup maps from the full site ant set
    pub fn new(ants: &[SiteAnt]) -> Self {
        let mut forward = HashMap::with_capacity(ants.len());
        let mut backward = HashMap::new();

        for ant in ants {
            let metadata = ant.metadata();
            if let Some(suggested) = &ant.suggested_content {
                backward.insert(suggested.clone(), metadata.clone());
            }
            forward.insert(ant.content.clone(), metadata);
        }

        Self { forward, backward }
    }

    /// Looks up content, preferring canonical matches
    pub fn lookup(&self, content: &str) -> Option<&SiteAntMetadata> {
        self.forward
            .get(content)
            .or_else(|| self.backward.get(content))
    }

    /// Returns true if the content resolves to any site ant
    pub fn contains(&self, content: &str) -> bool {
        self.lookup(content).is_some()
    }

    /// Number of distinct canonical contents
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
