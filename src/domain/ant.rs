//! Reconciled ant records
//!
//! Every suggestion ends up in exactly one of four states:
//!
//! | State | Source | Meaning |
//! |-------|--------|---------|
//! | Unseen | open issue | Not reviewed yet |
//! | Declined | closed issue | Content not on the site |
//! | Accepted | closed issue | Content matched a site ant |
//! | Legacy | site data | Accepted before issue tracking existed |
//!
//! Accepted and legacy ants are "site records": they carry canonical content,
//! an ordering hash and tweet state, and are later assigned a release.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::site::SiteAntMetadata;

/// Fields every suggestion carries, whatever its state
pub trait Suggestion {
    /// Content as originally submitted
    fn original_suggestion_content(&self) -> &str;

    /// When the suggestion was made
    fn created_at(&self) -> DateTime<Utc>;
}

/// A suggestion that made it onto the site
pub trait SiteRecord: Suggestion {
    fn ant_content(&self) -> &str;
    fn ordering(&self) -> u32;
    fn tweeted(&self) -> bool;
    fn tweeted_at(&self) -> Option<DateTime<Utc>>;
}

/// A site record with its release number
pub trait ReleasedRecord: SiteRecord {
    fn release(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnseenAnt {
    pub original_suggestion_content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclinedAnt {
    pub original_suggestion_content: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedAnt {
    pub ant_content: String,
    pub ordering: u32,
    pub tweeted: bool,
    pub tweeted_at: Option<DateTime<Utc>>,
    pub original_suggestion_content: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

impl AcceptedAnt {
    /// Builds an accepted ant from the matched site record and issue timestamps
    pub fn from_site(
        site: &SiteAntMetadata,
        created_at: DateTime<Utc>,
        closed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ant_content: site.ant_content.clone(),
            ordering: site.ordering,
            tweeted: site.tweeted,
            tweeted_at: site.tweeted_at,
            original_suggestion_content: site.original_suggestion_content.clone(),
            created_at,
            closed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAnt {
    pub ant_content: String,
    pub ordering: u32,
    pub tweeted: bool,
    pub tweeted_at: Option<DateTime<Utc>>,
    pub original_suggestion_content: String,
    /// Backfilled from version-control history
    pub created_at: DateTime<Utc>,
}

impl LegacyAnt {
    /// Builds a legacy ant from site metadata and its earliest known appearance
    ///
    /// Legacy ants were never submitted through an issue, so the original
    /// suggestion is the canonical content itself.
    pub fn from_site(site: &SiteAntMetadata, created_at: DateTime<Utc>) -> Self {
        Self {
            ant_content: site.ant_content.clone(),
            ordering: site.ordering,
            tweeted: site.tweeted,
            tweeted_at: site.tweeted_at,
            original_suggestion_content: site.ant_content.clone(),
            created_at,
        }
    }
}

/// A site record paired with its release number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Released<T> {
    #[serde(flatten)]
    pub ant: T,
    pub release: u32,
}

pub type AcceptedAntWithRelease = Released<AcceptedAnt>;
pub type LegacyAntWithRelease = Released<LegacyAnt>;

/// Any reconciled ant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AntMetadata {
    Unseen(UnseenAnt),
    Declined(DeclinedAnt),
    Accepted(AcceptedAnt),
    Legacy(LegacyAnt),
}

impl AntMetadata {
    /// Serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            AntMetadata::Unseen(_) => "unseen",
            AntMetadata::Declined(_) => "declined",
            AntMetadata::Accepted(_) => "accepted",
            AntMetadata::Legacy(_) => "legacy",
        }
    }

    /// Canonical content, for states that have one
    pub fn ant_content(&self) -> Option<&str> {
        match self {
            AntMetadata::Accepted(ant) => Some(&ant.ant_content),
            AntMetadata::Legacy(ant) => Some(&ant.ant_content),
            AntMetadata::Unseen(_) | AntMetadata::Declined(_) => None,
        }
    }

    /// Canonical content if present, otherwise the original suggestion
    pub fn display_content(&self) -> &str {
        self.ant_content()
            .unwrap_or_else(|| self.original_suggestion_content())
    }
}

impl Suggestion for AntMetadata {
    fn original_suggestion_content(&self) -> &str {
        match self {
            AntMetadata::Unseen(ant) => ant.original_suggestion_content(),
            AntMetadata::Declined(ant) => ant.original_suggestion_content(),
            AntMetadata::Accepted(ant) => ant.original_suggestion_content(),
            AntMetadata::Legacy(ant) => ant.original_suggestion_content(),
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        match self {
            AntMetadata::Unseen(ant) => ant.created_at,
            AntMetadata::Declined(ant) => ant.created_at,
            AntMetadata::Accepted(ant) => ant.created_at,
            AntMetadata::Legacy(ant) => ant.created_at,
        }
    }
}

macro_rules! impl_suggestion {
    ($($ty:ty),*) => {
        $(
            impl Suggestion for $ty {
                fn original_suggestion_content(&self) -> &str {
                    &self.original_suggestion_content
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
            }
        )*
    };
}

macro_rules! impl_site_record {
    ($($ty:ty),*) => {
        $(
            impl SiteRecord for $ty {
                fn ant_content(&self) -> &str {
                    &self.ant_content
                }

                fn ordering(&self) -> u32 {
                    self.ordering
                }

                fn tweeted(&self) -> bool {
                    self.tweeted
                }

                fn tweeted_at(&self) -> Option<DateTime<Utc>> {
                    self.tweeted_at
                }
            }
        )*
    };
}

impl_suggestion!(UnseenAnt, DeclinedAnt, AcceptedAnt, LegacyAnt);
impl_site_record!(AcceptedAnt, LegacyAnt);

impl<T: Suggestion> Suggestion for Released<T> {
    fn original_suggestion_content(&self) -> &str {
        self.ant.original_suggestion_content()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.ant.created_at()
    }
}

impl<T: SiteRecord> SiteRecord for Released<T> {
    fn ant_content(&self) -> &str {
        self.ant.ant_content()
    }

    fn ordering(&self) -> u32 {
        self.ant.ordering()
    }

    fn tweeted(&self) -> bool {
        self.ant.tweeted()
    }

    fn tweeted_at(&self) -> Option<DateTime<Utc>> {
        self.ant.tweeted_at()
    }
}

impl<T: SiteRecord> ReleasedRecord for Released<T> {
    fn release(&self) -> u32 {
        self.release
    }
}
