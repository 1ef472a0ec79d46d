//! Issue tracker export records
//!
//! Each record is one historical suggestion submission. Suggestions carry their
//! content in the title between backticks, e.g. ``Add ant: `ants are cool` ``.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label applied by the suggestion bot to generated issues
pub const AUTOGENERATED_LABEL: &str = "autogenerated";

/// Issue state as reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// One record of the raw issue export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub closed: bool,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl RawIssue {
    /// Creates an open issue
    pub fn open(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            state: IssueState::Open,
            created_at,
            closed: false,
            closed_at: None,
            body: String::new(),
            labels: Vec::new(),
        }
    }

    /// Creates a closed issue
    pub fn closed(
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        closed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            state: IssueState::Closed,
            created_at,
            closed: true,
            closed_at: Some(closed_at),
            body: String::new(),
            labels: Vec::new(),
        }
    }

    /// Adds a label
    pub fn with_label(mut self, name: impl Into<String>) -> Self {
        self.labels.push(Label { name: name.into() });
        self
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }

    /// Replaces typographic apostrophes with plain ones in title and body
    pub fn normalize_apostrophes(&mut self) {
        if self.title.contains('\u{2019}') {
            self.title = self.title.replace('\u{2019}', "'");
        }
        if self.body.contains('\u{2019}') {
            self.body = self.body.replace('\u{2019}', "'");
        }
    }

    /// Suggested content embedded in the title, if any
    pub fn content(&self) -> Option<&str> {
        extract_title_content(&self.title)
    }
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"`(.+?)`").expect("title pattern is valid"))
}

/// Extracts the content of the first backtick pair in a title
///
/// Only the first pair is considered: ``a `one` and `two` `` yields `one`.
/// Titles without a pair are not suggestions and yield `None`.
pub fn extract_title_content(title: &str) -> Option<&str> {
    title_pattern()
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
