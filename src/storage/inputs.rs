//! Input documents
//!
//! | Input | Format |
//! |-------|--------|
//! | Site data | JSON `{version, ants: [...]}` |
//! | Raw issues | JSON array of issue records |
//! | Legacy listing | One ant per line |
//! | Release file | JSON `{Date: {Year, Month, Day}, Ants: [...]}` |

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{RawIssue, SiteData};

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Invalid release date: {year}-{month}-{day} (month is zero-based)")]
    InvalidReleaseDate { year: i32, month: u32, day: u32 },
}

/// Loads the curated site data document
pub fn load_site_data(path: &Path) -> Result<SiteData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read site data: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse site data: {}", path.display()))
}

/// Loads the raw issue export, normalizing typographic apostrophes
pub fn load_raw_issues(path: &Path) -> Result<Vec<RawIssue>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read issue export: {}", path.display()))?;

    let mut issues: Vec<RawIssue> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse issue export: {}", path.display()))?;

    for issue in &mut issues {
        issue.normalize_apostrophes();
    }

    Ok(issues)
}

/// Parses a newline-delimited listing, trimming entries and dropping blanks
pub fn parse_listing(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a newline-delimited ant listing
pub fn load_listing(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read listing: {}", path.display()))?;

    Ok(parse_listing(&content))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseFileDate {
    pub year: i32,
    /// Zero-based month
    pub month: u32,
    pub day: u32,
}

/// A hand-written description of one release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseFile {
    pub date: ReleaseFileDate,
    pub ants: Vec<String>,
}

impl ReleaseFile {
    /// Calendar date of the release
    pub fn release_date(&self) -> Result<NaiveDate, LoadError> {
        let ReleaseFileDate { year, month, day } = self.date;
        month
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or(LoadError::InvalidReleaseDate { year, month, day })
    }
}

/// Loads a release file
pub fn load_release_file(path: &Path) -> Result<ReleaseFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read release file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse release file: {}", path.display()))
}
