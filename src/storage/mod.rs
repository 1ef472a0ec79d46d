//! # Storage Layer
//!
//! Everything that touches the filesystem or other processes.
//!
//! ## Files
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Site data | JSON | `data/site_data.json` |
//! | Issue export | JSON | `data/raw_issues.json` |
//! | Legacy listing | Text, one ant per line | `ants.txt` |
//! | Config | TOML | `antledger.toml` |
//! | Generated SQL | One file per table | `out/` |
//!
//! ## Key Types
//!
//! - [`Config`] - Paths, accounts and history settings
//! - [`GitHistory`] - Earliest appearance from `git log`
//! - [`FixtureHistory`] - Earliest appearance from a JSON map
//! - [`OutputDir`] - Atomic, locked SQL file writes

mod config;
mod history;
mod inputs;
mod writer;

pub use config::{Config, ConfigError, HistoryConfig, CONFIG_FILE};
pub use history::{FixtureHistory, GitHistory};
pub use inputs::{
    load_listing, load_raw_issues, load_release_file, load_site_data, parse_listing, LoadError,
    ReleaseFile, ReleaseFileDate,
};
pub use writer::OutputDir;
