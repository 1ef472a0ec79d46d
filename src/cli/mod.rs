//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `reconcile` | Classify, resolve legacy ants, number releases, write SQL |
//! | `classify` | Show how the issue export splits |
//! | `check` | Integrity report across all sources |
//! | `release` | Migration for one hand-written release |
//! | `rehash` | Migration reordering content hashes |
//! | `hash` | Content hash of a string |
//! | `init` | Write a default `antledger.toml` |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for stage-by-stage diagnostics on stderr:
//! ```bash
//! antledger --verbose reconcile --history-file history.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod reconcile;
mod sources;
mod tools;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
