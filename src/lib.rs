//! antledger - reconciles ant suggestions into release-numbered SQL seeds
//!
//! Ants are short one-line texts. They reach the site either as suggestions
//! filed in an issue tracker or as legacy entries that predate it. This crate
//! matches both against the curated site data, numbers releases by day and
//! renders the result as deterministic, idempotent SQL.

pub mod domain;
pub mod sql;
pub mod storage;
pub mod cli;

pub use domain::{content_hash, AntMetadata, Classification, ClassifyMode, SiteData};
