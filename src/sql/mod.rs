//! # SQL Emitter
//!
//! Renders reconciled ants as SQL text. Nothing here talks to a database.
//!
//! ## Tables
//!
//! | Table | Rows |
//! |-------|------|
//! | `ant` | Accepted, legacy and declined ants |
//! | `ant_tweeted` | Accepted and legacy ants with a tweet time |
//! | `ant_declined` | Declined ants |
//! | `release` | Distinct release numbers |
//! | `ant_release` | Accepted and legacy ants with release and content hash |
//! | `migration` | One marker row per script |
//!
//! Dependent rows find their `ant` row through a correlated subquery on
//! `(suggested_content, created_at)` instead of a generated key.

mod render;
mod script;

pub use render::{
    ant_id, ant_release_sql, ant_tweeted_sql, ants_sql, declined_sql, escape, migration_sql,
    release_sql, sql_timestamp, unescape, update_content_hash_sql, user_id,
};
pub use script::{
    migration_label, rehash_script, single_release_script, transaction, SeedScript, SqlOptions,
};
