//! Migration scripts
//!
//! Statements are wrapped in one transaction that ends with a `migration`
//! marker row. The marker label is derived from the statements themselves, so
//! the same inputs always produce the same label and a second run is rejected
//! by the unique constraint on `migration.migration_label`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::render::{
    ant_release_sql, ant_tweeted_sql, ants_sql, declined_sql, migration_sql, release_sql,
    update_content_hash_sql,
};
use crate::domain::{
    content_hash, releases_of, DeclinedAnt, LegacyAnt, Release, Released, ReleasedRecord,
    SiteAnt, Suggestion, WithReleases, HASH_MODULUS,
};

/// Accounts and labels used when rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlOptions {
    /// Account new ants are attributed to
    pub suggester_user: String,
    /// Account declines are attributed to
    pub reviewer_user: String,
    /// Prefix of the seed migration label
    pub migration_prefix: String,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            suggester_user: "nobody".to_string(),
            reviewer_user: "kaspar".to_string(),
            migration_prefix: "seed-ants".to_string(),
        }
    }
}

/// Wraps statements and a migration marker in a transaction
pub fn transaction(statements: &[String], migration_label: &str) -> String {
    let mut out = String::from("BEGIN;\n\n");
    for statement in statements {
        out.push_str(statement);
        out.push_str("\n\n");
    }
    out.push_str(&migration_sql(migration_label));
    out.push_str("\n\nCOMMIT;\n");
    out
}

/// Label derived from the guarded statements
pub fn migration_label(prefix: &str, statements: &[String]) -> String {
    format!("{}:{}", prefix, content_hash(&statements.join("\n\n")))
}

/// The full seed of the ant tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedScript {
    pub ant: Option<String>,
    pub ant_tweeted: Option<String>,
    pub ant_declined: Option<String>,
    pub release: Option<String>,
    pub ant_release: Option<String>,
    pub migration_label: String,
}

impl SeedScript {
    /// Renders every table from the reconciled data
    pub fn build(released: &WithReleases, declined: &[DeclinedAnt], options: &SqlOptions) -> Self {
        let records = released.records();

        let mut all: Vec<&dyn Suggestion> = Vec::new();
        all.extend(released.accepted.iter().map(|ant| ant as &dyn Suggestion));
        all.extend(released.legacy.iter().map(|ant| ant as &dyn Suggestion));
        all.extend(declined.iter().map(|ant| ant as &dyn Suggestion));

        let mut script = Self {
            ant: ants_sql(&all, &options.suggester_user),
            ant_tweeted: ant_tweeted_sql(&records),
            ant_declined: declined_sql(declined, &options.reviewer_user),
            release: release_sql(&releases_of(&records)),
            ant_release: ant_release_sql(&records),
            migration_label: String::new(),
        };
        script.migration_label = migration_label(&options.migration_prefix, &script.statements());
        script
    }

    /// Present statements in dependency order
    pub fn statements(&self) -> Vec<String> {
        self.tables()
            .into_iter()
            .filter_map(|(_, sql)| sql.clone())
            .collect()
    }

    fn tables(&self) -> [(&'static str, &Option<String>); 5] {
        [
            ("ant", &self.ant),
            ("ant_tweeted", &self.ant_tweeted),
            ("ant_declined", &self.ant_declined),
            ("release", &self.release),
            ("ant_release", &self.ant_release),
        ]
    }

    /// One file per table with rows, plus the migration marker
    pub fn files(&self) -> Vec<(String, String)> {
        let mut files: Vec<(String, String)> = self
            .tables()
            .into_iter()
            .filter_map(|(table, sql)| {
                sql.as_ref().map(|sql| (format!("{}.sql", table), format!("{}\n", sql)))
            })
            .collect();
        files.push((
            "migration.sql".to_string(),
            format!("{}\n", migration_sql(&self.migration_label)),
        ));
        files
    }

    /// The whole seed as one transactional script
    pub fn transaction(&self) -> String {
        transaction(&self.statements(), &self.migration_label)
    }
}

/// Migration adding one release made of the given ants
///
/// Every ant is created and released at midnight UTC of `date`, and ordered by
/// its position in `ants`.
pub fn single_release_script(
    date: NaiveDate,
    release_number: u32,
    ants: &[String],
    options: &SqlOptions,
) -> String {
    let created_at = date.and_time(NaiveTime::MIN).and_utc();

    let released: Vec<Released<LegacyAnt>> = ants
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let mut ant = LegacyAnt::from_site(&SiteAnt::new(content.as_str()).metadata(), created_at);
            ant.ordering = i as u32;
            Released {
                ant,
                release: release_number,
            }
        })
        .collect();

    let suggestions: Vec<&dyn Suggestion> =
        released.iter().map(|ant| ant as &dyn Suggestion).collect();
    let records: Vec<&dyn ReleasedRecord> =
        released.iter().map(|ant| ant as &dyn ReleasedRecord).collect();

    let statements: Vec<String> = [
        ants_sql(&suggestions, &options.suggester_user),
        release_sql(&[Release::new(release_number)]),
        ant_release_sql(&records),
    ]
    .into_iter()
    .flatten()
    .collect();

    let label = format!("release-{}-{}", release_number, date.format("%Y-%m-%d"));
    transaction(&statements, &label)
}

/// Migration spreading content hashes evenly in listing order
///
/// Entry `i` of `n` gets hash `i * floor((2^31 - 1) / n)`, so ordering by hash
/// reproduces the listing. Returns `None` for an empty listing.
pub fn rehash_script(ants: &[String]) -> Option<String> {
    if ants.is_empty() {
        return None;
    }

    let step = HASH_MODULUS / ants.len() as u32;
    let updates: Vec<String> = ants
        .iter()
        .enumerate()
        .map(|(i, ant)| update_content_hash_sql(ant, i as u32 * step))
        .collect();

    let body = updates.join("\n");
    let label = format!("reorder-content-hash-to-match-legacy:{}", content_hash(&body));
    Some(transaction(&[body], &label))
}
