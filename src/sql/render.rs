//! Statement rendering
//!
//! Every statement is a single multi-row insert:
//!
//! ```text
//! insert into ant (suggested_content, ant_user_id, created_at)
//!   values
//!     ('ants', (select user_id from registered_user where user_name = 'nobody'), '2023-01-01 12:00:00'),
//!     ...
//! ;
//! ```
//!
//! Rows come out in input order. A statement with no rows is omitted (`None`)
//! since `values` with an empty list is not valid SQL.

use chrono::{DateTime, Utc};

use crate::domain::{DeclinedAnt, Release, ReleasedRecord, Suggestion};

/// Escapes a value for a single-quoted SQL literal
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Reverses [`escape`]
pub fn unescape(value: &str) -> String {
    value.replace("''", "'")
}

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC
pub fn sql_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Subquery resolving an ant row by its suggestion and creation time
pub fn ant_id(original_suggestion_content: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "(select ant_id from ant where suggested_content = '{}' and created_at = '{}')",
        escape(original_suggestion_content),
        sql_timestamp(created_at)
    )
}

/// Subquery resolving a registered user by name
pub fn user_id(user_name: &str) -> String {
    format!(
        "(select user_id from registered_user where user_name = '{}')",
        escape(user_name)
    )
}

fn insert(target: &str, rows: Vec<String>) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let rows = rows
        .iter()
        .map(|row| format!("    {}", row))
        .collect::<Vec<_>>()
        .join(",\n");

    Some(format!("insert into {}\n  values\n{}\n;", target, rows))
}

/// Rows for the `ant` table
pub fn ants_sql(ants: &[&dyn Suggestion], suggester: &str) -> Option<String> {
    let user = user_id(suggester);
    let rows = ants
        .iter()
        .map(|ant| {
            format!(
                "('{}', {}, '{}')",
                escape(ant.original_suggestion_content()),
                user,
                sql_timestamp(ant.created_at())
            )
        })
        .collect();

    insert("ant (suggested_content, ant_user_id, created_at)", rows)
}

/// Rows for `ant_tweeted`, only ants with a recorded tweet time
pub fn ant_tweeted_sql(ants: &[&dyn ReleasedRecord]) -> Option<String> {
    let rows = ants
        .iter()
        .filter(|ant| ant.tweeted())
        .filter_map(|ant| {
            let tweeted_at = ant.tweeted_at()?;
            Some(format!(
                "({}, '{}')",
                ant_id(ant.original_suggestion_content(), ant.created_at()),
                sql_timestamp(tweeted_at)
            ))
        })
        .collect();

    insert("ant_tweeted (ant_id, tweeted_at)", rows)
}

/// Rows for `ant_declined`, attributed to the reviewing account
pub fn declined_sql(ants: &[DeclinedAnt], reviewer: &str) -> Option<String> {
    let user = user_id(reviewer);
    let rows = ants
        .iter()
        .map(|ant| {
            format!(
                "({}, {}, '{}')",
                ant_id(&ant.original_suggestion_content, ant.created_at),
                user,
                sql_timestamp(ant.closed_at)
            )
        })
        .collect();

    insert("ant_declined (ant_id, ant_declined_user_id, ant_declined_at)", rows)
}

/// Rows for `release`
pub fn release_sql(releases: &[Release]) -> Option<String> {
    let rows = releases
        .iter()
        .map(|release| {
            format!("({}, '{}')", release.release_number, escape(&release.label))
        })
        .collect();

    insert("release (release_number, release_label)", rows)
}

/// Rows for `ant_release`
pub fn ant_release_sql(ants: &[&dyn ReleasedRecord]) -> Option<String> {
    let rows = ants
        .iter()
        .map(|ant| {
            format!(
                "({}, {}, '{}', {})",
                ant_id(ant.original_suggestion_content(), ant.created_at()),
                ant.release(),
                escape(ant.ant_content()),
                ant.ordering()
            )
        })
        .collect();

    insert(
        "ant_release (ant_id, release_number, ant_content, ant_content_hash)",
        rows,
    )
}

/// Marker row guarding a migration against being applied twice
pub fn migration_sql(label: &str) -> String {
    format!(
        "insert into migration (migration_label) values ('{}');",
        escape(label)
    )
}

/// Overwrites the content hash of a released ant
pub fn update_content_hash_sql(ant_content: &str, hash: u32) -> String {
    format!(
        "update ant_release set ant_content_hash = {} where ant_content = '{}';",
        hash,
        escape(ant_content)
    )
}
