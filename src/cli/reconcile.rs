//! Pipeline commands (reconcile, classify, check)

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

use super::output::Output;
use super::sources::{HistoryArgs, InputArgs, Sources};
use crate::domain::{assign_releases, check_integrity, AntMetadata, IntegrityInputs, Severity};
use crate::sql::SeedScript;
use crate::storage::{load_listing, Config, OutputDir};

/// Combined transactional script written next to the per-table files
const SEED_FILE: &str = "seed.sql";

/// Every file `reconcile` may write; nothing else in the output directory is
/// touched
const OWNED_FILES: [&str; 7] = [
    "ant.sql",
    "ant_tweeted.sql",
    "ant_declined.sql",
    "release.sql",
    "ant_release.sql",
    "migration.sql",
    SEED_FILE,
];

#[derive(Serialize)]
struct ReconcileSummary {
    unseen: usize,
    declined: usize,
    accepted: usize,
    legacy: usize,
    skipped: usize,
    releases: usize,
    latest_release: Option<u32>,
    migration_label: String,
    files: Vec<PathBuf>,
}

/// Runs the full pipeline and writes the SQL seed
pub fn reconcile(
    output: &Output,
    mut config: Config,
    inputs: &InputArgs,
    history: &HistoryArgs,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    inputs.apply(&mut config);
    history.apply(&mut config);
    if let Some(dir) = out_dir {
        config.out_dir = dir;
    }

    let sources = Sources::load(&config, output)?;
    let classification = sources.classify(config.mode, output)?;
    if classification.skipped > 0 {
        output.warning(&format!(
            "Skipped {} issues without title content or close date",
            classification.skipped
        ));
    }

    let lookups = history.collaborator(&config, output)?;
    let legacy = sources.resolve_legacy(lookups.as_ref(), config.history.workers, output)?;
    let legacy_count = legacy.len();

    let released = assign_releases(classification.accepted.clone(), legacy);
    let releases = released.releases();
    output.verbose_ctx(
        "release",
        &format!(
            "{} releases, latest {:?}",
            releases.len(),
            released.latest_release()
        ),
    );

    let script = SeedScript::build(&released, &classification.declined, &config.sql);
    output.verbose_ctx("sql", &format!("Migration label: {}", script.migration_label));

    let mut files = script.files();
    files.push((SEED_FILE.to_string(), script.transaction()));

    let dir = OutputDir::new(&config.out_dir);
    let written = dir.write_all(&files)?;
    let keep: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
    for stale in dir.remove_stale(&OWNED_FILES, &keep)? {
        output.verbose_ctx("sql", &format!("Removed stale {}", stale.display()));
    }

    let summary = ReconcileSummary {
        unseen: classification.unseen.len(),
        declined: classification.declined.len(),
        accepted: classification.accepted.len(),
        legacy: legacy_count,
        skipped: classification.skipped,
        releases: releases.len(),
        latest_release: released.latest_release(),
        migration_label: script.migration_label.clone(),
        files: written,
    };

    if output.is_json() {
        output.data(&summary);
    } else {
        output.field("Unseen", summary.unseen);
        output.field("Declined", summary.declined);
        output.field("Accepted", summary.accepted);
        output.field("Legacy", summary.legacy);
        output.field("Skipped", summary.skipped);
        output.field("Releases", summary.releases);
        output.field("Migration", &summary.migration_label);
        output.blank();
        output.success(&format!(
            "Wrote {} files to {}",
            summary.files.len(),
            dir.path().display()
        ));
    }

    Ok(())
}

/// Prints the classification of the issue export
pub fn classify(output: &Output, mut config: Config, inputs: &InputArgs, list: bool) -> Result<()> {
    inputs.apply(&mut config);

    let sources = Sources::load(&config, output)?;
    let classification = sources.classify(config.mode, output)?;

    if output.is_json() {
        if list {
            output.data(&serde_json::json!({
                "skipped": classification.skipped,
                "ants": classification.ants(),
            }));
        } else {
            output.data(&serde_json::json!({
                "unseen": classification.unseen.len(),
                "declined": classification.declined.len(),
                "accepted": classification.accepted.len(),
                "skipped": classification.skipped,
            }));
        }
        return Ok(());
    }

    output.field("Unseen", classification.unseen.len());
    output.field("Declined", classification.declined.len());
    output.field("Accepted", classification.accepted.len());
    output.field("Skipped", classification.skipped);

    if list {
        let ants = classification.ants();
        for (heading, kind) in [
            ("Unseen", "unseen"),
            ("Declined", "declined"),
            ("Accepted", "accepted"),
        ] {
            let contents: Vec<&str> = ants
                .iter()
                .filter(|ant| ant.kind() == kind)
                .map(AntMetadata::display_content)
                .collect();
            if contents.is_empty() {
                continue;
            }
            output.blank();
            println!("{} ({}):", heading, contents.len());
            for content in contents {
                println!("  {}", content);
            }
        }
    }

    Ok(())
}

/// Cross-validates reconciled ants, site data and the legacy listing
pub fn check(
    output: &Output,
    mut config: Config,
    inputs: &InputArgs,
    history: &HistoryArgs,
    listing: Option<PathBuf>,
    deny_errors: bool,
) -> Result<()> {
    inputs.apply(&mut config);
    history.apply(&mut config);
    if let Some(path) = listing {
        config.legacy_list = path;
    }

    let sources = Sources::load(&config, output)?;
    let classification = sources.classify(config.mode, output)?;
    let lookups = history.collaborator(&config, output)?;
    let legacy = sources.resolve_legacy(lookups.as_ref(), config.history.workers, output)?;

    output.verbose_ctx("check", &format!("Listing: {}", config.legacy_list.display()));
    let listed = load_listing(&config.legacy_list)?;

    let report = check_integrity(&IntegrityInputs {
        site: &sources.site,
        matcher: &sources.matcher,
        accepted: &classification.accepted,
        legacy: &legacy,
        listed: &listed,
    });

    if output.is_json() {
        output.data(&report);
    } else {
        for finding in &report.findings {
            let level = match finding.severity() {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("{:<8} {}", level, finding);
        }
        if !report.findings.is_empty() {
            output.blank();
        }
        output.field("Site ants", report.site_ants);
        output.field("Accepted", report.accepted);
        output.field("Legacy", report.legacy);
        output.field("Listed", report.listed);
        output.field("Unaccounted", report.unaccounted().count());
    }

    let errors = report
        .findings
        .iter()
        .filter(|f| f.severity() == Severity::Error)
        .count();

    if deny_errors && errors > 0 {
        bail!("Integrity check failed with {} error(s)", errors);
    }

    if output.is_text() {
        output.blank();
        if report.is_clean() {
            output.success("Integrity check passed");
        } else if errors > 0 {
            output.success(&format!("Integrity check found {} error(s)", errors));
        } else {
            output.success("Integrity check passed with warnings");
        }
    }

    Ok(())
}
