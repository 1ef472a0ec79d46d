//! Standalone commands (hash, release, rehash, init)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::content_hash;
use crate::sql::{rehash_script, single_release_script};
use crate::storage::{load_listing, load_release_file, Config, OutputDir, CONFIG_FILE};

/// Prints the content hash of `text`
pub fn hash(output: &Output, text: &str) -> Result<()> {
    let hash = content_hash(text);
    if output.is_json() {
        output.data(&serde_json::json!({
            "content": text,
            "hash": hash,
        }));
    } else {
        println!("{}", hash);
    }
    Ok(())
}

/// Emits the migration for one hand-written release file
pub fn release(
    output: &Output,
    config: &Config,
    file: &Path,
    release_number: u32,
    out: Option<PathBuf>,
) -> Result<()> {
    let release = load_release_file(file)?;
    let date = release
        .release_date()
        .with_context(|| format!("Bad date in release file: {}", file.display()))?;
    output.verbose_ctx(
        "release",
        &format!("Release {} on {} with {} ants", release_number, date, release.ants.len()),
    );

    let sql = single_release_script(date, release_number, &release.ants, &config.sql);
    emit(output, "release", &sql, out)
}

/// Emits the migration reordering content hashes to follow a listing
pub fn rehash(output: &Output, file: &Path, out: Option<PathBuf>) -> Result<()> {
    let ants = load_listing(file)?;
    output.verbose_ctx("rehash", &format!("{} ants in listing", ants.len()));

    let Some(sql) = rehash_script(&ants) else {
        bail!("Listing is empty: {}", file.display());
    };
    emit(output, "rehash", &sql, out)
}

/// Prints a script, or writes it to `out`
fn emit(output: &Output, context: &str, sql: &str, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Invalid output path: {}", path.display()))?
                .to_string();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let written = OutputDir::new(dir).write(&name, sql)?;
            output.verbose_ctx(context, &format!("Wrote {}", written.display()));

            if output.is_json() {
                output.data(&serde_json::json!({ "file": written }));
            } else {
                output.success(&format!("Wrote {}", written.display()));
            }
        }
        None if output.is_json() => output.data(&serde_json::json!({ "sql": sql })),
        None => print!("{}", sql),
    }
    Ok(())
}

/// Writes a default configuration file
pub fn init(output: &Output, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
    output.verbose_ctx("init", &format!("Config path: {}", path.display()));

    if Config::write_default(path)? {
        output.success(&format!("Created {}", path.display()));
    } else {
        output.success(&format!("{} already exists, leaving it unchanged", path.display()));
    }
    Ok(())
}
