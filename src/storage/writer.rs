//! SQL output files
//!
//! Output is regenerated from scratch on every run. Each file is written to a
//! temp file under an exclusive lock and renamed into place.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Directory receiving generated SQL
pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes one file atomically, returning its path
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.dir.join(name);
        let temp_path = path.with_extension("sql.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .with_context(|| format!("Failed to lock output file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .with_context(|| format!("Failed to write {}", temp_path.display()))?;
            writer.flush().context("Failed to flush output file")?;
        }

        fs::rename(&temp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(path)
    }

    /// Writes every `(name, content)` pair
    pub fn write_all(&self, files: &[(String, String)]) -> Result<Vec<PathBuf>> {
        files
            .iter()
            .map(|(name, content)| self.write(name, content))
            .collect()
    }

    /// Removes files named in `owned` that are not in `keep`
    ///
    /// Only names this tool writes are ever touched; anything else in the
    /// directory is left alone.
    pub fn remove_stale(&self, owned: &[&str], keep: &[&str]) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for &name in owned {
            if keep.contains(&name) {
                continue;
            }
            let path = self.dir.join(name);
            if path.is_file() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed.push(path);
            }
        }
        Ok(removed)
    }
}
