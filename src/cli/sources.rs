//! Input loading shared by the pipeline commands

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use super::output::Output;
use crate::domain::{
    classify, resolve_legacy, Classification, ClassifyMode, ContentMatcher, EarliestAppearance,
    LegacyAnt, RawIssue, SiteData,
};
use crate::storage::{load_raw_issues, load_site_data, Config, FixtureHistory, GitHistory};

/// Input file overrides
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Site data JSON (overrides config)
    #[arg(long)]
    pub site_data: Option<PathBuf>,

    /// Issue export JSON (overrides config)
    #[arg(long)]
    pub raw_issues: Option<PathBuf>,

    /// Fail on generated issues whose title has no backticked content
    #[arg(long)]
    pub strict: bool,
}

impl InputArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.site_data {
            config.site_data = path.clone();
        }
        if let Some(path) = &self.raw_issues {
            config.raw_issues = path.clone();
        }
        if self.strict {
            config.mode = ClassifyMode::Strict;
        }
    }
}

/// History lookup overrides
#[derive(Args, Debug, Default)]
pub struct HistoryArgs {
    /// Answer lookups from a JSON map of content to timestamp instead of git
    #[arg(long, env = "ANTLEDGER_HISTORY_FILE")]
    pub history_file: Option<PathBuf>,

    /// Repository searched for legacy ants (overrides config)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Concurrent history lookups (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seconds allowed per history lookup (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl HistoryArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.history.repo = repo.clone();
        }
        if let Some(workers) = self.workers {
            config.history.workers = workers.max(1);
        }
        if let Some(secs) = self.timeout {
            config.history.timeout_secs = secs.max(1);
        }
    }

    /// Builds the lookup collaborator
    pub fn collaborator(
        &self,
        config: &Config,
        output: &Output,
    ) -> Result<Box<dyn EarliestAppearance>> {
        match &self.history_file {
            Some(path) => {
                output.verbose_ctx("history", &format!("Using fixture: {}", path.display()));
                Ok(Box::new(FixtureHistory::load(path)?))
            }
            None => {
                output.verbose_ctx(
                    "history",
                    &format!(
                        "Using git in {} ({}s per lookup)",
                        config.history.repo.display(),
                        config.history.timeout_secs
                    ),
                );
                Ok(Box::new(GitHistory::new(
                    config.history.repo.clone(),
                    Duration::from_secs(config.history.timeout_secs),
                )))
            }
        }
    }
}

/// Site data and issue export, loaded and indexed
pub struct Sources {
    pub site: SiteData,
    pub matcher: ContentMatcher,
    pub issues: Vec<RawIssue>,
}

impl Sources {
    pub fn load(config: &Config, output: &Output) -> Result<Self> {
        output.verbose_ctx("load", &format!("Site data: {}", config.site_data.display()));
        let site = load_site_data(&config.site_data)?;
        let matcher = ContentMatcher::new(&site.ants);
        output.verbose_ctx(
            "load",
            &format!("{} site ants, {} lookup keys", site.ants.len(), matcher.len()),
        );

        output.verbose_ctx("load", &format!("Issue export: {}", config.raw_issues.display()));
        let issues = load_raw_issues(&config.raw_issues)?;
        output.verbose_ctx("load", &format!("{} issues", issues.len()));

        Ok(Self {
            site,
            matcher,
            issues,
        })
    }

    pub fn classify(&self, mode: ClassifyMode, output: &Output) -> Result<Classification> {
        let classification = classify(&self.issues, &self.matcher, mode)?;
        output.verbose_ctx(
            "classify",
            &format!(
                "{} unseen, {} declined, {} accepted, {} skipped",
                classification.unseen.len(),
                classification.declined.len(),
                classification.accepted.len(),
                classification.skipped
            ),
        );
        Ok(classification)
    }

    pub fn resolve_legacy(
        &self,
        history: &dyn EarliestAppearance,
        workers: usize,
        output: &Output,
    ) -> Result<Vec<LegacyAnt>> {
        output.verbose_ctx(
            "history",
            &format!(
                "Resolving {} legacy ants with {} workers",
                self.site.legacy_ants().count(),
                workers
            ),
        );
        let legacy = resolve_legacy(&self.site, history, workers)?;
        output.verbose_ctx("history", &format!("{} distinct legacy ants", legacy.len()));
        Ok(legacy)
    }
}
