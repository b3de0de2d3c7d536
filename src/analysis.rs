//! Combined view of a user: languages, account counters, skill metrics and
//! recent commits, fetched concurrently.

use serde::Serialize;

use crate::account::{self, AccountStats};
use crate::contributions::{self, CommitRecord};
use crate::error::UpstreamError;
use crate::github::GithubClient;
use crate::languages::{self, LanguageTally};
use crate::skills::{self, SkillMetrics};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub repo_stats: LanguageTally,
    pub account_stats: AccountStats,
    pub skill_metrics: SkillMetrics,
    pub contributions: Vec<CommitRecord>,
}

/// Run the four fetchers at once; the first failure wins.
pub async fn analyze(client: &GithubClient, username: &str) -> Result<Analysis, UpstreamError> {
    log::debug!("analyzing {username}");
    let (repo_stats, contributions, account_stats, skill_metrics) = tokio::try_join!(
        languages::aggregate(client, username),
        contributions::collect(client, username),
        account::fetch(client, username),
        skills::fetch(client, username),
    )?;

    Ok(Analysis {
        repo_stats,
        account_stats,
        skill_metrics,
        contributions,
    })
}
