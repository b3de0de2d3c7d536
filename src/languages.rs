//! Language byte-count tally across every repository a user owns.

use futures::future::try_join_all;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::UpstreamError;
use crate::github::GithubClient;

/// Language name to cumulative bytes.
pub type LanguageTally = BTreeMap<String, u64>;

#[derive(Deserialize)]
struct RepoName {
    name: String,
}

/// Repositories on the first page of `GET /users/:username/repos`.
pub async fn list_repos(
    client: &GithubClient,
    username: &str,
) -> Result<Vec<String>, UpstreamError> {
    let repos: Vec<RepoName> = client.rest(&format!("/users/{username}/repos")).await?;
    Ok(repos.into_iter().map(|r| r.name).collect())
}

/// Language byte counts for a single repository.
pub async fn repo_languages(
    client: &GithubClient,
    username: &str,
    repo: &str,
) -> Result<LanguageTally, UpstreamError> {
    client
        .rest(&format!("/repos/{username}/{repo}/languages"))
        .await
        .inspect_err(|e| {
            log::error!("failed to fetch language stats for {username}/{repo}: {e}")
        })
}

/// List the user's repositories, fetch every language map concurrently and sum
/// them. Any single failure fails the whole tally.
pub async fn aggregate(
    client: &GithubClient,
    username: &str,
) -> Result<LanguageTally, UpstreamError> {
    let repos = list_repos(client, username).await?;
    log::debug!(
        "aggregating languages over {} repos for {username}",
        repos.len()
    );

    let per_repo =
        try_join_all(repos.iter().map(|repo| repo_languages(client, username, repo))).await?;

    Ok(merge(per_repo))
}

/// Sum per-repository maps keyed by language.
pub fn merge<I>(maps: I) -> LanguageTally
where
    I: IntoIterator<Item = LanguageTally>,
{
    let mut total = LanguageTally::new();
    for map in maps {
        for (lang, bytes) in map {
            let entry = total.entry(lang).or_insert(0);
            *entry = entry.saturating_add(bytes);
        }
    }
    total
}
