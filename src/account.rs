use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::UpstreamError;
use crate::github::GithubClient;

const QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        name
        contributionsCollection {
            totalCommitContributions
            totalIssueContributions
            totalPullRequestContributions
            totalPullRequestReviewContributions
        }
    }
}
"#;

/// Lifetime contribution counters as reported by GitHub.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub name: Option<String>,
    pub total_commit_contributions: u64,
    pub total_issue_contributions: u64,
    pub total_pull_request_contributions: u64,
    pub total_pull_request_review_contributions: u64,
}

/// Fetch the four contribution counters for `username`.
pub async fn fetch(client: &GithubClient, username: &str) -> Result<AccountStats, UpstreamError> {
    #[derive(Deserialize)]
    struct Response {
        data: Option<Data>,
    }
    #[derive(Deserialize)]
    struct Data {
        user: Option<User>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct User {
        name: Option<String>,
        contributions_collection: Collection,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Collection {
        total_commit_contributions: u64,
        total_issue_contributions: u64,
        total_pull_request_contributions: u64,
        total_pull_request_review_contributions: u64,
    }

    let json = client.graphql(QUERY, json!({ "login": username })).await?;
    let parsed: Response = serde_json::from_value(json)?;
    let user = parsed
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| UpstreamError::MissingUser(username.to_string()))?;

    let c = user.contributions_collection;
    Ok(AccountStats {
        name: user.name,
        total_commit_contributions: c.total_commit_contributions,
        total_issue_contributions: c.total_issue_contributions,
        total_pull_request_contributions: c.total_pull_request_contributions,
        total_pull_request_review_contributions: c.total_pull_request_review_contributions,
    })
}
