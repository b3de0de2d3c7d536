//! Commit history of a user's most recently updated repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::UpstreamError;
use crate::github::GithubClient;

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

const QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        name
        repositories(last: 20, orderBy: {field: UPDATED_AT, direction: DESC}) {
            nodes {
                name
                primaryLanguage {
                    name
                }
                defaultBranchRef {
                    target {
                        ... on Commit {
                            history(first: 100) {
                                nodes {
                                    committedDate
                                    additions
                                    deletions
                                    message
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

/// One commit, tagged with the repository it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub username: String,
    pub repo_name: String,
    pub language: String,
    pub commit_date: DateTime<Utc>,
    pub additions: u64,
    pub deletions: u64,
    pub message: String,
}

#[derive(Deserialize)]
struct Response {
    data: Option<Data>,
}

#[derive(Deserialize)]
struct Data {
    user: Option<User>,
}

#[derive(Deserialize)]
struct User {
    repositories: Repositories,
}

#[derive(Deserialize)]
struct Repositories {
    nodes: Option<Vec<RepoNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepoNode {
    name: String,
    primary_language: Option<NamedLanguage>,
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct NamedLanguage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: Option<Target>,
}

#[derive(Debug, Deserialize)]
struct Target {
    history: Option<History>,
}

#[derive(Debug, Deserialize)]
struct History {
    nodes: Option<Vec<CommitNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    committed_date: DateTime<Utc>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    message: String,
}

/// Up to 100 commits from the default branch of each of the user's last 20
/// repositories, flattened in the order GitHub returned them.
pub async fn collect(
    client: &GithubClient,
    username: &str,
) -> Result<Vec<CommitRecord>, UpstreamError> {
    let json = client
        .graphql(QUERY, json!({ "login": username }))
        .await
        .inspect_err(|e| {
            log::error!("error fetching GitHub contributions for {username}: {e}")
        })?;

    let parsed: Response = serde_json::from_value(json)?;
    let user = parsed
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| UpstreamError::MissingUser(username.to_string()))?;

    let repos = user.repositories.nodes.unwrap_or_default();
    Ok(flatten(username, repos))
}

/// Repositories without a default branch or history contribute nothing.
pub(crate) fn flatten(username: &str, repos: Vec<RepoNode>) -> Vec<CommitRecord> {
    repos
        .into_iter()
        .flat_map(|repo| {
            let language = repo
                .primary_language
                .map(|l| l.name)
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
            let commits = repo
                .default_branch_ref
                .and_then(|b| b.target)
                .and_then(|t| t.history)
                .and_then(|h| h.nodes)
                .unwrap_or_default();
            let repo_name = repo.name;

            commits
                .into_iter()
                .map(move |c| CommitRecord {
                    username: username.to_string(),
                    repo_name: repo_name.clone(),
                    language: language.clone(),
                    commit_date: c.committed_date,
                    additions: c.additions,
                    deletions: c.deletions,
                    message: c.message,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repos(value: serde_json::Value) -> Vec<RepoNode> {
        serde_json::from_value(value).unwrap()
    }

    fn commit(date: &str, message: &str) -> serde_json::Value {
        json!({ "committedDate": date, "additions": 4, "deletions": 1, "message": message })
    }

    #[test]
    fn flattens_in_repository_then_commit_order() {
        let nodes = repos(json!([
            {
                "name": "alpha",
                "primaryLanguage": { "name": "Rust" },
                "defaultBranchRef": { "target": { "history": { "nodes": [
                    commit("2024-03-03T00:00:00Z", "a3"),
                    commit("2024-03-01T00:00:00Z", "a1"),
                    commit("2024-03-02T00:00:00Z", "a2"),
                ]}}}
            },
            {
                "name": "beta",
                "primaryLanguage": { "name": "Go" },
                "defaultBranchRef": { "target": { "history": { "nodes": [] }}}
            }
        ]));

        let records = flatten("octo", nodes);

        assert_eq!(records.len(), 3);
        let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["a3", "a1", "a2"]);
        for r in &records {
            assert_eq!(r.username, "octo");
            assert_eq!(r.repo_name, "alpha");
            assert_eq!(r.language, "Rust");
        }
    }

    #[test]
    fn repo_without_default_branch_is_skipped() {
        let nodes = repos(json!([
            { "name": "empty", "primaryLanguage": null, "defaultBranchRef": null },
            {
                "name": "docs",
                "primaryLanguage": null,
                "defaultBranchRef": { "target": { "history": { "nodes": [
                    commit("2024-01-01T12:00:00Z", "init"),
                ]}}}
            }
        ]));

        let records = flatten("octo", nodes);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].repo_name, "docs");
        assert_eq!(records[0].language, UNKNOWN_LANGUAGE);
    }

    #[test]
    fn record_serializes_camel_case() {
        let records = flatten(
            "octo",
            repos(json!([{
                "name": "alpha",
                "primaryLanguage": { "name": "Rust" },
                "defaultBranchRef": { "target": { "history": { "nodes": [
                    commit("2024-03-01T00:00:00Z", "fix"),
                ]}}}
            }])),
        );
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["repoName"], "alpha");
        assert_eq!(value["commitDate"], "2024-03-01T00:00:00Z");
        assert_eq!(value["additions"], 4);
    }

    #[tokio::test]
    async fn collect_reads_graphql_payload() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({ "data": { "user": { "name": "Octo", "repositories": { "nodes": [
            {
                "name": "alpha",
                "primaryLanguage": { "name": "Rust" },
                "defaultBranchRef": { "target": { "history": { "nodes": [
                    commit("2024-03-03T00:00:00Z", "one"),
                    commit("2024-03-02T00:00:00Z", "two"),
                    commit("2024-03-01T00:00:00Z", "three"),
                ]}}}
            },
            {
                "name": "beta",
                "primaryLanguage": { "name": "Go" },
                "defaultBranchRef": { "target": { "history": { "nodes": [] }}}
            }
        ]}}}});
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = GithubClient::new("t", server.url());
        let records = collect(&client, "octo").await.unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.repo_name == "alpha" && r.language == "Rust"));
    }

    #[tokio::test]
    async fn missing_user_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(
                r#"{"data": {"user": null}, "errors": [{"type": "NOT_FOUND", "path": ["user"],
                "locations": [{"line": 3, "column": 5}],
                "message": "Could not resolve to a User with the login of 'ghost'."}]}"#,
            )
            .create_async()
            .await;

        let client = GithubClient::new("t", server.url());
        let err = collect(&client, "ghost").await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingUser(ref u) if u == "ghost"));
    }
}
