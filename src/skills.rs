//! Repository metadata plus raw `package.json` text, used by callers to infer
//! skills. Manifest text is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::UpstreamError;
use crate::github::GithubClient;

const QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        name
        repositories(last: 20) {
            nodes {
                name
                description
                stargazerCount
                forkCount
                object(expression: "HEAD:package.json") {
                    ... on Blob {
                        text
                    }
                }
            }
        }
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMetrics {
    pub name: Option<String>,
    pub repositories: Vec<RepoSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSkill {
    pub name: String,
    pub description: Option<String>,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub package_json: Option<String>,
}

pub async fn fetch(client: &GithubClient, username: &str) -> Result<SkillMetrics, UpstreamError> {
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
        name: Option<String>,
        repositories: Nodes,
    }
    #[derive(Deserialize)]
    struct Nodes {
        nodes: Option<Vec<Node>>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Node {
        name: String,
        description: Option<String>,
        #[serde(default)]
        stargazer_count: u64,
        #[serde(default)]
        fork_count: u64,
        object: Option<Blob>,
    }
    // Non-blob objects (a `package.json` directory, say) come back as `{}`.
    #[derive(Deserialize)]
    struct Blob {
        text: Option<String>,
    }

    let json = client.graphql(QUERY, json!({ "login": username })).await?;
    let parsed: Response = serde_json::from_value(json)?;
    let user = parsed
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| UpstreamError::MissingUser(username.to_string()))?;

    let repositories = user
        .repositories
        .nodes
        .unwrap_or_default()
        .into_iter()
        .map(|n| RepoSkill {
            name: n.name,
            description: n.description,
            stargazer_count: n.stargazer_count,
            fork_count: n.fork_count,
            package_json: n.object.and_then(|o| o.text),
        })
        .collect();

    Ok(SkillMetrics {
        name: user.name,
        repositories,
    })
}
