use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::error::UpstreamError;

const AGENT: &str = "github-analysis";

#[derive(Clone)]
pub struct GithubClient {
    token: Arc<String>,
    http: Arc<Client>,
    base_url: Arc<String>,
}

impl GithubClient {
    /// Create a client for the API rooted at `base_url` (REST paths are appended,
    /// GraphQL lives at `<base_url>/graphql`).
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            token: Arc::new(token.into()),
            http: Arc::new(Client::new()),
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.github_token.clone(), config.api_url.clone())
    }

    /// GET a REST path such as `/users/octocat/repos` and decode the body.
    pub async fn rest<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url}");

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&*self.token)
            .header(USER_AGENT, AGENT)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let json = Self::check(resp).await?;
        Ok(serde_json::from_value(json)?)
    }

    /// POST a GraphQL document with `variables`. A 2xx reply carrying an `errors`
    /// array is treated as a failure.
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, UpstreamError> {
        let url = format!("{}/graphql", self.base_url);
        log::debug!("POST {url}");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&*self.token)
            .header(USER_AGENT, AGENT)
            .json(&serde_json::json!({ "query": query, "variables": &variables }))
            .send()
            .await?;

        let json = Self::check(resp).await?;

        if let Some(errors) = json.get("errors") {
            if user_not_found(errors) {
                let login = variables
                    .get("login")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Err(UpstreamError::MissingUser(login.to_string()));
            }
            return Err(UpstreamError::GraphQl(errors.to_string()));
        }

        Ok(json)
    }

    /// Raw profile of a user (`GET /users/:username`).
    pub async fn profile(&self, username: &str) -> Result<Value, UpstreamError> {
        self.rest(&format!("/users/{username}")).await
    }

    async fn check(resp: reqwest::Response) -> Result<Value, UpstreamError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        // GitHub error bodies look like {"message": "...", "documentation_url": "..."}
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);

        Err(UpstreamError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// GitHub answers an unknown `user(login:)` with `data.user: null` plus a
/// `NOT_FOUND` error pointing at `["user"]`.
fn user_not_found(errors: &Value) -> bool {
    let Some(errors) = errors.as_array() else {
        return false;
    };
    !errors.is_empty()
        && errors.iter().all(|e| {
            e.get("type").and_then(Value::as_str) == Some("NOT_FOUND")
                && e.get("path") == Some(&serde_json::json!(["user"]))
        })
}
