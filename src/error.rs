use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failure talking to the GitHub REST or GraphQL API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("network error talking to GitHub: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("GraphQL reported errors: {0}")]
    GraphQl(String),

    #[error("unexpected payload from GitHub: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GitHub user `{0}` not found")]
    MissingUser(String),
}

impl UpstreamError {
    /// HTTP status reported by GitHub, when the failure came with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error surfaced to callers of the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status: &'static str,
    error: String,
    upstream_status: Option<u16>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(UpstreamError::MissingUser(_)) => StatusCode::NOT_FOUND,
            ApiError::Upstream(e) if e.upstream_status() == Some(404) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let ApiError::Upstream(upstream) = self;
        log::error!("analysis request failed: {upstream}");
        HttpResponse::build(self.status_code()).json(ErrorBody {
            status: "error",
            error: upstream.to_string(),
            upstream_status: upstream.upstream_status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_not_found_maps_to_404() {
        let err = ApiError::from(UpstreamError::Status {
            status: 404,
            message: "Not Found".into(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::from(UpstreamError::MissingUser("ghost".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_upstream_failures_are_bad_gateway() {
        for status in [401, 403, 500, 502] {
            let err = ApiError::from(UpstreamError::Status {
                status,
                message: "nope".into(),
            });
            assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        }

        let err = ApiError::from(UpstreamError::GraphQl("[]".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_response_uses_status_code() {
        let err = ApiError::from(UpstreamError::Status {
            status: 500,
            message: "boom".into(),
        });
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
