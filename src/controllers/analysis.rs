use actix_web::{HttpResponse, web};

use crate::analysis;
use crate::app_data::AppData;
use crate::error::ApiError;

/// `GET /api/v1/analysis/{username}`
pub async fn show(
    data: web::Data<AppData>,
    username: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let username = username.into_inner();
    let result = analysis::analyze(&data.github, &username).await?;
    log::info!(
        "analysis for {username}: {} languages, {} commits",
        result.repo_stats.len(),
        result.contributions.len()
    );
    Ok(HttpResponse::Ok().json(result))
}
