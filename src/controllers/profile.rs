use actix_web::{HttpResponse, web};

use crate::app_data::AppData;
use crate::error::ApiError;

/// `GET /api/v1/profile/{username}`, the user's GitHub profile as-is.
pub async fn show(
    data: web::Data<AppData>,
    username: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let profile = data.github.profile(&username).await?;
    Ok(HttpResponse::Ok().json(profile))
}
