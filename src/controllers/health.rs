use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::app_data::AppData;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

pub async fn index(data: web::Data<AppData>) -> HttpResponse {
    let connected = match &data.database {
        Some(db) => db.is_connected().await,
        None => false,
    };
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        database: if connected { "connected" } else { "disconnected" },
    })
}
