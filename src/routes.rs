use actix_web::web;

use crate::controllers;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(controllers::health::index))
            .route(
                "/analysis/{username}",
                web::get().to(controllers::analysis::show),
            )
            .route(
                "/profile/{username}",
                web::get().to(controllers::profile::show),
            ),
    );
}
