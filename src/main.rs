use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use env_logger::Env;
use std::sync::Arc;

use github_analysis::app_data::AppData;
use github_analysis::config::Config;
use github_analysis::database::Database;
use github_analysis::github::GithubClient;
use github_analysis::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    // A failed connection is logged and the server still starts.
    let database = match &config.database_url {
        Some(uri) => match Database::connect(uri).await {
            Ok(db) => Some(Arc::new(db)),
            Err(e) => {
                log::error!("{e:#}");
                None
            }
        },
        None => {
            log::warn!("MONGO_URI not set, running without a database connection");
            None
        }
    };

    let data = web::Data::new(AppData::new(
        GithubClient::from_config(&config),
        database.clone(),
    ));

    log::info!("server is running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::config)
            .wrap(Logger::default())
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("could not bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    if let Some(db) = database {
        db.disconnect().await;
    }

    Ok(())
}
