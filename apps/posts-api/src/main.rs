//! # Posts API Server
//!
//! Blog posts and their comments over HTTP, in two API generations.

use std::io;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::{PostsRootSpanBuilder, RequestIdMiddleware};
use state::AppState;
use telemetry::init_telemetry;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    init_telemetry(&config);

    tracing::info!(
        "Starting Posts API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        App::new()
            // Request ids are resolved inside the logger's root span
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::<PostsRootSpanBuilder>::new())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
