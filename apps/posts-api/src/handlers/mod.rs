//! HTTP handlers and route configuration.
//!
//! Two API generations share one repository: `v1` keeps the plain CRUD
//! surface, `v2` adds paging, title search, comments and conflict reporting.

mod health;
mod v1;
mod v2;

use actix_web::{HttpRequest, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .configure(v1::configure)
            .configure(v2::configure),
    );
}

/// Absolute URL of a named route, for `Location` headers and page links.
fn location<U, I>(req: &HttpRequest, name: &str, elements: U) -> Result<String, AppError>
where
    U: IntoIterator<Item = I>,
    I: AsRef<str>,
{
    req.url_for(name, elements)
        .map(|url| url.to_string())
        .map_err(|e| AppError::Internal(format!("cannot build URL for {}: {}", name, e)))
}
