use actix_web::{web, HttpResponse, Resource};

use crate::error::AppError;

pub mod health;
pub mod profiles;
pub mod statistics;

/// Register every endpoint. `main.rs` and the tests share this.
///
/// Pair with [`unknown_route`] as the app's `default_service` so unmatched
/// paths answer with the standard error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(profiles::configure_routes)
        .configure(statistics::configure_routes);
}

/// Fallback for paths no resource matches.
pub async fn unknown_route() -> Result<HttpResponse, AppError> {
    Err(AppError::route("404: Not Found"))
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::route("405: Method Not Allowed"))
}

/// A resource whose unmatched methods answer with the standard error body.
pub(crate) fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}
