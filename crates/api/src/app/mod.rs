//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborator wiring (Postgres or in-memory)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and their mapping onto domain inputs
//! - `errors.rs`: consistent envelope error responses

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use catalog_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services, config.request_timeout))
}

/// Router over already-wired services.
pub fn router(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/products", routes::products::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(errors::handle_middleware_error))
                .timeout(request_timeout),
        )
}
