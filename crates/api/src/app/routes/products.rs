use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
};

use catalog_core::Outcome;
use catalog_products::StockDirection;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/increment-stock/:id/:quantity", put(increment_stock))
        .route("/decrement-stock/:id/:quantity", put(decrement_stock))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(r) => return errors::json_error(StatusCode::BAD_REQUEST, r.body_text()),
    };

    match services.products.create_product(body.into()).await {
        Ok(product) => errors::envelope(StatusCode::CREATED, Outcome::success(product)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.products.list_products().await {
        Ok(products) => errors::envelope(StatusCode::OK, Outcome::success(products)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    match services.products.get_product(&id).await {
        Ok(product) => errors::envelope(StatusCode::OK, Outcome::success(product)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(r) => return errors::json_error(StatusCode::BAD_REQUEST, r.body_text()),
    };

    match services.products.update_product(&id, body.into()).await {
        Ok(product) => errors::envelope(StatusCode::OK, Outcome::success(product)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    match services.products.delete_product(&id).await {
        Ok(()) => errors::envelope(StatusCode::OK, Outcome::<()>::done()),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn increment_stock(
    Extension(services): Extension<Arc<AppServices>>,
    path: Result<Path<(String, u32)>, PathRejection>,
) -> Response {
    adjust_stock(&services, path, StockDirection::Increment).await
}

pub async fn decrement_stock(
    Extension(services): Extension<Arc<AppServices>>,
    path: Result<Path<(String, u32)>, PathRejection>,
) -> Response {
    adjust_stock(&services, path, StockDirection::Decrement).await
}

async fn adjust_stock(
    services: &AppServices,
    path: Result<Path<(String, u32)>, PathRejection>,
    direction: StockDirection,
) -> Response {
    let Path((id, quantity)) = match path {
        Ok(v) => v,
        Err(r) => return errors::json_error(StatusCode::BAD_REQUEST, r.body_text()),
    };

    match services
        .products
        .update_stock(&id, direction, i64::from(quantity))
        .await
    {
        Ok(product) => errors::envelope(StatusCode::OK, Outcome::success(product)),
        Err(e) => errors::service_error_to_response(e),
    }
}
