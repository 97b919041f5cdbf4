//! Body-addressed product API. Products are named by their own id, and
//! the owning cart travels in the body instead of the path.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use models::{NewProduct, ProductRecord};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use service::errors::ServiceError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::PlacedProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Cart not found", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_product(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(body) = payload?;
    let (shopcart_id, input) = NewProduct::placed_from_json(&body)?;
    let created = state.products.create(shopcart_id, &input).await?;
    let location = format!("/products/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_product(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ProductRecord>, JsonApiError> {
    let Path(id) = path?;
    match state.products.find(id).await? {
        Some(p) => Ok(Json(p)),
        None => Err(ServiceError::not_found("Product", id).into()),
    }
}

#[utoipa::path(
    put, path = "/products", tag = "products",
    request_body = crate::openapi::ProductDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Product or cart not found", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_product(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductRecord>, JsonApiError> {
    let Json(body) = payload?;
    let record = ProductRecord::from_json(&body)?;
    Ok(Json(state.products.update(&record).await?))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses((status = 204, description = "Deleted, or was never there"))
)]
pub async fn delete_product(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = path?;
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(NameQuery),
    responses(
        (status = 200, description = "Products with exactly this name", body = [crate::openapi::ProductDoc]),
        (status = 400, description = "name query parameter missing", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn products_by_name(
    State(state): State<ServerState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductRecord>>, JsonApiError> {
    let Query(q) = query?;
    let name = q.name.ok_or_else(|| JsonApiError::bad_request("query parameter 'name' is required"))?;
    Ok(Json(state.products.filter_by_name(&name).await?))
}
