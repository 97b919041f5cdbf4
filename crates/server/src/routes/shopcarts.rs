use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use models::{CreateShopcart, NewProduct, ProductRecord, ShopcartRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use service::errors::ServiceError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartQuery {
    pub customer_id: Option<i32>,
}

fn cart_location(customer_id: i32) -> String {
    format!("/shopcarts/{}", customer_id)
}

fn product_location(customer_id: i32, product_id: i32) -> String {
    format!("/shopcarts/{}/products/{}", customer_id, product_id)
}

/// The product, but only while it belongs to the addressed cart.
async fn product_in_cart(state: &ServerState, customer_id: i32, product_id: i32) -> Result<ProductRecord, JsonApiError> {
    match state.products.find(product_id).await? {
        Some(p) if p.shopcart_id == customer_id => Ok(p),
        _ => Err(ServiceError::not_found("Product", product_id).into()),
    }
}

#[utoipa::path(
    get, path = "/shopcarts", tag = "shopcarts",
    params(CartQuery),
    responses((status = 200, description = "Carts ordered by customer id", body = [crate::openapi::ShopcartDoc]))
)]
pub async fn list_shopcarts(
    State(state): State<ServerState>,
    query: Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Vec<ShopcartRecord>>, JsonApiError> {
    let Query(q) = query?;
    let carts = match q.customer_id {
        Some(id) => state.carts.find(id).await?.into_iter().collect(),
        None => state.carts.list_all().await?,
    };
    info!(count = carts.len(), "listed shopcarts");
    Ok(Json(carts))
}

#[utoipa::path(
    post, path = "/shopcarts", tag = "shopcarts",
    request_body = crate::openapi::CreateShopcartDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ShopcartDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Cart already exists", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_shopcart(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(body) = payload?;
    let input = CreateShopcart::from_json(&body)?;
    let cart = state.carts.create(input.customer_id).await?;
    let location = cart_location(cart.customer_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(cart)))
}

#[utoipa::path(
    get, path = "/shopcarts/{customer_id}", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ShopcartDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_shopcart(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ShopcartRecord>, JsonApiError> {
    let Path(customer_id) = path?;
    state
        .carts
        .find(customer_id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::not_found("Shopcart", customer_id).into())
}

#[utoipa::path(
    put, path = "/shopcarts/{customer_id}", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    request_body = crate::openapi::ShopcartDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ShopcartDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_shopcart(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ShopcartRecord>, JsonApiError> {
    let Path(customer_id) = path?;
    let Json(body) = payload?;
    let cart = ShopcartRecord::from_json(&body)?;
    if cart.customer_id != customer_id {
        return Err(JsonApiError::bad_request(format!(
            "Invalid Shopcart: customer_id {} does not match the URL ({})",
            cart.customer_id, customer_id
        )));
    }
    Ok(Json(state.carts.update(&cart).await?))
}

#[utoipa::path(
    delete, path = "/shopcarts/{customer_id}", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses((status = 204, description = "Deleted, or was never there"))
)]
pub async fn delete_shopcart(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(customer_id) = path?;
    state.carts.delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/shopcarts/{customer_id}/clear", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Cart with no products", body = crate::openapi::ShopcartDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn clear_shopcart(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ShopcartRecord>, JsonApiError> {
    let Path(customer_id) = path?;
    Ok(Json(state.carts.clear(customer_id).await?))
}

#[utoipa::path(
    get, path = "/shopcarts/products/{name}", tag = "shopcarts",
    params(("name" = String, Path, description = "Exact product name")),
    responses((status = 200, description = "Carts holding a product with that name", body = [crate::openapi::ShopcartDoc]))
)]
pub async fn shopcarts_by_product_name(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ShopcartRecord>>, JsonApiError> {
    let Path(name) = path?;
    Ok(Json(state.carts.filter_by_product_name(&name).await?))
}

#[utoipa::path(
    get, path = "/shopcarts/{customer_id}/products", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Products ordered by id", body = [crate::openapi::ProductDoc]),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_cart_products(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<ProductRecord>>, JsonApiError> {
    let Path(customer_id) = path?;
    Ok(Json(state.products.list_for_cart(customer_id).await?))
}

#[utoipa::path(
    post, path = "/shopcarts/{customer_id}/products", tag = "shopcarts",
    params(("customer_id" = i32, Path, description = "Customer id")),
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Added", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Cart not found", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn add_product(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Path(customer_id) = path?;
    let Json(body) = payload?;
    let input = NewProduct::from_json(&body)?;
    let created = state.products.create(customer_id, &input).await?;
    let location = product_location(customer_id, created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    get, path = "/shopcarts/{customer_id}/products/{product_id}", tag = "shopcarts",
    params(
        ("customer_id" = i32, Path, description = "Customer id"),
        ("product_id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not in this cart", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_cart_product(
    State(state): State<ServerState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<ProductRecord>, JsonApiError> {
    let Path((customer_id, product_id)) = path?;
    Ok(Json(product_in_cart(&state, customer_id, product_id).await?))
}

#[utoipa::path(
    put, path = "/shopcarts/{customer_id}/products/{product_id}", tag = "shopcarts",
    params(
        ("customer_id" = i32, Path, description = "Customer id"),
        ("product_id" = i32, Path, description = "Product id")
    ),
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not in this cart", body = crate::openapi::ErrorDoc),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_cart_product(
    State(state): State<ServerState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductRecord>, JsonApiError> {
    let Path((customer_id, product_id)) = path?;
    let Json(body) = payload?;
    let input = NewProduct::from_json(&body)?;
    Ok(Json(state.products.update_in_cart(customer_id, product_id, &input).await?))
}

#[utoipa::path(
    delete, path = "/shopcarts/{customer_id}/products/{product_id}", tag = "shopcarts",
    params(
        ("customer_id" = i32, Path, description = "Customer id"),
        ("product_id" = i32, Path, description = "Product id")
    ),
    responses((status = 204, description = "Removed, or was not in this cart"))
)]
pub async fn delete_cart_product(
    State(state): State<ServerState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path((customer_id, product_id)) = path?;
    // a product owned by another cart is left alone
    state.products.delete_in_cart(customer_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
