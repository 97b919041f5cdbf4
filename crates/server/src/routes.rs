pub mod products;
pub mod shopcarts;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use utoipa::OpenApi;

use common::types::{Health, ServiceIndex};

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/", tag = "health",
    responses((status = 200, description = "Service index", body = crate::openapi::ServiceIndexDoc))
)]
pub async fn index() -> Json<ServiceIndex> {
    info!("request for root URL");
    Json(ServiceIndex::new("Shopcart REST API Service", env!("CARGO_PKG_VERSION"), "/shopcarts"))
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: index, health, cart and product APIs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let carts = Router::new()
        .route("/shopcarts", get(shopcarts::list_shopcarts).post(shopcarts::create_shopcart))
        .route("/shopcarts/products/:name", get(shopcarts::shopcarts_by_product_name))
        .route(
            "/shopcarts/:customer_id",
            get(shopcarts::get_shopcart)
                .put(shopcarts::update_shopcart)
                .delete(shopcarts::delete_shopcart),
        )
        .route("/shopcarts/:customer_id/clear", put(shopcarts::clear_shopcart))
        .route(
            "/shopcarts/:customer_id/products",
            get(shopcarts::list_cart_products).post(shopcarts::add_product),
        )
        .route(
            "/shopcarts/:customer_id/products/:product_id",
            get(shopcarts::get_cart_product)
                .put(shopcarts::update_cart_product)
                .delete(shopcarts::delete_cart_product),
        );

    let products = Router::new()
        .route(
            "/products",
            get(products::products_by_name)
                .post(products::create_product)
                .put(products::update_product),
        )
        .route("/products/:id", get(products::get_product).delete(products::delete_product));

    public
        .merge(carts)
        .merge(products)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use migration::MigratorTrait;
    use models::db::{connect_with_config, DatabaseConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn test_router() -> anyhow::Result<(tempfile::TempDir, Router)> {
        let dir = tempfile::tempdir()?;
        let mut cfg = DatabaseConfig::sqlite_file(&dir.path().join("routes.db"));
        cfg.min_connections = 1;
        let db = connect_with_config(&cfg).await?;
        migration::Migrator::up(&db, None).await?;
        Ok((dir, build_router(ServerState::from_db(db), CorsLayer::very_permissive())))
    }

    async fn body_json(res: axum::response::Response) -> anyhow::Result<Value> {
        let bytes = to_bytes(res.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn post_json(uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
        Ok(Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?)
    }

    #[tokio::test]
    async fn index_points_at_shopcarts() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let res = app.oneshot(Request::get("/").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await?;
        assert_eq!(body["paths"], "/shopcarts");
        Ok(())
    }

    #[tokio::test]
    async fn create_returns_location() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let res = app.oneshot(post_json("/shopcarts", json!({"customer_id": 42}))?).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::LOCATION], "/shopcarts/42");
        let body = body_json(res).await?;
        assert_eq!(body, json!({"customer_id": 42, "products": []}));
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_unsupported_media_type() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let req = Request::post("/shopcarts")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("customer_id=42"))?;
        let res = app.oneshot(req).await?;
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(res).await?;
        assert_eq!(body["status"], 415);
        Ok(())
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let res = app.oneshot(post_json("/shopcarts", json!({"id": 42}))?).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await?;
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "Invalid Shopcart: missing customer_id");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_path_id_is_json_bad_request() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        for uri in ["/shopcarts/abc", "/shopcarts/1/products/xyz", "/products/abc"] {
            let res = app.clone().oneshot(Request::get(uri).body(Body::empty())?).await?;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
            let body = body_json(res).await?;
            assert_eq!(body["status"], 400);
            assert_eq!(body["error"], "Bad Request");
        }
        Ok(())
    }

    #[tokio::test]
    async fn malformed_query_is_json_bad_request() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let res = app.oneshot(Request::get("/shopcarts?customer_id=abc").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        let body = body_json(res).await?;
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Bad Request");
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_lists_cart_paths() -> anyhow::Result<()> {
        let (_dir, app) = test_router().await?;
        let res = app.oneshot(Request::get("/api-docs/openapi.json").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await?;
        assert!(body["paths"]["/shopcarts/{customer_id}"].is_object());
        assert!(body["paths"]["/products"].is_object());
        let not_found = &body["paths"]["/shopcarts/{customer_id}"]["get"]["responses"]["404"];
        assert_eq!(not_found["content"]["application/json"]["schema"]["$ref"], "#/components/schemas/ErrorDoc");
        Ok(())
    }
}
