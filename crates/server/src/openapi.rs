use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ServiceIndexDoc { pub name: String, pub version: String, pub paths: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: i32,
    pub shopcart_id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(ToSchema)]
pub struct NewProductDoc { pub name: String, pub price: f64, pub quantity: i32 }

#[derive(ToSchema)]
pub struct PlacedProductDoc { pub shopcart_id: i32, pub name: String, pub price: f64, pub quantity: i32 }

#[derive(ToSchema)]
pub struct ShopcartDoc { pub customer_id: i32, pub products: Vec<ProductDoc> }

#[derive(ToSchema)]
pub struct CreateShopcartDoc { pub customer_id: i32 }

#[derive(ToSchema)]
pub struct ErrorDoc { pub status: u16, pub error: String, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::index,
        crate::routes::health,
        crate::routes::shopcarts::list_shopcarts,
        crate::routes::shopcarts::create_shopcart,
        crate::routes::shopcarts::get_shopcart,
        crate::routes::shopcarts::update_shopcart,
        crate::routes::shopcarts::delete_shopcart,
        crate::routes::shopcarts::clear_shopcart,
        crate::routes::shopcarts::shopcarts_by_product_name,
        crate::routes::shopcarts::list_cart_products,
        crate::routes::shopcarts::add_product,
        crate::routes::shopcarts::get_cart_product,
        crate::routes::shopcarts::update_cart_product,
        crate::routes::shopcarts::delete_cart_product,
        crate::routes::products::create_product,
        crate::routes::products::get_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
        crate::routes::products::products_by_name,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceIndexDoc,
            ProductDoc,
            NewProductDoc,
            PlacedProductDoc,
            ShopcartDoc,
            CreateShopcartDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "shopcarts"),
        (name = "products")
    )
)]
pub struct ApiDoc;
