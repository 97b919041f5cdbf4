use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::{NewProduct, ProductRecord, ShopcartRecord};
use crate::db::{product_service, shopcart_service};
use crate::errors::ServiceError;

/// Persistent carts, keyed by customer id.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn create(&self, customer_id: i32) -> Result<ShopcartRecord, ServiceError>;
    async fn find(&self, customer_id: i32) -> Result<Option<ShopcartRecord>, ServiceError>;
    async fn update(&self, cart: &ShopcartRecord) -> Result<ShopcartRecord, ServiceError>;
    async fn delete(&self, customer_id: i32) -> Result<bool, ServiceError>;
    async fn list_all(&self) -> Result<Vec<ShopcartRecord>, ServiceError>;
    async fn filter_by_product_name(&self, name: &str) -> Result<Vec<ShopcartRecord>, ServiceError>;
    async fn clear(&self, customer_id: i32) -> Result<ShopcartRecord, ServiceError>;
}

/// Persistent line items, each owned by one cart.
#[async_trait]
pub trait LineItemStore: Send + Sync {
    async fn create(&self, shopcart_id: i32, input: &NewProduct) -> Result<ProductRecord, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<ProductRecord>, ServiceError>;
    async fn update(&self, record: &ProductRecord) -> Result<ProductRecord, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn update_in_cart(&self, shopcart_id: i32, id: i32, input: &NewProduct) -> Result<ProductRecord, ServiceError>;
    async fn delete_in_cart(&self, shopcart_id: i32, id: i32) -> Result<bool, ServiceError>;
    async fn filter_by_name(&self, name: &str) -> Result<Vec<ProductRecord>, ServiceError>;
    async fn list_for_cart(&self, shopcart_id: i32) -> Result<Vec<ProductRecord>, ServiceError>;
}

/// SeaORM-backed implementation of both stores.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for SeaOrmStore {
    async fn create(&self, customer_id: i32) -> Result<ShopcartRecord, ServiceError> {
        shopcart_service::create_shopcart(&self.db, customer_id).await
    }

    async fn find(&self, customer_id: i32) -> Result<Option<ShopcartRecord>, ServiceError> {
        shopcart_service::get_shopcart(&self.db, customer_id).await
    }

    async fn update(&self, cart: &ShopcartRecord) -> Result<ShopcartRecord, ServiceError> {
        shopcart_service::update_shopcart(&self.db, cart).await
    }

    async fn delete(&self, customer_id: i32) -> Result<bool, ServiceError> {
        shopcart_service::delete_shopcart(&self.db, customer_id).await
    }

    async fn list_all(&self) -> Result<Vec<ShopcartRecord>, ServiceError> {
        shopcart_service::list_shopcarts(&self.db).await
    }

    async fn filter_by_product_name(&self, name: &str) -> Result<Vec<ShopcartRecord>, ServiceError> {
        shopcart_service::filter_shopcarts_by_product_name(&self.db, name).await
    }

    async fn clear(&self, customer_id: i32) -> Result<ShopcartRecord, ServiceError> {
        shopcart_service::clear_shopcart(&self.db, customer_id).await
    }
}

#[async_trait]
impl LineItemStore for SeaOrmStore {
    async fn create(&self, shopcart_id: i32, input: &NewProduct) -> Result<ProductRecord, ServiceError> {
        product_service::create_product(&self.db, shopcart_id, input).await
    }

    async fn find(&self, id: i32) -> Result<Option<ProductRecord>, ServiceError> {
        product_service::get_product(&self.db, id).await
    }

    async fn update(&self, record: &ProductRecord) -> Result<ProductRecord, ServiceError> {
        product_service::update_product(&self.db, record).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        product_service::delete_product(&self.db, id).await
    }

    async fn update_in_cart(&self, shopcart_id: i32, id: i32, input: &NewProduct) -> Result<ProductRecord, ServiceError> {
        product_service::update_cart_product(&self.db, shopcart_id, id, input).await
    }

    async fn delete_in_cart(&self, shopcart_id: i32, id: i32) -> Result<bool, ServiceError> {
        product_service::delete_cart_product(&self.db, shopcart_id, id).await
    }

    async fn filter_by_name(&self, name: &str) -> Result<Vec<ProductRecord>, ServiceError> {
        product_service::filter_products_by_name(&self.db, name).await
    }

    async fn list_for_cart(&self, shopcart_id: i32) -> Result<Vec<ProductRecord>, ServiceError> {
        product_service::list_products_for_cart(&self.db, shopcart_id).await
    }
}
