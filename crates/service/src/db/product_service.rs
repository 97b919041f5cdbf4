use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use models::{product, shopcart, NewProduct, ProductRecord};
use crate::errors::ServiceError;

async fn require_cart<C: ConnectionTrait>(db: &C, customer_id: i32) -> Result<(), ServiceError> {
    match shopcart::Entity::find_by_id(customer_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found("Shopcart", customer_id)),
    }
}

/// Add a product to an existing cart; the store assigns the id.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_product(db: &DatabaseConnection, shopcart_id: i32, input: &NewProduct) -> Result<ProductRecord, ServiceError> {
    let txn = db.begin().await?;
    require_cart(&txn, shopcart_id).await?;
    let created = product::insert(&txn, shopcart_id, input).await?;
    txn.commit().await?;
    info!(id = created.id, "created product");
    Ok(created.into())
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<Option<ProductRecord>, ServiceError> {
    Ok(product::Entity::find_by_id(id).one(db).await?.map(ProductRecord::from))
}

/// Products of one cart, ordered by id.
pub async fn list_products_for_cart(db: &DatabaseConnection, shopcart_id: i32) -> Result<Vec<ProductRecord>, ServiceError> {
    require_cart(db, shopcart_id).await?;
    let rows = product::Entity::find()
        .filter(product::Column::ShopcartId.eq(shopcart_id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ProductRecord::from).collect())
}

/// Overwrite every field of the product `record.id`, moving it to
/// `record.shopcart_id` if that differs. Both must exist.
#[instrument(skip(db, record), fields(id = record.id, shopcart_id = record.shopcart_id))]
pub async fn update_product(db: &DatabaseConnection, record: &ProductRecord) -> Result<ProductRecord, ServiceError> {
    let txn = db.begin().await?;
    if product::Entity::find_by_id(record.id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Product", record.id));
    }
    require_cart(&txn, record.shopcart_id).await?;
    let updated = product::replace(&txn, record).await?;
    txn.commit().await?;
    info!("updated product");
    Ok(updated.into())
}

/// Replace the fields of `product_id` only while it belongs to `shopcart_id`;
/// ownership is checked in the same transaction as the write.
#[instrument(skip(db, input))]
pub async fn update_cart_product(
    db: &DatabaseConnection,
    shopcart_id: i32,
    product_id: i32,
    input: &NewProduct,
) -> Result<ProductRecord, ServiceError> {
    let txn = db.begin().await?;
    let owned = product::Entity::find_by_id(product_id)
        .filter(product::Column::ShopcartId.eq(shopcart_id))
        .one(&txn)
        .await?;
    if owned.is_none() {
        return Err(ServiceError::not_found("Product", product_id));
    }
    let record = ProductRecord {
        id: product_id,
        shopcart_id,
        name: input.name.clone(),
        price: input.price,
        quantity: input.quantity,
    };
    let updated = product::replace(&txn, &record).await?;
    txn.commit().await?;
    info!("updated product in cart");
    Ok(updated.into())
}

/// Delete `product_id` if it belongs to `shopcart_id`; a product owned by
/// another cart is left alone.
#[instrument(skip(db))]
pub async fn delete_cart_product(db: &DatabaseConnection, shopcart_id: i32, product_id: i32) -> Result<bool, ServiceError> {
    let res = product::Entity::delete_many()
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::ShopcartId.eq(shopcart_id))
        .exec(db)
        .await?;
    info!(deleted = res.rows_affected > 0, "deleted product from cart");
    Ok(res.rows_affected > 0)
}

/// Returns true if a row was removed.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await?;
    let res = product::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(deleted = res.rows_affected > 0, "deleted product");
    Ok(res.rows_affected > 0)
}

/// Every product named exactly `name`, across all carts.
pub async fn filter_products_by_name(db: &DatabaseConnection, name: &str) -> Result<Vec<ProductRecord>, ServiceError> {
    let rows = product::Entity::find()
        .filter(product::Column::Name.eq(name))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ProductRecord::from).collect())
}
