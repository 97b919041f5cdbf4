use std::collections::{BTreeMap, BTreeSet};

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{info, instrument};

use models::errors::{ModelError, ValidationError};
use models::{product, shopcart, NewProduct, ShopcartRecord};
use crate::errors::ServiceError;

/// Products of the given carts, grouped by cart and ordered by id.
async fn products_by_cart<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<BTreeMap<i32, Vec<product::Model>>, ServiceError> {
    let mut grouped: BTreeMap<i32, Vec<product::Model>> = BTreeMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }
    let rows = product::Entity::find()
        .filter(product::Column::ShopcartId.is_in(ids.iter().copied()))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    for p in rows {
        grouped.entry(p.shopcart_id).or_default().push(p);
    }
    Ok(grouped)
}

async fn with_products<C: ConnectionTrait>(db: &C, carts: Vec<shopcart::Model>) -> Result<Vec<ShopcartRecord>, ServiceError> {
    let ids: Vec<i32> = carts.iter().map(|c| c.customer_id).collect();
    let mut grouped = products_by_cart(db, &ids).await?;
    Ok(carts
        .into_iter()
        .map(|c| {
            let products = grouped.remove(&c.customer_id).unwrap_or_default();
            ShopcartRecord::from_parts(c, products)
        })
        .collect())
}

async fn load<C: ConnectionTrait>(db: &C, customer_id: i32) -> Result<Option<ShopcartRecord>, ServiceError> {
    let Some(cart) = shopcart::Entity::find_by_id(customer_id).one(db).await? else {
        return Ok(None);
    };
    let products = cart
        .find_related(product::Entity)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(Some(ShopcartRecord::from_parts(cart, products)))
}

/// Create an empty cart for `customer_id`; an existing cart is a conflict.
#[instrument(skip(db))]
pub async fn create_shopcart(db: &DatabaseConnection, customer_id: i32) -> Result<ShopcartRecord, ServiceError> {
    if shopcart::Entity::find_by_id(customer_id).one(db).await?.is_some() {
        return Err(ServiceError::conflict("Shopcart", customer_id));
    }
    // a concurrent create can still win the race; the primary key decides
    let created = shopcart::insert(db, customer_id).await.map_err(|e| match e {
        ModelError::Duplicate(_) => ServiceError::conflict("Shopcart", customer_id),
        other => other.into(),
    })?;
    info!(customer_id, "created shopcart");
    Ok(ShopcartRecord::from_parts(created, Vec::new()))
}

/// Get a cart with its products.
pub async fn get_shopcart(db: &DatabaseConnection, customer_id: i32) -> Result<Option<ShopcartRecord>, ServiceError> {
    load(db, customer_id).await
}

/// Every cart, ordered by customer id.
pub async fn list_shopcarts(db: &DatabaseConnection) -> Result<Vec<ShopcartRecord>, ServiceError> {
    let carts = shopcart::Entity::find()
        .order_by_asc(shopcart::Column::CustomerId)
        .all(db)
        .await?;
    info!(count = carts.len(), "listing shopcarts");
    with_products(db, carts).await
}

/// Persist `cart` as the new state of its stored counterpart.
///
/// Products whose id already belongs to the cart are replaced in place, the
/// rest are inserted with fresh ids, and stored products missing from
/// `cart.products` are deleted.
#[instrument(skip(db, cart), fields(customer_id = cart.customer_id, products = cart.products.len()))]
pub async fn update_shopcart(db: &DatabaseConnection, cart: &ShopcartRecord) -> Result<ShopcartRecord, ServiceError> {
    let customer_id = cart.customer_id;
    if let Some(stray) = cart.products.iter().find(|p| p.shopcart_id != customer_id) {
        return Err(ValidationError::InvalidValue {
            entity: "Product",
            field: "shopcart_id",
            reason: format!("{} does not match shopcart {}", stray.shopcart_id, customer_id),
        }
        .into());
    }

    let txn = db.begin().await?;
    if shopcart::Entity::find_by_id(customer_id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("Shopcart", customer_id));
    }
    let existing: BTreeSet<i32> = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::ShopcartId.eq(customer_id))
        .into_tuple::<i32>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let mut kept = BTreeSet::new();
    for p in &cart.products {
        if existing.contains(&p.id) && !kept.contains(&p.id) {
            product::replace(&txn, p).await?;
            kept.insert(p.id);
        } else {
            let created = product::insert(&txn, customer_id, &NewProduct::from(p)).await?;
            kept.insert(created.id);
        }
    }

    let stale: Vec<i32> = existing.difference(&kept).copied().collect();
    if !stale.is_empty() {
        product::Entity::delete_many()
            .filter(product::Column::Id.is_in(stale))
            .exec(&txn)
            .await?;
    }

    let stored = load(&txn, customer_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Shopcart", customer_id))?;
    txn.commit().await?;
    info!("updated shopcart");
    Ok(stored)
}

/// Delete a cart and its products; returns true if the cart existed.
///
/// Products go first, then the cart, in one transaction.
#[instrument(skip(db))]
pub async fn delete_shopcart(db: &DatabaseConnection, customer_id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await?;
    let removed_products = product::Entity::delete_many()
        .filter(product::Column::ShopcartId.eq(customer_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let res = shopcart::Entity::delete_by_id(customer_id).exec(&txn).await?;
    txn.commit().await?;
    info!(removed_products, deleted = res.rows_affected > 0, "deleted shopcart");
    Ok(res.rows_affected > 0)
}

/// Remove every product of the cart, keeping the cart itself.
#[instrument(skip(db))]
pub async fn clear_shopcart(db: &DatabaseConnection, customer_id: i32) -> Result<ShopcartRecord, ServiceError> {
    let txn = db.begin().await?;
    let cart = shopcart::Entity::find_by_id(customer_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Shopcart", customer_id))?;
    let removed = product::Entity::delete_many()
        .filter(product::Column::ShopcartId.eq(customer_id))
        .exec(&txn)
        .await?
        .rows_affected;
    txn.commit().await?;
    info!(removed, "cleared shopcart");
    Ok(ShopcartRecord::from_parts(cart, Vec::new()))
}

/// Distinct carts holding at least one product named exactly `name`.
#[instrument(skip(db))]
pub async fn filter_shopcarts_by_product_name(db: &DatabaseConnection, name: &str) -> Result<Vec<ShopcartRecord>, ServiceError> {
    let owners: BTreeSet<i32> = product::Entity::find()
        .select_only()
        .column(product::Column::ShopcartId)
        .filter(product::Column::Name.eq(name))
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    if owners.is_empty() {
        return Ok(Vec::new());
    }
    let carts = shopcart::Entity::find()
        .filter(shopcart::Column::CustomerId.is_in(owners))
        .order_by_asc(shopcart::Column::CustomerId)
        .all(db)
        .await?;
    info!(count = carts.len(), "filtered shopcarts by product name");
    with_products(db, carts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::ProductRecord;

    fn widget() -> NewProduct {
        NewProduct { name: "Widget".into(), price: 9.99, quantity: 2 }
    }

    #[tokio::test]
    async fn create_then_find_returns_empty_cart() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        let created = create_shopcart(&t.db, 42).await?;
        assert_eq!(created, ShopcartRecord::new(42));

        let found = get_shopcart(&t.db, 42).await?.unwrap();
        assert_eq!(found.customer_id, 42);
        assert!(found.products.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn second_create_conflicts_and_leaves_cart_unchanged() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 7).await?;
        product::insert(&t.db, 7, &widget()).await?;

        let err = create_shopcart(&t.db, 7).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let found = get_shopcart(&t.db, 7).await?.unwrap();
        assert_eq!(found.products.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn find_missing_cart_is_none() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        assert!(get_shopcart(&t.db, 99).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_products() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 5).await?;
        let a = product::insert(&t.db, 5, &widget()).await?;
        let b = product::insert(&t.db, 5, &widget()).await?;

        assert!(delete_shopcart(&t.db, 5).await?);
        assert!(get_shopcart(&t.db, 5).await?.is_none());
        assert!(product::Entity::find_by_id(a.id).one(&t.db).await?.is_none());
        assert!(product::Entity::find_by_id(b.id).one(&t.db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_cart_is_not_an_error() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        assert!(!delete_shopcart(&t.db, 99).await?);
        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_products_but_keeps_cart() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 3).await?;
        product::insert(&t.db, 3, &widget()).await?;
        create_shopcart(&t.db, 4).await?;
        product::insert(&t.db, 4, &widget()).await?;

        let cleared = clear_shopcart(&t.db, 3).await?;
        assert!(cleared.products.is_empty());
        assert!(get_shopcart(&t.db, 3).await?.unwrap().products.is_empty());
        assert_eq!(get_shopcart(&t.db, 4).await?.unwrap().products.len(), 1);

        let err = clear_shopcart(&t.db, 99).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn list_returns_every_cart_with_products() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 2).await?;
        create_shopcart(&t.db, 1).await?;
        product::insert(&t.db, 2, &widget()).await?;

        let all = list_shopcarts(&t.db).await?;
        assert_eq!(all.iter().map(|c| c.customer_id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(all[0].products.is_empty());
        assert_eq!(all[1].products.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn filter_by_product_name_deduplicates_carts() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        for id in [1, 2, 3] {
            create_shopcart(&t.db, id).await?;
        }
        product::insert(&t.db, 1, &widget()).await?;
        product::insert(&t.db, 1, &widget()).await?;
        product::insert(&t.db, 3, &widget()).await?;
        product::insert(&t.db, 2, &NewProduct { name: "Widgets".into(), ..widget() }).await?;

        let carts = filter_shopcarts_by_product_name(&t.db, "Widget").await?;
        assert_eq!(carts.iter().map(|c| c.customer_id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(carts[0].products.len(), 2);

        assert!(filter_shopcarts_by_product_name(&t.db, "Nothing").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_product_collection() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 8).await?;
        let keep = product::insert(&t.db, 8, &widget()).await?;
        let drop = product::insert(&t.db, 8, &widget()).await?;

        let desired = ShopcartRecord {
            customer_id: 8,
            products: vec![
                ProductRecord { id: keep.id, shopcart_id: 8, name: "Widget".into(), price: 4.5, quantity: 3 },
                ProductRecord { id: 0, shopcart_id: 8, name: "Gadget".into(), price: 1.0, quantity: 1 },
            ],
        };
        let stored = update_shopcart(&t.db, &desired).await?;

        assert_eq!(stored.products.len(), 2);
        assert_eq!(stored.products[0].id, keep.id);
        assert_eq!(stored.products[0].quantity, 3);
        assert_eq!(stored.products[1].name, "Gadget");
        assert!(product::Entity::find_by_id(drop.id).one(&t.db).await?.is_none());

        // writing the stored state back changes nothing
        let again = update_shopcart(&t.db, &stored).await?;
        assert_eq!(again, stored);
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_leaves_earlier_writes_unapplied() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 8).await?;
        let original = product::insert(&t.db, 8, &widget()).await?;

        let desired = ShopcartRecord {
            customer_id: 8,
            products: vec![
                // replaced first, then undone when the next product fails
                ProductRecord { id: original.id, shopcart_id: 8, name: "Renamed".into(), price: 1.0, quantity: 7 },
                ProductRecord { id: 0, shopcart_id: 8, name: "n".repeat(301), price: 1.0, quantity: 1 },
            ],
        };
        let err = update_shopcart(&t.db, &desired).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidValue { field: "name", .. })));

        let stored = get_shopcart(&t.db, 8).await?.unwrap();
        assert_eq!(stored.products, vec![ProductRecord::from(original)]);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_yield_one_cart_and_one_conflict() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        let (a, b) = tokio::join!(create_shopcart(&t.db, 21), create_shopcart(&t.db, 21));

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
        assert_eq!(list_shopcarts(&t.db).await?, vec![ShopcartRecord::new(21)]);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_foreign_products_and_missing_carts() -> Result<(), anyhow::Error> {
        let t = get_db().await?;
        create_shopcart(&t.db, 8).await?;

        let foreign = ShopcartRecord {
            customer_id: 8,
            products: vec![ProductRecord { id: 1, shopcart_id: 9, name: "Widget".into(), price: 1.0, quantity: 1 }],
        };
        let err = update_shopcart(&t.db, &foreign).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = update_shopcart(&t.db, &ShopcartRecord::new(404)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
