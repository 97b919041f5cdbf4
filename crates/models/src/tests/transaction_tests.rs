use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};

use super::setup_test_db;
use crate::{product, shopcart, NewProduct};

/// Test basic transaction commit
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let txn = db.begin().await?;
    shopcart::insert(&txn, 11).await?;
    product::insert(&txn, 11, &NewProduct { name: "Widget".into(), price: 2.0, quantity: 1 }).await?;
    txn.commit().await?;

    assert!(shopcart::Entity::find_by_id(11).one(&db).await?.is_some());
    assert_eq!(product::Entity::find().count(&db).await?, 1);
    Ok(())
}

/// Test transaction rollback
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let txn = db.begin().await?;
    shopcart::insert(&txn, 12).await?;
    txn.rollback().await?;

    assert!(shopcart::Entity::find_by_id(12).one(&db).await?.is_none());
    Ok(())
}

/// Dropping an uncommitted transaction discards its writes
#[tokio::test]
async fn test_dropped_transaction_rolls_back() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    {
        let txn = db.begin().await?;
        shopcart::insert(&txn, 13).await?;
    }

    assert!(shopcart::Entity::find_by_id(13).one(&db).await?.is_none());
    Ok(())
}
