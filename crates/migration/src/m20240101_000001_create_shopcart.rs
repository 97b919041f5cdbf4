//! Create `shopcart` table.
//!
//! One row per customer; the key is the customer id supplied by the caller.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shopcart::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shopcart::CustomerId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Shopcart::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shopcart { Table, CustomerId }
