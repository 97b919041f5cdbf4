//! Create `product` table with FK to `shopcart`.
//!
//! The FK restricts parent deletes; the cart store removes products before
//! their cart inside one transaction.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Name).string_len(260).not_null())
                    .col(ColumnDef::new(Product::Quantity).integer().not_null())
                    .col(ColumnDef::new(Product::Price).double().not_null())
                    .col(ColumnDef::new(Product::ShopcartId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_shopcart")
                            .from(Product::Table, Product::ShopcartId)
                            .to(Shopcart::Table, Shopcart::CustomerId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Quantity, Price, ShopcartId }

#[derive(DeriveIden)]
enum Shopcart { Table, CustomerId }
