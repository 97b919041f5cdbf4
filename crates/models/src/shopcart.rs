use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ValidationError};
use crate::product::{self, ProductRecord};
use crate::validation::Fields;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopcart")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub customer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Product }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Product => Entity::has_many(product::Entity).into() }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Wire form of a cart: `{customer_id, products: [...]}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShopcartRecord {
    pub customer_id: i32,
    pub products: Vec<ProductRecord>,
}

impl ShopcartRecord {
    pub fn new(customer_id: i32) -> Self {
        Self { customer_id, products: Vec::new() }
    }

    pub fn from_parts(cart: Model, products: Vec<product::Model>) -> Self {
        Self {
            customer_id: cart.customer_id,
            products: products.into_iter().map(ProductRecord::from).collect(),
        }
    }

    /// `customer_id` and a (possibly empty) `products` list are required;
    /// each entry must be a complete product.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let f = Fields::new("Shopcart", value, &["customer_id", "products"])?;
        let customer_id = f.int("customer_id")?;
        let products = f
            .array("products")?
            .iter()
            .map(ProductRecord::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { customer_id, products })
    }
}

/// Body of a cart-creation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreateShopcart {
    pub customer_id: i32,
}

impl CreateShopcart {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let f = Fields::new("Shopcart", value, &["customer_id"])?;
        Ok(Self { customer_id: f.int("customer_id")? })
    }
}

/// Insert an empty cart keyed by `customer_id`.
pub async fn insert<C: ConnectionTrait>(db: &C, customer_id: i32) -> Result<Model, ModelError> {
    let am = ActiveModel { customer_id: Set(customer_id) };
    Ok(am.insert(db).await?)
}
