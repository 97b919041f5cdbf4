use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ValidationError};
use crate::shopcart;
use crate::validation::{validate_name, Fields};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub shopcart_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Shopcart }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Shopcart => Entity::belongs_to(shopcart::Entity)
                .from(Column::ShopcartId)
                .to(shopcart::Column::CustomerId)
                .into(),
        }
    }
}

impl Related<shopcart::Entity> for Entity {
    fn to() -> RelationDef { Relation::Shopcart.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Wire form of a line item: `{id, shopcart_id, name, price, quantity}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: i32,
    pub shopcart_id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl ProductRecord {
    const FIELDS: [&'static str; 5] = ["shopcart_id", "name", "price", "quantity", "id"];

    /// Strict deserialization: all five fields must be present and well typed.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let f = Fields::new("Product", value, &Self::FIELDS)?;
        let shopcart_id = f.int("shopcart_id")?;
        let name = f.string("name")?;
        validate_name(name)?;
        let price = f.number("price")?;
        let quantity = f.int("quantity")?;
        let id = f.int("id")?;
        Ok(Self { id, shopcart_id, name: name.to_string(), price, quantity })
    }
}

impl From<Model> for ProductRecord {
    fn from(m: Model) -> Self {
        Self { id: m.id, shopcart_id: m.shopcart_id, name: m.name, price: m.price, quantity: m.quantity }
    }
}

/// Body of an add-to-cart or scoped update. Identity comes from the store and
/// the owning cart from the request path, so `id` and `shopcart_id` are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl NewProduct {
    const FIELDS: [&'static str; 3] = ["name", "price", "quantity"];

    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let f = Fields::new("Product", value, &Self::FIELDS)?;
        let name = f.string("name")?;
        validate_name(name)?;
        let price = f.number("price")?;
        let quantity = f.int("quantity")?;
        Ok(Self { name: name.to_string(), price, quantity })
    }

    /// Body of a body-addressed create: the owning cart travels in
    /// `shopcart_id`, any `id` is still ignored.
    pub fn placed_from_json(value: &serde_json::Value) -> Result<(i32, Self), ValidationError> {
        let f = Fields::new("Product", value, &["shopcart_id", "name", "price", "quantity"])?;
        let shopcart_id = f.int("shopcart_id")?;
        let name = f.string("name")?;
        validate_name(name)?;
        let price = f.number("price")?;
        let quantity = f.int("quantity")?;
        Ok((shopcart_id, Self { name: name.to_string(), price, quantity }))
    }
}

impl From<&ProductRecord> for NewProduct {
    fn from(r: &ProductRecord) -> Self {
        Self { name: r.name.clone(), price: r.price, quantity: r.quantity }
    }
}

/// Insert a product under `shopcart_id`; the database assigns the id.
pub async fn insert<C: ConnectionTrait>(db: &C, shopcart_id: i32, input: &NewProduct) -> Result<Model, ModelError> {
    validate_name(&input.name)?;
    let am = ActiveModel {
        name: Set(input.name.clone()),
        quantity: Set(input.quantity),
        price: Set(input.price),
        shopcart_id: Set(shopcart_id),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Full-field replace of the row identified by `record.id`.
pub async fn replace<C: ConnectionTrait>(db: &C, record: &ProductRecord) -> Result<Model, ModelError> {
    validate_name(&record.name)?;
    let am = ActiveModel {
        id: Set(record.id),
        name: Set(record.name.clone()),
        quantity: Set(record.quantity),
        price: Set(record.price),
        shopcart_id: Set(record.shopcart_id),
    };
    Ok(am.update(db).await?)
}
