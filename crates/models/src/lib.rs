//! Entities, wire records and body validation for carts and their products.

pub mod errors;
pub mod db;
pub mod validation;
pub mod shopcart;
pub mod product;

pub use product::{NewProduct, ProductRecord};
pub use shopcart::{CreateShopcart, ShopcartRecord};

#[cfg(test)]
mod tests;
