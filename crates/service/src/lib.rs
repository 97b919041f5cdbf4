//! Cart Store and Line-Item Store.
//! - Every mutation runs in one transaction on the connection it is handed.
//! - Reuses entities, wire records and validation from the `models` crate.
//! - `store` puts both behind traits for the HTTP layer.

pub mod errors;
pub mod db;
pub mod store;
#[cfg(test)]
pub mod test_support;

pub use store::{CartStore, LineItemStore, SeaOrmStore};
