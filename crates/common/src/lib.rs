//! Pieces shared by the server crate and the binary: logging setup and
//! small response types that are not tied to the cart domain.

pub mod types;
pub mod utils;
