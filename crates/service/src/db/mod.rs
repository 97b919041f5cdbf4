pub mod shopcart_service;
pub mod product_service;
