//! Storefront Domain Concerns

pub mod carts;
pub mod products;
pub mod tickets;
pub mod validate;
