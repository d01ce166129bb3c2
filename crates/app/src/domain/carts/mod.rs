//! Carts

pub mod data;
pub mod errors;
mod lines;
pub mod purchase;
pub mod records;
pub mod repository;
pub mod service;
pub mod settings;

pub use errors::{CartsServiceError, ErrorKind};
pub use service::*;
