//! Cart Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::products::records::{ProductRecord, ProductUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// Lines are persisted together as one JSON document. `revision` is bumped on every write
/// and guards updates against concurrent writers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub lines: Vec<CartLine>,
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product and how many units of it are in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
}

impl CartLine {
    #[must_use]
    pub fn new(product_uuid: ProductUuid, quantity: i64) -> Self {
        Self {
            product_uuid,
            quantity,
        }
    }
}

/// Cart with each line's product resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartDetails {
    pub uuid: CartUuid,
    pub lines: Vec<CartLineDetails>,
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart line with its product, when the product still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineDetails {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
    pub product: Option<ProductRecord>,
}
