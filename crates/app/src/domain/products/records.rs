//! Product Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub uuid: ProductUuid,

    /// Unit price in minor currency units.
    pub price: u64,

    /// Units available for purchase.
    pub stock: u64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
