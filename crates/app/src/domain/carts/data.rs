//! Cart Data

use crate::domain::carts::records::{CartLine, CartUuid};

/// New Cart Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,

    /// Lines the cart starts with, usually empty.
    pub lines: Vec<CartLine>,
}

impl NewCart {
    #[must_use]
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            uuid: CartUuid::new(),
            lines,
        }
    }
}
