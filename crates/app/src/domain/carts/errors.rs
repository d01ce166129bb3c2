//! Carts service errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as DbErrorKind},
};
use thiserror::Error;

use crate::domain::{
    carts::records::CartUuid,
    products::{ProductsServiceError, records::ProductUuid},
    tickets::TicketsServiceError,
    validate::InvalidIdError,
};

/// Coarse classification of a cart failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,

    /// The cart, product or line does not exist.
    NotFound,

    /// Storage or collaborator failure.
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        })
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),

    #[error("invalid line quantity {0}")]
    InvalidQuantity(i64),

    #[error("quantity of product {0} is too large")]
    QuantityOverflow(ProductUuid),

    #[error("purchaser is required")]
    MissingPurchaser,

    #[error("cart not found")]
    NotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("product {product} not found in cart {cart}")]
    LineNotFound { cart: CartUuid, product: ProductUuid },

    #[error("cart already exists")]
    AlreadyExists,

    #[error("invalid cart data")]
    InvalidData,

    #[error("cart {0} kept changing while being written")]
    WriteConflict(CartUuid),

    #[error("purchase amount overflowed")]
    AmountOverflow,

    #[error("product service failure")]
    Products(#[source] ProductsServiceError),

    #[error("ticket service failure")]
    Tickets(#[from] TicketsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CartsServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId(_)
            | Self::InvalidQuantity(_)
            | Self::QuantityOverflow(_)
            | Self::MissingPurchaser => ErrorKind::Validation,
            Self::NotFound | Self::ProductNotFound(_) | Self::LineNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::AlreadyExists
            | Self::InvalidData
            | Self::WriteConflict(_)
            | Self::AmountOverflow
            | Self::Products(_)
            | Self::Tickets(_)
            | Self::Sql(_) => ErrorKind::Internal,
        }
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(DbErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(DbErrorKind::CheckViolation | DbErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found_kind() {
        let error = CartsServiceError::from(Error::RowNotFound);

        assert!(matches!(error, CartsServiceError::NotFound));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn storage_failures_are_internal() {
        let error = CartsServiceError::from(Error::PoolClosed);

        assert!(matches!(error, CartsServiceError::Sql(_)));
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let error = CartsServiceError::from(InvalidIdError {
            label: "cart",
            value: "nope".to_string(),
        });

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.to_string(), "invalid cart id: \"nope\"");
    }

    #[test]
    fn kind_renders_as_code() {
        assert_eq!(ErrorKind::NotFound.to_string(), "NOT_FOUND");
    }
}
