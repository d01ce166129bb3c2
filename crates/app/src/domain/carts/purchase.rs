//! Checkout results.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use crate::domain::{
    carts::records::CartRecord, products::records::ProductUuid, tickets::records::TicketRecord,
};

/// Result of checking out a cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// Every line was purchased; the cart is now empty.
    Completed {
        ticket: TicketRecord,
        cart: CartRecord,
    },

    /// Some lines could not be purchased and remain in the cart.
    Partial(PurchaseSummary),
}

impl PurchaseOutcome {
    #[must_use]
    pub fn ticket(&self) -> &TicketRecord {
        match self {
            Self::Completed { ticket, .. } | Self::Partial(PurchaseSummary { ticket, .. }) => ticket,
        }
    }

    #[must_use]
    pub fn cart(&self) -> &CartRecord {
        match self {
            Self::Completed { cart, .. } | Self::Partial(PurchaseSummary { cart, .. }) => cart,
        }
    }
}

/// Partial checkout details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseSummary {
    pub ticket: TicketRecord,
    pub cart: CartRecord,

    /// Products whose lines could not be purchased, in cart order.
    pub not_purchased: Vec<ProductUuid>,
}

impl Display for PurchaseSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("could not purchase the following products: ")?;

        for (i, product) in self.not_purchased.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{product}")?;
        }

        Ok(())
    }
}
