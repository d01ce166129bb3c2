//! Cart Settings

use clap::{Args, ValueEnum};

/// What to do when a line quantity is set to zero or below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LineQuantityPolicy {
    /// Fail with a validation error.
    #[default]
    Reject,

    /// Drop the line from the cart.
    Remove,

    /// Store the value unchanged.
    Permit,
}

/// Cart service settings.
#[derive(Clone, Copy, Debug, Args)]
pub struct CartsSettings {
    /// Conditional write attempts before a concurrent modification is reported
    #[arg(
        long,
        env = "CART_MAX_WRITE_ATTEMPTS",
        default_value_t = DEFAULT_MAX_WRITE_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_write_attempts: u32,

    /// Handling of zero or negative line quantities (reject, remove, permit)
    #[arg(
        long,
        env = "CART_NON_POSITIVE_QUANTITY",
        value_enum,
        default_value_t = LineQuantityPolicy::Reject
    )]
    pub non_positive_quantity: LineQuantityPolicy,
}

const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 3;

impl Default for CartsSettings {
    fn default() -> Self {
        Self {
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            non_positive_quantity: LineQuantityPolicy::default(),
        }
    }
}
