//! In-memory cart line edits.
//!
//! Each edit works on a copy of a cart's lines; the service persists the result with a
//! revision-checked write.

use crate::domain::{
    carts::{records::CartLine, settings::LineQuantityPolicy},
    products::records::ProductUuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEditError {
    /// The product has no line in the cart.
    Missing,

    /// The quantity was rejected by the configured policy.
    InvalidQuantity(i64),

    /// Incrementing the line would overflow its quantity.
    Overflow,
}

/// Increment the product's line, or append a new line with quantity 1.
pub(crate) fn add_one(
    lines: &mut Vec<CartLine>,
    product: ProductUuid,
) -> Result<(), LineEditError> {
    match lines.iter_mut().find(|line| line.product_uuid == product) {
        Some(line) => {
            line.quantity = line
                .quantity
                .checked_add(1)
                .ok_or(LineEditError::Overflow)?;
        }
        None => lines.push(CartLine::new(product, 1)),
    }

    Ok(())
}

/// Decrement the product's line, dropping it once it would reach zero.
pub(crate) fn remove_one(
    lines: &mut Vec<CartLine>,
    product: ProductUuid,
) -> Result<(), LineEditError> {
    let index = position(lines, product)?;

    if let Some(line) = lines.get_mut(index)
        && line.quantity > 1
    {
        line.quantity -= 1;
    } else {
        lines.remove(index);
    }

    Ok(())
}

/// Overwrite the product's quantity, applying `policy` to zero or negative values.
pub(crate) fn set_quantity(
    lines: &mut Vec<CartLine>,
    product: ProductUuid,
    quantity: i64,
    policy: LineQuantityPolicy,
) -> Result<(), LineEditError> {
    let index = position(lines, product)?;

    if quantity <= 0 {
        match policy {
            LineQuantityPolicy::Reject => return Err(LineEditError::InvalidQuantity(quantity)),
            LineQuantityPolicy::Remove => {
                lines.remove(index);

                return Ok(());
            }
            LineQuantityPolicy::Permit => {}
        }
    }

    if let Some(line) = lines.get_mut(index) {
        line.quantity = quantity;
    }

    Ok(())
}

/// Take purchased quantities out of lines that changed since checkout read them.
///
/// A line matching a purchase exactly is dropped first. Otherwise the purchased quantity is
/// consumed across every positive line for the product, in cart order. Lines added
/// concurrently survive.
pub(crate) fn remove_purchased(lines: &mut Vec<CartLine>, purchased: &[CartLine]) {
    for bought in purchased {
        if let Some(index) = lines.iter().position(|line| line == bought) {
            lines.remove(index);

            continue;
        }

        let mut remaining = bought.quantity;

        lines.retain_mut(|line| {
            if remaining <= 0 || line.product_uuid != bought.product_uuid || line.quantity <= 0 {
                return true;
            }

            if line.quantity > remaining {
                line.quantity -= remaining;
                remaining = 0;

                return true;
            }

            remaining -= line.quantity;

            false
        });
    }
}

fn position(lines: &[CartLine], product: ProductUuid) -> Result<usize, LineEditError> {
    lines
        .iter()
        .position(|line| line.product_uuid == product)
        .ok_or(LineEditError::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: ProductUuid, quantity: i64) -> CartLine {
        CartLine::new(product, quantity)
    }

    #[test]
    fn add_one_appends_new_product() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let mut lines = Vec::new();

        add_one(&mut lines, product)?;

        assert_eq!(lines, vec![line(product, 1)]);

        Ok(())
    }

    #[test]
    fn add_one_twice_increments_single_line() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let mut lines = Vec::new();

        add_one(&mut lines, product)?;
        add_one(&mut lines, product)?;

        assert_eq!(lines, vec![line(product, 2)]);

        Ok(())
    }

    #[test]
    fn add_one_refuses_to_overflow_quantity() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, i64::MAX)];

        let result = add_one(&mut lines, product);

        assert_eq!(result, Err(LineEditError::Overflow));
        assert_eq!(lines, vec![line(product, i64::MAX)]);
    }

    #[test]
    fn add_then_remove_restores_lines() -> Result<(), LineEditError> {
        let existing = ProductUuid::new();
        let added = ProductUuid::new();
        let original = vec![line(existing, 3)];
        let mut lines = original.clone();

        add_one(&mut lines, added)?;
        remove_one(&mut lines, added)?;

        assert_eq!(lines, original);

        Ok(())
    }

    #[test]
    fn remove_one_decrements_quantity() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 2)];

        remove_one(&mut lines, product)?;

        assert_eq!(lines, vec![line(product, 1)]);

        Ok(())
    }

    #[test]
    fn remove_one_missing_line_leaves_lines_unchanged() {
        let product = ProductUuid::new();
        let original = vec![line(product, 2)];
        let mut lines = original.clone();

        let result = remove_one(&mut lines, ProductUuid::new());

        assert_eq!(result, Err(LineEditError::Missing));
        assert_eq!(lines, original);
    }

    #[test]
    fn set_quantity_overwrites_value() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 1)];

        set_quantity(&mut lines, product, 7, LineQuantityPolicy::Reject)?;

        assert_eq!(lines, vec![line(product, 7)]);

        Ok(())
    }

    #[test]
    fn set_quantity_missing_line() {
        let mut lines = vec![line(ProductUuid::new(), 1)];

        let result = set_quantity(&mut lines, ProductUuid::new(), 2, LineQuantityPolicy::Reject);

        assert_eq!(result, Err(LineEditError::Missing));
    }

    #[test]
    fn set_quantity_reject_policy_refuses_zero() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 1)];

        let result = set_quantity(&mut lines, product, 0, LineQuantityPolicy::Reject);

        assert_eq!(result, Err(LineEditError::InvalidQuantity(0)));
        assert_eq!(lines, vec![line(product, 1)]);
    }

    #[test]
    fn set_quantity_remove_policy_drops_line() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let other = ProductUuid::new();
        let mut lines = vec![line(product, 1), line(other, 4)];

        set_quantity(&mut lines, product, -2, LineQuantityPolicy::Remove)?;

        assert_eq!(lines, vec![line(other, 4)]);

        Ok(())
    }

    #[test]
    fn set_quantity_permit_policy_stores_value() -> Result<(), LineEditError> {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 1)];

        set_quantity(&mut lines, product, -2, LineQuantityPolicy::Permit)?;

        assert_eq!(lines, vec![line(product, -2)]);

        Ok(())
    }

    #[test]
    fn remove_purchased_leaves_not_purchased_lines() {
        let bought = ProductUuid::new();
        let kept = ProductUuid::new();
        let mut lines = vec![line(bought, 2), line(kept, 3)];

        remove_purchased(&mut lines, &[line(bought, 2)]);

        assert_eq!(lines, vec![line(kept, 3)]);
    }

    #[test]
    fn remove_purchased_keeps_concurrent_additions() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 3)];

        remove_purchased(&mut lines, &[line(product, 2)]);

        assert_eq!(lines, vec![line(product, 1)]);
    }

    #[test]
    fn remove_purchased_drops_the_matching_duplicate() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 2), line(product, 3)];

        remove_purchased(&mut lines, &[line(product, 3)]);

        assert_eq!(lines, vec![line(product, 2)]);
    }

    #[test]
    fn remove_purchased_consumes_quantity_across_lines() {
        let product = ProductUuid::new();
        let other = ProductUuid::new();
        let mut lines = vec![line(product, 2), line(other, 1), line(product, 4)];

        remove_purchased(&mut lines, &[line(product, 5)]);

        assert_eq!(lines, vec![line(other, 1), line(product, 1)]);
    }

    #[test]
    fn remove_purchased_handles_duplicate_lines() {
        let product = ProductUuid::new();
        let mut lines = vec![line(product, 2), line(product, 3)];

        remove_purchased(&mut lines, &[line(product, 2), line(product, 3)]);

        assert!(lines.is_empty(), "both duplicate lines were purchased");
    }
}
