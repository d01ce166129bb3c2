use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::{CartsService, CartsServiceError, purchase::PurchaseOutcome, records::CartLine},
        validate,
    },
};

use super::{describe, print_json};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Create a cart, optionally with initial lines
    Create {
        /// Initial line as PRODUCT_UUID:QUANTITY; repeatable
        #[arg(long = "line", value_parser = parse_line)]
        lines: Vec<CartLine>,
    },

    /// List all carts
    List,

    /// Show a cart with its products
    Show { cart: String },

    /// Add one unit of a product
    Add { cart: String, product: String },

    /// Remove one unit of a product
    Remove { cart: String, product: String },

    /// Replace every line of a cart
    Replace {
        cart: String,

        /// Line as PRODUCT_UUID:QUANTITY; repeatable, none empties the cart
        #[arg(long = "line", value_parser = parse_line)]
        lines: Vec<CartLine>,
    },

    /// Set the quantity of a product already in the cart
    SetQuantity {
        cart: String,
        product: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove every line from a cart
    Empty { cart: String },

    /// Check out a cart
    Purchase {
        cart: String,

        /// Email of the purchasing user
        #[arg(long, env = "PURCHASER_EMAIL")]
        purchaser: String,
    },
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    let carts = ctx.carts.as_ref();

    match command.command {
        CartSubcommand::Create { lines } => print_json(&carts.create_cart(lines).await.map_err(failure)?),
        CartSubcommand::List => print_json(&carts.list_carts().await.map_err(failure)?),
        CartSubcommand::Show { cart } => print_json(&carts.get_cart(&cart).await.map_err(failure)?),
        CartSubcommand::Add { cart, product } => {
            print_json(&carts.add_line(&cart, &product).await.map_err(failure)?)
        }
        CartSubcommand::Remove { cart, product } => {
            print_json(&carts.remove_line(&cart, &product).await.map_err(failure)?)
        }
        CartSubcommand::Replace { cart, lines } => {
            print_json(&carts.replace_lines(&cart, lines).await.map_err(failure)?)
        }
        CartSubcommand::SetQuantity {
            cart,
            product,
            quantity,
        } => print_json(
            &carts
                .update_line_quantity(&cart, &product, quantity)
                .await
                .map_err(failure)?,
        ),
        CartSubcommand::Empty { cart } => print_json(&carts.empty_cart(&cart).await.map_err(failure)?),
        CartSubcommand::Purchase { cart, purchaser } => {
            let outcome = carts
                .purchase_cart(&cart, &purchaser)
                .await
                .map_err(failure)?;

            if let PurchaseOutcome::Partial(summary) = &outcome {
                eprintln!("{summary}");
            }

            print_json(&outcome)
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "used directly as a map_err adapter."
)]
fn failure(error: CartsServiceError) -> String {
    format!("{}: {}", error.kind(), describe(&error))
}

fn parse_line(raw: &str) -> Result<CartLine, String> {
    let (product, quantity) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT_UUID:QUANTITY, got {raw:?}"))?;

    let product = validate::id(product, "product").map_err(|error| error.to_string())?;

    let quantity = quantity
        .trim()
        .parse()
        .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

    Ok(CartLine::new(product, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_product_and_quantity() {
        let product = uuid::Uuid::now_v7();

        let line = parse_line(&format!("{product}:3"));

        assert_eq!(line.map(|l| (l.product_uuid.into_uuid(), l.quantity)), Ok((product, 3)));
    }

    #[test]
    fn rejects_missing_quantity() {
        assert!(parse_line("not-a-line").is_err(), "separator is required");
    }

    #[test]
    fn rejects_malformed_product() {
        assert!(parse_line("abc:2").is_err(), "product must be a UUID");
    }
}
