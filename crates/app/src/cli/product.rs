use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::products::{ProductsService, data::NewProduct, records::ProductUuid},
};
use uuid::Uuid;

use super::{describe, print_json};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Create a product
    Create(CreateProductArgs),

    /// List all products
    List,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Unit price in minor currency units
    #[arg(long)]
    price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    stock: u64,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,
}

pub(crate) async fn run(ctx: &AppContext, command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => {
            let product = ctx
                .products
                .create_product(NewProduct {
                    uuid: args.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
                    price: args.price,
                    stock: args.stock,
                })
                .await
                .map_err(|error| format!("failed to create product: {}", describe(&error)))?;

            print_json(&product)
        }
        ProductSubcommand::List => {
            let products = ctx
                .products
                .list_products()
                .await
                .map_err(|error| format!("failed to list products: {}", describe(&error)))?;

            print_json(&products)
        }
    }
}
