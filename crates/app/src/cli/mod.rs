use std::error::Error;

use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront_app::{
    config::{DatabaseConfig, LoggingConfig},
    context::AppContext,
    domain::carts::settings::CartsSettings,
    observability,
};

mod cart;
mod db;
mod product;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    carts: CartsSettings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    Cart(cart::CartCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let ctx = AppContext::from_database_url(&self.database.database_url, self.carts)
            .await
            .map_err(|error| describe(&error))?;

        match self.command {
            Commands::Db(command) => db::run(&ctx, command).await,
            Commands::Product(command) => product::run(&ctx, command).await,
            Commands::Cart(command) => cart::run(&ctx, command).await,
        }
    }
}

/// Render an error with its chain of sources.
pub(crate) fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to serialise output: {error}"))?;

    println!("{json}");

    Ok(())
}
