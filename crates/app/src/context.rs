//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, StoreCartsService, settings::CartsSettings},
        products::{PgProductsService, ProductsService},
        tickets::{PgTicketsService, TicketsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub products: Arc<dyn ProductsService>,
    pub tickets: Arc<dyn TicketsService>,
    pub carts: Arc<dyn CartsService>,
}

impl AppContext {
    /// Wire the services together over an existing database handle.
    #[must_use]
    pub fn new(db: Db, settings: CartsSettings) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let tickets: Arc<dyn TicketsService> = Arc::new(PgTicketsService::new(db.clone()));

        let carts = Arc::new(StoreCartsService::postgres(
            &db,
            Arc::clone(&products),
            Arc::clone(&tickets),
            settings,
        ));

        Self {
            db,
            products,
            tickets,
            carts,
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        settings: CartsSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::new(Db::new(pool), settings))
    }
}
