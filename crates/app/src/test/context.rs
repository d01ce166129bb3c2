//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    database::Db,
    domain::{
        carts::{StoreCartsService, settings::CartsSettings},
        products::{
            PgProductsService, ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        tickets::PgTicketsService,
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub products: Arc<PgProductsService>,
    pub tickets: Arc<PgTicketsService>,
    pub carts: StoreCartsService,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_settings(CartsSettings::default()).await
    }

    pub async fn with_settings(settings: CartsSettings) -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let products = Arc::new(PgProductsService::new(db.clone()));
        let tickets = Arc::new(PgTicketsService::new(db.clone()));

        Self {
            carts: StoreCartsService::postgres(&db, products.clone(), tickets.clone(), settings),
            products,
            tickets,
            db: test_db,
        }
    }

    /// Create a product with a generated UUID.
    pub async fn create_product(
        &self,
        price: u64,
        stock: u64,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                price,
                stock,
            })
            .await
    }
}
