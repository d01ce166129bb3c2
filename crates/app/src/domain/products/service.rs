//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::NewProduct,
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let price = i64::try_from(product.price)?;
        let stock = i64::try_from(product.stock)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_product(&mut tx, product.uuid, price, stock)
            .await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.purchase_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn purchase_product(
        &self,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if quantity <= 0 {
            return Err(ProductsServiceError::InvalidQuantity(quantity));
        }

        let mut tx = self.db.begin_transaction().await?;

        let Some(updated) = self
            .repository
            .decrement_stock(&mut tx, product, quantity)
            .await?
        else {
            let current = self.repository.get_product(&mut tx, product).await?;

            return Err(ProductsServiceError::InsufficientStock {
                requested: quantity,
                available: current.stock,
            });
        };

        tx.commit().await?;

        info!(remaining_stock = updated.stock, "purchased product stock");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product with the given UUID, price and stock.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Atomically takes `quantity` units out of the product's stock.
    ///
    /// Fails without changing stock when fewer than `quantity` units remain.
    async fn purchase_product(
        &self,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn create_product_returns_price_and_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                price: 999,
                stock: 4,
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 999);
        assert_eq!(product.stock, 4);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn list_products_returns_created_products() -> TestResult {
        let ctx = TestContext::new().await;

        let a = ctx.create_product(100, 1).await?;
        let b = ctx.create_product(200, 1).await?;

        let uuids: Vec<ProductUuid> = ctx
            .products
            .list_products()
            .await?
            .iter()
            .map(|p| p.uuid)
            .collect();

        assert!(uuids.contains(&a.uuid), "product A should be in the list");
        assert!(uuids.contains(&b.uuid), "product B should be in the list");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn purchase_decrements_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10, 5).await?;

        let updated = ctx.products.purchase_product(product.uuid, 2).await?;

        assert_eq!(updated.stock, 3);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn purchase_beyond_stock_fails_and_keeps_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10, 1).await?;

        let result = ctx.products.purchase_product(product.uuid, 3).await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::InsufficientStock {
                    requested: 3,
                    available: 1
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let current = ctx.products.get_product(product.uuid).await?;

        assert_eq!(current.stock, 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn purchase_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.purchase_product(ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn purchase_rejects_non_positive_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10, 5).await?;

        let result = ctx.products.purchase_product(product.uuid, 0).await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }
}
