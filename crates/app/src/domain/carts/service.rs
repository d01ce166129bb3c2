//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCart,
            errors::CartsServiceError,
            lines::{self, LineEditError},
            purchase::{PurchaseOutcome, PurchaseSummary},
            records::{CartDetails, CartLine, CartLineDetails, CartRecord, CartUuid},
            repository::{CartsRepository, PgCartsRepository},
            settings::CartsSettings,
        },
        products::{
            ProductsService, ProductsServiceError,
            records::{ProductRecord, ProductUuid},
        },
        tickets::{
            TicketsService,
            data::NewTicket,
            records::TicketUuid,
        },
        validate,
    },
};

/// Cart operations over a [`CartsRepository`], coordinating products and tickets.
pub struct StoreCartsService {
    carts: Arc<dyn CartsRepository>,
    products: Arc<dyn ProductsService>,
    tickets: Arc<dyn TicketsService>,
    settings: CartsSettings,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsRepository>,
        products: Arc<dyn ProductsService>,
        tickets: Arc<dyn TicketsService>,
        settings: CartsSettings,
    ) -> Self {
        Self {
            carts,
            products,
            tickets,
            settings,
        }
    }

    /// Build a service storing carts in `PostgreSQL`.
    #[must_use]
    pub fn postgres(
        db: &Db,
        products: Arc<dyn ProductsService>,
        tickets: Arc<dyn TicketsService>,
        settings: CartsSettings,
    ) -> Self {
        Self::new(
            Arc::new(PgCartsRepository::new(db.pool().clone())),
            products,
            tickets,
            settings,
        )
    }

    async fn find_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        self.carts.get_cart(cart).await.map_err(Into::into)
    }

    async fn find_product(&self, product: ProductUuid) -> Result<ProductRecord, CartsServiceError> {
        self.products
            .get_product(product)
            .await
            .map_err(|error| match error {
                ProductsServiceError::NotFound => CartsServiceError::ProductNotFound(product),
                other => CartsServiceError::Products(other),
            })
    }

    /// Apply `edit` to the cart's lines and write them back if nobody else wrote first.
    ///
    /// On a revision mismatch the cart is re-read and `edit` re-applied, up to
    /// `max_write_attempts` writes in total. An `edit` error aborts without writing.
    async fn write_lines<F>(
        &self,
        mut current: CartRecord,
        mut edit: F,
    ) -> Result<CartRecord, CartsServiceError>
    where
        F: FnMut(&mut Vec<CartLine>) -> Result<(), CartsServiceError> + Send,
    {
        let mut attempt = 1;

        loop {
            let mut lines = current.lines.clone();

            edit(&mut lines)?;

            if let Some(updated) = self
                .carts
                .update_lines(current.uuid, current.revision, lines)
                .await?
            {
                return Ok(updated);
            }

            if attempt >= self.settings.max_write_attempts {
                warn!(cart_uuid = %current.uuid, attempt, "giving up on conflicting cart writes");

                return Err(CartsServiceError::WriteConflict(current.uuid));
            }

            attempt += 1;

            current = self.find_cart(current.uuid).await?;
        }
    }

    /// Purchase one line on top of `amount`, returning the new total.
    ///
    /// The total is checked against [`MAX_AMOUNT`] before any stock is taken.
    async fn purchase_line(&self, line: &CartLine, amount: u64) -> Result<u64, CartsServiceError> {
        let Some(quantity) = u64::try_from(line.quantity).ok().filter(|q| *q > 0) else {
            return Err(CartsServiceError::InvalidQuantity(line.quantity));
        };

        let product = self.find_product(line.product_uuid).await?;

        let total = product
            .price
            .checked_mul(quantity)
            .and_then(|subtotal| amount.checked_add(subtotal))
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(CartsServiceError::AmountOverflow)?;

        self.products
            .purchase_product(line.product_uuid, line.quantity)
            .await
            .map_err(CartsServiceError::Products)?;

        Ok(total)
    }
}

impl Debug for StoreCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoreCartsService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Largest ticket amount storage accepts.
const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

fn line_error(cart: CartUuid, product: ProductUuid) -> impl Fn(LineEditError) -> CartsServiceError {
    move |error| match error {
        LineEditError::Missing => CartsServiceError::LineNotFound { cart, product },
        LineEditError::InvalidQuantity(quantity) => CartsServiceError::InvalidQuantity(quantity),
        LineEditError::Overflow => CartsServiceError::QuantityOverflow(product),
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(
        name = "carts.service.create_cart",
        skip(self, lines),
        fields(line_count = lines.len()),
        err
    )]
    async fn create_cart(&self, lines: Vec<CartLine>) -> Result<CartRecord, CartsServiceError> {
        let created = self.carts.create_cart(NewCart::with_lines(lines)).await?;

        info!(cart_uuid = %created.uuid, "created cart");

        Ok(created)
    }

    #[tracing::instrument(name = "carts.service.list_carts", skip(self), err)]
    async fn list_carts(&self) -> Result<Vec<CartRecord>, CartsServiceError> {
        self.carts.list_carts().await.map_err(Into::into)
    }

    #[tracing::instrument(name = "carts.service.get_cart", skip(self), err)]
    async fn get_cart(&self, cart: &str) -> Result<CartDetails, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;

        let record = self.find_cart(cart).await?;

        let mut lines = Vec::with_capacity(record.lines.len());

        for line in record.lines {
            let product = match self.products.get_product(line.product_uuid).await {
                Ok(product) => Some(product),
                Err(ProductsServiceError::NotFound) => None,
                Err(error) => return Err(CartsServiceError::Products(error)),
            };

            lines.push(CartLineDetails {
                product_uuid: line.product_uuid,
                quantity: line.quantity,
                product,
            });
        }

        Ok(CartDetails {
            uuid: record.uuid,
            lines,
            revision: record.revision,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    #[tracing::instrument(name = "carts.service.add_line", skip(self), err)]
    async fn add_line(&self, cart: &str, product: &str) -> Result<CartRecord, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;
        let product: ProductUuid = validate::id(product, "product")?;

        let current = self.find_cart(cart).await?;

        self.find_product(product).await?;

        let to_error = line_error(cart, product);

        self.write_lines(current, move |lines| {
            lines::add_one(lines, product).map_err(&to_error)
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.remove_line", skip(self), err)]
    async fn remove_line(&self, cart: &str, product: &str) -> Result<CartRecord, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;
        let product: ProductUuid = validate::id(product, "product")?;

        let current = self.find_cart(cart).await?;

        self.find_product(product).await?;

        let to_error = line_error(cart, product);

        self.write_lines(current, move |lines| {
            lines::remove_one(lines, product).map_err(&to_error)
        })
        .await
    }

    #[tracing::instrument(
        name = "carts.service.replace_lines",
        skip(self, lines),
        fields(line_count = lines.len()),
        err
    )]
    async fn replace_lines(
        &self,
        cart: &str,
        lines: Vec<CartLine>,
    ) -> Result<CartRecord, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;

        let current = self.find_cart(cart).await?;

        self.write_lines(current, move |existing| {
            existing.clone_from(&lines);

            Ok(())
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.update_line_quantity", skip(self), err)]
    async fn update_line_quantity(
        &self,
        cart: &str,
        product: &str,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;
        let product: ProductUuid = validate::id(product, "product")?;

        let current = self.find_cart(cart).await?;

        self.find_product(product).await?;

        let policy = self.settings.non_positive_quantity;
        let to_error = line_error(cart, product);

        self.write_lines(current, move |lines| {
            lines::set_quantity(lines, product, quantity, policy).map_err(&to_error)
        })
        .await
    }

    #[tracing::instrument(name = "carts.service.empty_cart", skip(self), err)]
    async fn empty_cart(&self, cart: &str) -> Result<CartRecord, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;

        let current = self.find_cart(cart).await?;

        self.write_lines(current, |lines| {
            lines.clear();

            Ok(())
        })
        .await
    }

    #[tracing::instrument(
        name = "carts.service.purchase_cart",
        skip(self, purchaser),
        fields(
            amount = tracing::field::Empty,
            not_purchased_count = tracing::field::Empty
        ),
        err
    )]
    async fn purchase_cart(
        &self,
        cart: &str,
        purchaser: &str,
    ) -> Result<PurchaseOutcome, CartsServiceError> {
        let cart: CartUuid = validate::id(cart, "cart")?;

        let purchaser = purchaser.trim();

        if purchaser.is_empty() {
            return Err(CartsServiceError::MissingPurchaser);
        }

        let current = self.find_cart(cart).await?;

        let mut amount: u64 = 0;
        let mut purchased = Vec::with_capacity(current.lines.len());
        let mut kept = Vec::new();
        let mut not_purchased = Vec::new();

        // Every attempt settles before the ticket is issued and the cart rewritten.
        for line in &current.lines {
            match self.purchase_line(line, amount).await {
                Ok(total) => {
                    amount = total;

                    purchased.push(*line);
                }
                Err(error) => {
                    warn!(
                        product_uuid = %line.product_uuid,
                        quantity = line.quantity,
                        %error,
                        "cart line not purchased"
                    );

                    kept.push(*line);
                    not_purchased.push(line.product_uuid);
                }
            }
        }

        let span = Span::current();

        span.record("amount", amount);
        span.record("not_purchased_count", not_purchased.len());

        let ticket = self
            .tickets
            .create_ticket(NewTicket {
                uuid: TicketUuid::new(),
                amount,
                purchaser: purchaser.to_string(),
            })
            .await?;

        let mut first_attempt = true;

        // The first attempt writes over the lines checkout read; a retry sees newer lines.
        let cart = self
            .write_lines(current, move |lines| {
                if first_attempt {
                    first_attempt = false;
                    lines.clone_from(&kept);
                } else {
                    lines::remove_purchased(lines, &purchased);
                }

                Ok(())
            })
            .await?;

        info!(cart_uuid = %cart.uuid, ticket_uuid = %ticket.uuid, amount, "checked out cart");

        if not_purchased.is_empty() {
            return Ok(PurchaseOutcome::Completed { ticket, cart });
        }

        Ok(PurchaseOutcome::Partial(PurchaseSummary {
            ticket,
            cart,
            not_purchased,
        }))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates a cart holding `lines` (usually none).
    async fn create_cart(&self, lines: Vec<CartLine>) -> Result<CartRecord, CartsServiceError>;

    /// Retrieves all carts.
    async fn list_carts(&self) -> Result<Vec<CartRecord>, CartsServiceError>;

    /// Retrieve a single cart with its products resolved.
    async fn get_cart(&self, cart: &str) -> Result<CartDetails, CartsServiceError>;

    /// Add one unit of a product, merging with an existing line.
    async fn add_line(&self, cart: &str, product: &str) -> Result<CartRecord, CartsServiceError>;

    /// Remove one unit of a product, dropping the line at quantity 1.
    async fn remove_line(&self, cart: &str, product: &str)
    -> Result<CartRecord, CartsServiceError>;

    /// Replace every line with `lines`, as given.
    async fn replace_lines(
        &self,
        cart: &str,
        lines: Vec<CartLine>,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Overwrite the quantity of an existing line.
    async fn update_line_quantity(
        &self,
        cart: &str,
        product: &str,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line.
    async fn empty_cart(&self, cart: &str) -> Result<CartRecord, CartsServiceError>;

    /// Check out the cart, issuing a ticket for whatever could be purchased.
    async fn purchase_cart(
        &self,
        cart: &str,
        purchaser: &str,
    ) -> Result<PurchaseOutcome, CartsServiceError>;
}
