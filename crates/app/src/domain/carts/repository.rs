//! Carts Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, types::Json};
use tracing::debug;

use crate::domain::carts::{
    data::NewCart,
    records::{CartLine, CartRecord, CartUuid},
};

const CREATE_CART_SQL: &str = include_str!("sql/create_cart.sql");
const LIST_CARTS_SQL: &str = include_str!("sql/list_carts.sql");
const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");
const UPDATE_CART_LINES_SQL: &str = include_str!("sql/update_cart_lines.sql");

/// Persistence primitives over cart documents.
#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// Insert a new cart at revision 0.
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, sqlx::Error>;

    /// Every cart, oldest first.
    async fn list_carts(&self) -> Result<Vec<CartRecord>, sqlx::Error>;

    /// A single cart; `RowNotFound` when absent.
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, sqlx::Error>;

    /// Replace the cart's lines if it is still at `expected_revision`.
    ///
    /// Returns `None` without writing when the revision has moved on.
    async fn update_lines(
        &self,
        cart: CartUuid,
        expected_revision: i64,
        lines: Vec<CartLine>,
    ) -> Result<Option<CartRecord>, sqlx::Error>;
}

/// PostgreSQL-backed carts repository.
#[derive(Debug, Clone)]
pub struct PgCartsRepository {
    pool: PgPool,
}

impl PgCartsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(Json(cart.lines))
            .fetch_one(&self.pool)
            .await
    }

    async fn list_carts(&self) -> Result<Vec<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LIST_CARTS_SQL)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&self.pool)
            .await
    }

    async fn update_lines(
        &self,
        cart: CartUuid,
        expected_revision: i64,
        lines: Vec<CartLine>,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        let updated = query_as::<Postgres, CartRecord>(UPDATE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .bind(expected_revision)
            .bind(Json(lines))
            .fetch_optional(&self.pool)
            .await?;

        if updated.is_none() {
            debug!(cart_uuid = %cart, expected_revision, "cart revision mismatch");
        }

        Ok(updated)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            lines: row.try_get::<Json<Vec<CartLine>>, _>("lines")?.0,
            revision: row.try_get("revision")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
