//! Tickets Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::try_get_amount,
    domain::tickets::records::{TicketRecord, TicketUuid},
};

const CREATE_TICKET_SQL: &str = include_str!("sql/create_ticket.sql");
const GET_TICKET_SQL: &str = include_str!("sql/get_ticket.sql");

/// PostgreSQL-backed tickets repository.
#[derive(Debug, Clone)]
pub(crate) struct PgTicketsRepository {
    pool: PgPool,
}

impl PgTicketsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_ticket(
        &self,
        ticket: TicketUuid,
        amount: i64,
        purchaser: &str,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(CREATE_TICKET_SQL)
            .bind(ticket.into_uuid())
            .bind(amount)
            .bind(purchaser)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(GET_TICKET_SQL)
            .bind(ticket.into_uuid())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TicketRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TicketUuid::from_uuid(row.try_get("uuid")?),
            amount: try_get_amount(row, "amount")?,
            purchaser: row.try_get("purchaser")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
