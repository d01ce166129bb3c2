//! Tickets service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::tickets::{
        data::NewTicket,
        errors::TicketsServiceError,
        records::{TicketRecord, TicketUuid},
        repository::PgTicketsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTicketsService {
    repository: PgTicketsRepository,
}

impl PgTicketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: PgTicketsRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl TicketsService for PgTicketsService {
    #[tracing::instrument(
        name = "tickets.service.create_ticket",
        skip(self, ticket),
        fields(ticket_uuid = %ticket.uuid, amount = ticket.amount),
        err
    )]
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, TicketsServiceError> {
        let amount = i64::try_from(ticket.amount)?;

        let created = self
            .repository
            .create_ticket(ticket.uuid, amount, &ticket.purchaser)
            .await?;

        info!(ticket_uuid = %created.uuid, "issued ticket");

        Ok(created)
    }

    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        self.repository
            .get_ticket(ticket)
            .await
            .map_err(Into::into)
    }
}

/// Purchase record operations.
#[automock]
#[async_trait]
pub trait TicketsService: Send + Sync {
    /// Records a purchase.
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, TicketsServiceError>;

    /// Retrieve a single ticket.
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn create_ticket_persists_amount_and_purchaser() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = TicketUuid::new();
        let before = Timestamp::now();

        let ticket = ctx
            .tickets
            .create_ticket(NewTicket {
                uuid,
                amount: 2_000,
                purchaser: "buyer@example.com".to_string(),
            })
            .await?;

        assert_eq!(ticket.uuid, uuid);
        assert_eq!(ticket.amount, 2_000);
        assert_eq!(ticket.purchaser, "buyer@example.com");
        assert!(ticket.created_at >= before);

        let fetched = ctx.tickets.get_ticket(uuid).await?;

        assert_eq!(fetched, ticket);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn zero_amount_ticket_is_accepted() -> TestResult {
        let ctx = TestContext::new().await;

        let ticket = ctx
            .tickets
            .create_ticket(NewTicket {
                uuid: TicketUuid::new(),
                amount: 0,
                purchaser: "buyer@example.com".to_string(),
            })
            .await?;

        assert_eq!(ticket.amount, 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires Docker for testcontainers"]
    async fn get_ticket_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.tickets.get_ticket(TicketUuid::new()).await;

        assert!(
            matches!(result, Err(TicketsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
