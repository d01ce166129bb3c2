//! Ticket Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Ticket UUID
pub type TicketUuid = TypedUuid<TicketRecord>;

/// Ticket Record
///
/// Immutable once written; one is issued for every checkout, including checkouts where
/// nothing could be purchased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub uuid: TicketUuid,
    pub amount: u64,
    pub purchaser: String,
    pub created_at: Timestamp,
}
