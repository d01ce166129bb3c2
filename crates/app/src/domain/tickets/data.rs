//! Ticket Data

use crate::domain::tickets::records::TicketUuid;

/// New Ticket Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub uuid: TicketUuid,

    /// Total charged, in minor currency units.
    pub amount: u64,

    /// Email of the purchasing user.
    pub purchaser: String,
}
