//! Reconciliation of optimistic local credits with the remote store.

mod coordinator;
mod pending;

pub use coordinator::{Confirmation, ConfirmationReport, FlushSummary, ReconciliationCoordinator};
pub use pending::{PendingConfirmation, PendingConfirmations};
