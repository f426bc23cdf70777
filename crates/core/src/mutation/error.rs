//! Error types for mutation coordination.

use thiserror::Error;

use super::service::ServiceError;
use super::state::MutationTarget;
use crate::bill::validation::ValidationErrors;
use darzi_shared::types::{BillItemId, PaymentId};

/// Errors returned by the mutation coordinator.
///
/// `Validation` and `Busy` are raised before anything is applied, so no
/// rollback is involved. `Remote` is returned only after the optimistic
/// local change has already been rolled back.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The input failed local validation. Nothing reached the network.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Another mutation is already committing against the same target.
    /// The request is dropped, not queued.
    #[error("a mutation is already in flight for {target}")]
    Busy {
        /// The occupied target.
        target: MutationTarget,
    },

    /// The addressed payment is not on the bill.
    #[error("unknown payment {0}")]
    UnknownPayment(PaymentId),

    /// The addressed item is not on the bill.
    #[error("unknown item {0}")]
    UnknownItem(BillItemId),

    /// The remote commit failed; the local state was rolled back to the
    /// pre-mutation snapshot.
    #[error("remote commit failed: {0}")]
    Remote(#[from] ServiceError),
}

impl MutationError {
    /// Returns true if re-invoking the same mutation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
