//! Remote bill service contract.
//!
//! The coordinator talks to the authoritative store only through this
//! trait. Implementations live outside this crate (the HTTP client, mocks
//! in tests).

use thiserror::Error;

use crate::bill::types::{BillAggregate, BillItem, DeliveryStatus, Payment, PaymentInput};
use darzi_shared::types::{BillId, CustomerId, PaymentId};

/// Errors surfaced by a remote bill service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure (DNS, connection, TLS).
    #[error("transport error: {0}")]
    Network(String),

    /// The service refused the request.
    #[error("service rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP-like status code.
        status: u16,
        /// Message returned by the service.
        message: String,
    },

    /// The addressed bill or payment does not exist remotely.
    #[error("resource not found")]
    NotFound,

    /// The response could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Scope of a cache invalidation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// Caches keyed by one bill (lists, galleries).
    Bill(BillId),
    /// Caches keyed by one customer.
    Customer(CustomerId),
    /// Everything.
    All,
}

impl std::fmt::Display for CacheScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bill(id) => write!(f, "bill:{id}"),
            Self::Customer(id) => write!(f, "customer:{id}"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Patch persisting item-level delivery changes plus the recomputed
/// aggregate delivery status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillPatch {
    /// The full item list with updated statuses and change dates.
    pub items: Vec<BillItem>,
    /// The aggregate delivery status derived from `items`.
    pub delivery_status: DeliveryStatus,
}

/// Response to a payment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPaymentResponse {
    /// The created payment, with its service-assigned ID.
    pub payment: Payment,
    /// The authoritative recomputed bill.
    pub bill: BillAggregate,
}

/// Abstract remote persistence layer for bills.
///
/// Authority policy: whenever the service returns a bill
/// ([`BillService::add_payment`]), the service's derived fields win and the
/// returned aggregate replaces the local copy. When it returns only the
/// touched entity or nothing (`update_payment`, `delete_payment`,
/// `update_bill`), the local resolvers are authoritative for bill-level
/// derived state.
pub trait BillService: Send + Sync {
    /// Fetches a fresh authoritative snapshot of a bill.
    fn fetch_bill(
        &self,
        bill_id: BillId,
    ) -> impl std::future::Future<Output = Result<BillAggregate, ServiceError>> + Send;

    /// Records a new payment. Returns the created payment and the
    /// authoritative recomputed bill.
    fn add_payment(
        &self,
        bill_id: BillId,
        request: PaymentInput,
    ) -> impl std::future::Future<Output = Result<AddPaymentResponse, ServiceError>> + Send;

    /// Updates an existing payment. Returns the updated payment only; the
    /// caller recomputes bill-level derived fields locally.
    fn update_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
        request: PaymentInput,
    ) -> impl std::future::Future<Output = Result<Payment, ServiceError>> + Send;

    /// Deletes a payment.
    fn delete_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;

    /// Persists item delivery statuses and the aggregate delivery status.
    fn update_bill(
        &self,
        bill_id: BillId,
        patch: BillPatch,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;

    /// Emits a cache invalidation signal. Fire-and-forget: callers log and
    /// swallow failures.
    fn clear_cache(
        &self,
        scope: CacheScope,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_scope_display() {
        let bill_id = BillId::new();
        assert_eq!(
            CacheScope::Bill(bill_id).to_string(),
            format!("bill:{bill_id}")
        );
        assert_eq!(CacheScope::All.to_string(), "all");
    }

    #[test]
    fn test_service_error_display() {
        assert_eq!(ServiceError::Timeout.to_string(), "request timed out");
        assert_eq!(
            ServiceError::Rejected {
                status: 422,
                message: "bad amount".to_string()
            }
            .to_string(),
            "service rejected the request (422): bad amount"
        );
    }
}
