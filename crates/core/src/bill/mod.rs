//! Bill aggregate and its derivation rules.
//!
//! This module implements the billing core:
//! - The bill aggregate and its domain types
//! - Payment ledger derivation (paid, outstanding, status)
//! - Aggregate delivery-status derivation
//! - Validation rules for payment and item mutations
//!
//! Derived fields are never stored: every read recomputes them from the
//! payment and item collections, so there is no cached state to invalidate
//! across a mutation boundary.

pub mod delivery;
pub mod ledger;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use delivery::resolve_delivery_status;
pub use ledger::{LedgerTotals, resolve_ledger};
pub use types::{
    BillAggregate, BillItem, BillLifecycle, BillStatus, DeliveryStatus, Payment, PaymentInput,
    PaymentMethod, ReceivedItem, ReceivedItemStatus,
};
pub use validation::{PaymentField, ValidationErrors, validate_payment, validate_received_item};
