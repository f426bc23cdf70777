//! Payment ledger derivation.
//!
//! Pure, deterministic derivation of a bill's financial state from its
//! payment list. Calling it twice with the same inputs yields the same
//! outputs; there is no hidden state.

use rust_decimal::Decimal;

use super::types::{BillStatus, Payment};

/// Derived financial state of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Sum of all payment amounts.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`. May be negative here; validated
    /// mutations never persist a negative value.
    pub outstanding_amount: Decimal,
    /// Paid-derived status: one of `Unpaid`, `PartiallyPaid`, `FullyPaid`.
    pub status: BillStatus,
}

/// Derives paid amount, outstanding amount, and status from a payment list.
///
/// Status rules:
/// - `FullyPaid` if `paid >= total` and `total > 0`
/// - `Unpaid` if `paid == 0`
/// - `PartiallyPaid` otherwise
///
/// Lifecycle overrides (draft/cancelled) are applied by the aggregate, not
/// here.
#[must_use]
pub fn resolve_ledger(total_amount: Decimal, payments: &[Payment]) -> LedgerTotals {
    let paid_amount: Decimal = payments.iter().map(|p| p.amount).sum();
    let outstanding_amount = total_amount - paid_amount;

    let status = if paid_amount >= total_amount && total_amount > Decimal::ZERO {
        BillStatus::FullyPaid
    } else if paid_amount.is_zero() {
        BillStatus::Unpaid
    } else {
        BillStatus::PartiallyPaid
    };

    LedgerTotals {
        paid_amount,
        outstanding_amount,
        status,
    }
}
