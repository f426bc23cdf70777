//! Property-based tests for the bill derivation rules.
//!
//! - Ledger totality, determinism, and invariant preservation
//! - Delivery-status precedence

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::delivery::resolve_delivery_status;
use super::ledger::resolve_ledger;
use super::types::{BillItem, BillStatus, DeliveryStatus, Payment, PaymentMethod};
use super::validation::validate_payment;
use crate::bill::types::PaymentInput;
use darzi_shared::types::{BillItemId, PaymentId};

/// Strategy to generate non-negative totals (0.00 to 1,000,000.00).
fn total_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive payment amounts (0.01 to 100,000.00).
fn payment_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a list of payments.
fn payment_list() -> impl Strategy<Value = Vec<Payment>> {
    prop::collection::vec(payment_amount(), 0..20).prop_map(|amounts| {
        amounts
            .into_iter()
            .map(|amount| Payment {
                id: PaymentId::new(),
                amount,
                payment_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                method: PaymentMethod::Cash,
                notes: None,
            })
            .collect()
    })
}

/// Strategy to generate one delivery status.
fn delivery_status() -> impl Strategy<Value = DeliveryStatus> {
    prop_oneof![
        Just(DeliveryStatus::Pending),
        Just(DeliveryStatus::InProgress),
        Just(DeliveryStatus::ReadyForDelivery),
        Just(DeliveryStatus::Delivered),
        Just(DeliveryStatus::Cancelled),
    ]
}

/// Strategy to generate a list of items with arbitrary statuses.
fn item_list() -> impl Strategy<Value = Vec<BillItem>> {
    prop::collection::vec(delivery_status(), 0..20).prop_map(|statuses| {
        statuses
            .into_iter()
            .map(|status| BillItem {
                id: BillItemId::new(),
                description: "item".to_string(),
                quantity: 1,
                unit_price: Decimal::ONE,
                delivery_status: status,
                status_change_date: chrono::Utc::now(),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* total and payment list, paid equals the sum of amounts and
    /// outstanding equals total minus paid.
    #[test]
    fn prop_ledger_sums_are_exact(
        total in total_amount(),
        payments in payment_list(),
    ) {
        let totals = resolve_ledger(total, &payments);
        let expected_paid: Decimal = payments.iter().map(|p| p.amount).sum();
        prop_assert_eq!(totals.paid_amount, expected_paid);
        prop_assert_eq!(totals.outstanding_amount, total - expected_paid);
    }

    /// *For any* inputs, the resolver is total and returns exactly one of
    /// the three paid-derived statuses.
    #[test]
    fn prop_ledger_status_is_total(
        total in total_amount(),
        payments in payment_list(),
    ) {
        let totals = resolve_ledger(total, &payments);
        prop_assert!(matches!(
            totals.status,
            BillStatus::Unpaid | BillStatus::PartiallyPaid | BillStatus::FullyPaid
        ));
    }

    /// *For any* inputs, calling the resolver twice yields identical output.
    #[test]
    fn prop_ledger_is_deterministic(
        total in total_amount(),
        payments in payment_list(),
    ) {
        prop_assert_eq!(
            resolve_ledger(total, &payments),
            resolve_ledger(total, &payments)
        );
    }

    /// *For any* total, a sequence of payments admitted by validation keeps
    /// the invariants: paid == sum, outstanding == total - paid, and
    /// outstanding never negative.
    #[test]
    fn prop_validated_sequences_preserve_invariants(
        total in total_amount(),
        candidates in prop::collection::vec(payment_amount(), 0..20),
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let mut payments: Vec<Payment> = Vec::new();

        for amount in candidates {
            let outstanding = resolve_ledger(total, &payments).outstanding_amount;
            let input = PaymentInput {
                amount,
                payment_date: today,
                method: PaymentMethod::Upi,
                notes: None,
            };
            if validate_payment(&input, outstanding, today).is_ok() {
                payments.push(input.into_payment(PaymentId::new()));
            }

            let totals = resolve_ledger(total, &payments);
            let expected_paid: Decimal = payments.iter().map(|p| p.amount).sum();
            prop_assert_eq!(totals.paid_amount, expected_paid);
            prop_assert_eq!(totals.outstanding_amount, total - expected_paid);
            prop_assert!(totals.outstanding_amount >= Decimal::ZERO);
        }
    }

    /// *For any* item multiset, the aggregate is never `Delivered` unless
    /// every non-cancelled item is delivered.
    #[test]
    fn prop_delivered_requires_unanimity(items in item_list()) {
        let aggregate = resolve_delivery_status(&items);
        if aggregate == DeliveryStatus::Delivered {
            for item in items.iter().filter(|i| !i.delivery_status.is_cancelled()) {
                prop_assert_eq!(item.delivery_status, DeliveryStatus::Delivered);
            }
        }
    }

    /// *For any* item multiset, the aggregate is never `ReadyForDelivery`
    /// while an active item is still pending or in progress.
    #[test]
    fn prop_ready_blocked_by_lagging_items(items in item_list()) {
        let aggregate = resolve_delivery_status(&items);
        if aggregate == DeliveryStatus::ReadyForDelivery {
            for item in &items {
                prop_assert!(!matches!(
                    item.delivery_status,
                    DeliveryStatus::Pending | DeliveryStatus::InProgress
                ));
            }
        }
    }

    /// *For any* item multiset, the aggregate is `Cancelled` iff there are
    /// no active items.
    #[test]
    fn prop_cancelled_iff_no_active_items(items in item_list()) {
        let aggregate = resolve_delivery_status(&items);
        let any_active = items.iter().any(|i| !i.delivery_status.is_cancelled());
        prop_assert_eq!(aggregate == DeliveryStatus::Cancelled, !any_active);
    }
}
