//! Bill domain types.
//!
//! The aggregate owns its payments, items, and received garments. Financial
//! and delivery state (`paid_amount`, `outstanding_amount`, `status`,
//! `delivery_status`) is derived on every read and never stored, so the
//! aggregate cannot drift out of sync with its collections.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use darzi_shared::types::{BillId, BillItemId, CustomerId, PaymentId, ReceivedItemId};

use super::delivery::resolve_delivery_status;
use super::ledger::resolve_ledger;

/// Overall payment status of a bill.
///
/// `Draft` and `Cancelled` are lifecycle overrides: when the bill itself is
/// in one of those terminal states, it masks whatever the payment ledger
/// would otherwise derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// No payment has been recorded.
    Unpaid,
    /// Some, but not all, of the total has been paid.
    PartiallyPaid,
    /// The total has been paid in full.
    FullyPaid,
    /// The bill has not been finalized.
    Draft,
    /// The bill has been cancelled.
    Cancelled,
}

impl BillStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::FullyPaid => "fully_paid",
            Self::Draft => "draft",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of the bill itself, stored on the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillLifecycle {
    /// The bill is live; status derives from the payment ledger.
    Active,
    /// The bill has not been finalized.
    Draft,
    /// The bill has been cancelled.
    Cancelled,
}

impl BillLifecycle {
    /// Returns the status override for terminal lifecycles, if any.
    #[must_use]
    pub fn status_override(&self) -> Option<BillStatus> {
        match self {
            Self::Active => None,
            Self::Draft => Some(BillStatus::Draft),
            Self::Cancelled => Some(BillStatus::Cancelled),
        }
    }
}

/// Delivery status of a single item, and of the bill as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Work has not started.
    Pending,
    /// Work is underway.
    InProgress,
    /// Finished and waiting for pickup or delivery.
    ReadyForDelivery,
    /// Handed over to the customer.
    Delivered,
    /// The item was cancelled.
    Cancelled,
}

impl DeliveryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::ReadyForDelivery => "ready_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the item no longer counts toward the aggregate.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a payment was made. Closed set; the wire boundary rejects anything
/// outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    Cash,
    /// Card payment.
    Card,
    /// UPI transfer.
    Upi,
    /// Bank transfer.
    BankTransfer,
    /// Any other method.
    Other,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::BankTransfer => "bank_transfer",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "bank_transfer" => Ok(Self::BankTransfer),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// A recorded payment against a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Unique payment ID.
    pub id: PaymentId,
    /// Amount paid (always positive).
    pub amount: Decimal,
    /// Calendar date the payment was made.
    pub payment_date: NaiveDate,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Optional free-form note.
    pub notes: Option<String>,
}

/// Input for adding or editing a payment.
///
/// IDs are assigned by the system, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    /// Amount to record (must be positive).
    pub amount: Decimal,
    /// Calendar date of the payment (must not be in the future).
    pub payment_date: NaiveDate,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Optional free-form note (bounded length).
    pub notes: Option<String>,
}

impl PaymentInput {
    /// Materializes this input into a payment with the given ID.
    #[must_use]
    pub fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            amount: self.amount,
            payment_date: self.payment_date,
            method: self.method,
            notes: self.notes,
        }
    }
}

/// A line item on a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillItem {
    /// Unique item ID.
    pub id: BillItemId,
    /// What the item is (e.g., "Sherwani stitching").
    pub description: String,
    /// Number of units.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Current delivery status of this item.
    pub delivery_status: DeliveryStatus,
    /// When the delivery status last changed.
    pub status_change_date: DateTime<Utc>,
}

impl BillItem {
    /// Returns the line total (`quantity * unit_price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Status of a garment received from the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivedItemStatus {
    /// The shop holds the garment.
    Received,
    /// The garment has been returned to the customer.
    Returned,
}

/// A garment received from the customer for alteration or as a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedItem {
    /// Unique received-item ID.
    pub id: ReceivedItemId,
    /// What was received.
    pub description: String,
    /// Number of pieces.
    pub quantity: u32,
    /// When the garment was received.
    pub received_date: NaiveDate,
    /// Whether the shop still holds the garment.
    pub status: ReceivedItemStatus,
    /// When it was returned; set iff `status` is `Returned`.
    pub returned_date: Option<NaiveDate>,
}

/// The canonical in-memory representation of one bill.
///
/// Constructed from a remote snapshot and owned by a single UI session.
/// Payments and item statuses change only through the mutation coordinator;
/// the aggregate is replaced wholesale when a fresh snapshot is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillAggregate {
    /// Unique bill ID.
    pub id: BillId,
    /// The customer this bill belongs to.
    pub customer_id: CustomerId,
    /// Date the bill was raised.
    pub bill_date: NaiveDate,
    /// Total billed amount, fixed once items are finalized.
    pub total_amount: Decimal,
    /// Stored lifecycle state (active, draft, cancelled).
    pub lifecycle: BillLifecycle,
    /// Recorded payments, in insertion order.
    pub payments: Vec<Payment>,
    /// Line items, each carrying its own delivery status.
    pub items: Vec<BillItem>,
    /// Garments received from the customer.
    pub received_items: Vec<ReceivedItem>,
}

impl BillAggregate {
    /// Sum of all payment amounts. Recomputed on every read.
    #[must_use]
    pub fn paid_amount(&self) -> Decimal {
        resolve_ledger(self.total_amount, &self.payments).paid_amount
    }

    /// Remaining amount owed. Recomputed on every read.
    ///
    /// May be negative for an unvalidated snapshot; validated mutations
    /// never drive it below zero.
    #[must_use]
    pub fn outstanding_amount(&self) -> Decimal {
        resolve_ledger(self.total_amount, &self.payments).outstanding_amount
    }

    /// Overall payment status, with the lifecycle override applied.
    #[must_use]
    pub fn status(&self) -> BillStatus {
        self.lifecycle
            .status_override()
            .unwrap_or_else(|| resolve_ledger(self.total_amount, &self.payments).status)
    }

    /// Aggregate delivery status derived from the items.
    #[must_use]
    pub fn delivery_status(&self) -> DeliveryStatus {
        resolve_delivery_status(&self.items)
    }

    /// Payments ordered for display: most recent payment date first.
    #[must_use]
    pub fn payments_sorted(&self) -> Vec<&Payment> {
        let mut sorted: Vec<&Payment> = self.payments.iter().collect();
        sorted.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        sorted
    }

    /// Looks up a payment by ID.
    #[must_use]
    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    /// Looks up an item by ID.
    #[must_use]
    pub fn item(&self, id: BillItemId) -> Option<&BillItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Inserts a payment. Returns false if a payment with the same ID
    /// already exists (the aggregate never holds duplicate IDs).
    pub fn insert_payment(&mut self, payment: Payment) -> bool {
        if self.payment(payment.id).is_some() {
            return false;
        }
        self.payments.push(payment);
        true
    }

    /// Replaces the payment with the same ID. Returns false if no such
    /// payment exists.
    pub fn replace_payment(&mut self, payment: Payment) -> bool {
        match self.payments.iter_mut().find(|p| p.id == payment.id) {
            Some(slot) => {
                *slot = payment;
                true
            }
            None => false,
        }
    }

    /// Removes a payment by ID, returning it if present.
    pub fn remove_payment(&mut self, id: PaymentId) -> Option<Payment> {
        let index = self.payments.iter().position(|p| p.id == id)?;
        Some(self.payments.remove(index))
    }

    /// Sets an item's delivery status and stamps the change time.
    ///
    /// Returns the previous status, or `None` if the item is unknown.
    pub fn set_item_status(
        &mut self,
        id: BillItemId,
        status: DeliveryStatus,
        changed_at: DateTime<Utc>,
    ) -> Option<DeliveryStatus> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        let previous = item.delivery_status;
        item.delivery_status = status;
        item.status_change_date = changed_at;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_bill(total: Decimal) -> BillAggregate {
        BillAggregate {
            id: BillId::new(),
            customer_id: CustomerId::new(),
            bill_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            total_amount: total,
            lifecycle: BillLifecycle::Active,
            payments: Vec::new(),
            items: Vec::new(),
            received_items: Vec::new(),
        }
    }

    fn payment(amount: Decimal, date: NaiveDate) -> Payment {
        Payment {
            id: PaymentId::new(),
            amount,
            payment_date: date,
            method: PaymentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn test_derived_fields_track_payments() {
        let mut bill = sample_bill(dec!(1000));
        assert_eq!(bill.paid_amount(), Decimal::ZERO);
        assert_eq!(bill.status(), BillStatus::Unpaid);

        let date = bill.bill_date;
        assert!(bill.insert_payment(payment(dec!(800), date)));
        assert_eq!(bill.paid_amount(), dec!(800));
        assert_eq!(bill.outstanding_amount(), dec!(200));
        assert_eq!(bill.status(), BillStatus::PartiallyPaid);

        assert!(bill.insert_payment(payment(dec!(200), date)));
        assert_eq!(bill.paid_amount(), dec!(1000));
        assert_eq!(bill.outstanding_amount(), Decimal::ZERO);
        assert_eq!(bill.status(), BillStatus::FullyPaid);
    }

    #[test]
    fn test_lifecycle_overrides_derived_status() {
        let mut bill = sample_bill(dec!(1000));
        bill.insert_payment(payment(dec!(1000), bill.bill_date));
        assert_eq!(bill.status(), BillStatus::FullyPaid);

        bill.lifecycle = BillLifecycle::Cancelled;
        assert_eq!(bill.status(), BillStatus::Cancelled);

        bill.lifecycle = BillLifecycle::Draft;
        assert_eq!(bill.status(), BillStatus::Draft);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut bill = sample_bill(dec!(500));
        let first = payment(dec!(100), bill.bill_date);
        let duplicate = Payment {
            id: first.id,
            ..payment(dec!(200), bill.bill_date)
        };
        assert!(bill.insert_payment(first));
        assert!(!bill.insert_payment(duplicate));
        assert_eq!(bill.payments.len(), 1);
        assert_eq!(bill.paid_amount(), dec!(100));
    }

    #[test]
    fn test_replace_and_remove_payment() {
        let mut bill = sample_bill(dec!(500));
        let original = payment(dec!(100), bill.bill_date);
        let id = original.id;
        bill.insert_payment(original);

        let edited = Payment {
            id,
            amount: dec!(150),
            payment_date: bill.bill_date,
            method: PaymentMethod::Upi,
            notes: Some("adjusted".to_string()),
        };
        assert!(bill.replace_payment(edited));
        assert_eq!(bill.paid_amount(), dec!(150));

        let removed = bill.remove_payment(id).unwrap();
        assert_eq!(removed.amount, dec!(150));
        assert_eq!(bill.paid_amount(), Decimal::ZERO);
        assert!(bill.remove_payment(id).is_none());
    }

    #[test]
    fn test_replace_unknown_payment_fails() {
        let mut bill = sample_bill(dec!(500));
        assert!(!bill.replace_payment(payment(dec!(100), bill.bill_date)));
    }

    #[test]
    fn test_payments_sorted_by_date_descending() {
        let mut bill = sample_bill(dec!(1000));
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        bill.insert_payment(payment(dec!(100), d(5)));
        bill.insert_payment(payment(dec!(200), d(12)));
        bill.insert_payment(payment(dec!(300), d(8)));

        let sorted = bill.payments_sorted();
        let dates: Vec<NaiveDate> = sorted.iter().map(|p| p.payment_date).collect();
        assert_eq!(dates, vec![d(12), d(8), d(5)]);
    }

    #[test]
    fn test_set_item_status_stamps_change_date() {
        let mut bill = sample_bill(dec!(1000));
        let created = Utc::now();
        let item = BillItem {
            id: BillItemId::new(),
            description: "Kurta stitching".to_string(),
            quantity: 2,
            unit_price: dec!(500),
            delivery_status: DeliveryStatus::Pending,
            status_change_date: created,
        };
        let item_id = item.id;
        bill.items.push(item);

        let changed_at = Utc::now();
        let previous = bill
            .set_item_status(item_id, DeliveryStatus::InProgress, changed_at)
            .unwrap();
        assert_eq!(previous, DeliveryStatus::Pending);

        let item = bill.item(item_id).unwrap();
        assert_eq!(item.delivery_status, DeliveryStatus::InProgress);
        assert_eq!(item.status_change_date, changed_at);
    }

    #[test]
    fn test_set_status_on_unknown_item_fails() {
        let mut bill = sample_bill(dec!(1000));
        assert!(
            bill.set_item_status(BillItemId::new(), DeliveryStatus::Delivered, Utc::now())
                .is_none()
        );
    }

    #[test]
    fn test_line_total() {
        let item = BillItem {
            id: BillItemId::new(),
            description: "Blouse".to_string(),
            quantity: 3,
            unit_price: dec!(250.50),
            delivery_status: DeliveryStatus::Pending,
            status_change_date: Utc::now(),
        };
        assert_eq!(item.line_total(), dec!(751.50));
    }

    #[test]
    fn test_payment_method_roundtrip() {
        use std::str::FromStr;
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Upi,
            PaymentMethod::BankTransfer,
            PaymentMethod::Other,
        ] {
            assert_eq!(PaymentMethod::from_str(method.as_str()).unwrap(), method);
        }
        assert!(PaymentMethod::from_str("cheque").is_err());
    }
}
