//! Validation rules for payment and item mutations.
//!
//! All failures are local: nothing here touches the network, and a failed
//! validation always produces a structured, field-keyed error value rather
//! than a panic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger::resolve_ledger;
use super::types::{BillAggregate, PaymentInput, ReceivedItem, ReceivedItemStatus};
use darzi_shared::types::PaymentId;

/// Maximum length of a payment note.
pub const MAX_NOTES_LEN: usize = 500;

/// The field a validation message applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaymentField {
    /// The payment amount.
    Amount,
    /// The payment date.
    PaymentDate,
    /// The payment method.
    Method,
    /// The free-form note.
    Notes,
    /// The returned date of a received item.
    ReturnedDate,
}

impl PaymentField {
    /// Returns the field name used in message keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::PaymentDate => "payment_date",
            Self::Method => "method",
            Self::Notes => "notes",
            Self::ReturnedDate => "returned_date",
        }
    }
}

/// Structured validation failure: an ordered map of offending field to
/// message key. The presentation layer resolves keys to localized text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<PaymentField, String>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message key for a field. The first message per field wins.
    pub fn push(&mut self, field: PaymentField, message_key: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message_key.into());
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the message key for a field, if any.
    #[must_use]
    pub fn message(&self, field: PaymentField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Iterates over (field, message key) pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (PaymentField, &str)> {
        self.errors.iter().map(|(field, key)| (*field, key.as_str()))
    }

    /// Converts to `Err(self)` when non-empty.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, key) in &self.errors {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {key}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Computes the outstanding amount the payment list would leave, excluding
/// one payment (the one being edited), if any.
#[must_use]
pub fn outstanding_excluding(bill: &BillAggregate, exclude: Option<PaymentId>) -> Decimal {
    match exclude {
        None => bill.outstanding_amount(),
        Some(id) => {
            let remaining: Vec<_> = bill
                .payments
                .iter()
                .filter(|p| p.id != id)
                .cloned()
                .collect();
            resolve_ledger(bill.total_amount, &remaining).outstanding_amount
        }
    }
}

/// Validates a payment add/edit request.
///
/// Rules:
/// - amount must be positive
/// - amount must not exceed the outstanding amount (computed without the
///   payment being edited, when editing)
/// - payment date must not be after `today` (end of day inclusive)
/// - notes, when present, must not exceed [`MAX_NOTES_LEN`]
///
/// # Errors
///
/// Returns the full set of offending fields; validation does not stop at
/// the first failure.
pub fn validate_payment(
    input: &PaymentInput,
    outstanding: Decimal,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.amount <= Decimal::ZERO {
        errors.push(PaymentField::Amount, "payment.amount.not_positive");
    } else if input.amount > outstanding {
        errors.push(PaymentField::Amount, "payment.amount.exceeds_outstanding");
    }

    if input.payment_date > today {
        errors.push(PaymentField::PaymentDate, "payment.date.in_future");
    }

    if let Some(notes) = &input.notes
        && notes.chars().count() > MAX_NOTES_LEN
    {
        errors.push(PaymentField::Notes, "payment.notes.too_long");
    }

    errors.into_result()
}

/// Validates a received garment entry: `returned_date` must be set iff the
/// status is `Returned`, and never before the received date.
///
/// # Errors
///
/// Returns a field-keyed error when the dates and status disagree.
pub fn validate_received_item(item: &ReceivedItem) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match (item.status, item.returned_date) {
        (ReceivedItemStatus::Returned, None) => {
            errors.push(PaymentField::ReturnedDate, "received_item.returned_date.missing");
        }
        (ReceivedItemStatus::Received, Some(_)) => {
            errors.push(PaymentField::ReturnedDate, "received_item.returned_date.unexpected");
        }
        (ReceivedItemStatus::Returned, Some(returned)) if returned < item.received_date => {
            errors.push(
                PaymentField::ReturnedDate,
                "received_item.returned_date.before_received",
            );
        }
        _ => {}
    }

    errors.into_result()
}
