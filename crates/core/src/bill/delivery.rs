//! Aggregate delivery-status derivation.

use super::types::{BillItem, DeliveryStatus};

/// Derives the bill-level delivery status from its items.
///
/// Cancelled items are excluded from the calculation. Precedence, first
/// match wins:
///
/// 1. No active items → `Cancelled`
/// 2. Every active item delivered → `Delivered`
/// 3. Some item ready and none pending or in progress → `ReadyForDelivery`
/// 4. Some item in progress → `InProgress`
/// 5. Otherwise → `Pending`
///
/// `Delivered` requires unanimity among active items, while a single
/// in-progress item is enough to block `ReadyForDelivery`: one lagging item
/// holds the whole bill back.
#[must_use]
pub fn resolve_delivery_status(items: &[BillItem]) -> DeliveryStatus {
    let mut active = 0usize;
    let mut delivered = 0usize;
    let mut ready = 0usize;
    let mut in_progress = 0usize;
    let mut pending = 0usize;

    for item in items {
        match item.delivery_status {
            DeliveryStatus::Cancelled => {}
            DeliveryStatus::Delivered => {
                active += 1;
                delivered += 1;
            }
            DeliveryStatus::ReadyForDelivery => {
                active += 1;
                ready += 1;
            }
            DeliveryStatus::InProgress => {
                active += 1;
                in_progress += 1;
            }
            DeliveryStatus::Pending => {
                active += 1;
                pending += 1;
            }
        }
    }

    if active == 0 {
        DeliveryStatus::Cancelled
    } else if delivered == active {
        DeliveryStatus::Delivered
    } else if ready > 0 && pending == 0 && in_progress == 0 {
        DeliveryStatus::ReadyForDelivery
    } else if in_progress > 0 {
        DeliveryStatus::InProgress
    } else {
        DeliveryStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darzi_shared::types::BillItemId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn items(statuses: &[DeliveryStatus]) -> Vec<BillItem> {
        statuses
            .iter()
            .map(|status| BillItem {
                id: BillItemId::new(),
                description: "Alteration".to_string(),
                quantity: 1,
                unit_price: dec!(100),
                delivery_status: *status,
                status_change_date: Utc::now(),
            })
            .collect()
    }

    use DeliveryStatus::{Cancelled, Delivered, InProgress, Pending, ReadyForDelivery};

    #[rstest]
    // No items, or only cancelled items.
    #[case(&[], Cancelled)]
    #[case(&[Cancelled], Cancelled)]
    #[case(&[Cancelled, Cancelled], Cancelled)]
    // Unanimous delivery; cancelled items excluded from the unanimity check.
    #[case(&[Delivered], Delivered)]
    #[case(&[Delivered, Delivered, Cancelled], Delivered)]
    // A ready item lagging behind blocks Delivered but not ReadyForDelivery.
    #[case(&[Delivered, ReadyForDelivery], ReadyForDelivery)]
    #[case(&[ReadyForDelivery, ReadyForDelivery], ReadyForDelivery)]
    #[case(&[ReadyForDelivery, Cancelled], ReadyForDelivery)]
    // Any pending or in-progress item blocks ReadyForDelivery.
    #[case(&[ReadyForDelivery, InProgress], InProgress)]
    #[case(&[ReadyForDelivery, Pending], Pending)]
    #[case(&[Delivered, InProgress], InProgress)]
    #[case(&[Delivered, Pending], Pending)]
    // In progress beats pending.
    #[case(&[InProgress, Pending], InProgress)]
    #[case(&[InProgress], InProgress)]
    // All quiet.
    #[case(&[Pending], Pending)]
    #[case(&[Pending, Pending, Cancelled], Pending)]
    fn test_delivery_precedence(
        #[case] statuses: &[DeliveryStatus],
        #[case] expected: DeliveryStatus,
    ) {
        assert_eq!(resolve_delivery_status(&items(statuses)), expected);
    }

    #[test]
    fn test_single_lagging_item_blocks_delivered() {
        let mut list = items(&[Delivered; 10]);
        list.push(items(&[ReadyForDelivery]).pop().unwrap());
        assert_eq!(resolve_delivery_status(&list), ReadyForDelivery);
    }
}
