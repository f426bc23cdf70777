//! Wire representations for the billing REST API.
//!
//! The API speaks camelCase JSON. Derived bill fields (`status`,
//! `deliveryStatus`, `paidAmount`) do appear on the wire, but they are
//! advisory: ingest recomputes them from the payment and item collections,
//! so a stale stored value can never leak into the aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use darzi_core::bill::types::{
    BillAggregate, BillItem, BillLifecycle, BillStatus, DeliveryStatus, Payment, PaymentInput,
    PaymentMethod, ReceivedItem, ReceivedItemStatus,
};
use darzi_core::catalog::{
    Customer, MeasurementField, MeasurementProfile, MeasurementTemplate, ServiceOffering,
};
use darzi_shared::types::{
    BillId, BillItemId, CustomerId, PaymentId, ReceivedItemId, ServiceId,
};

/// A bill as the service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    pub bill_id: BillId,
    pub customer_id: CustomerId,
    pub bill_date: NaiveDate,
    pub total_amount: Decimal,
    /// Stored overall status; only the lifecycle overrides (`draft`,
    /// `cancelled`) are honored on ingest.
    #[serde(default)]
    pub status: Option<BillStatus>,
    #[serde(default)]
    pub delivery_status: Option<DeliveryStatus>,
    #[serde(default)]
    pub payments: Vec<PaymentDto>,
    #[serde(default)]
    pub items: Vec<BillItemDto>,
    #[serde(default)]
    pub received_items: Vec<ReceivedItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub payment_id: PaymentId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payment fields sent when creating or editing a payment. The service
/// assigns IDs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestDto {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemDto {
    pub id: BillItemId,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub delivery_status: DeliveryStatus,
    pub status_change_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedItemDto {
    pub id: ReceivedItemId,
    pub description: String,
    pub quantity: u32,
    pub received_date: NaiveDate,
    pub status: ReceivedItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<NaiveDate>,
}

/// Body of the bill update call: item statuses plus the recomputed
/// aggregate delivery status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPatchDto {
    pub items: Vec<BillItemDto>,
    pub delivery_status: DeliveryStatus,
}

/// Response to a payment creation: the created payment and the
/// authoritative recomputed bill.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentResponseDto {
    pub payment: PaymentDto,
    pub bill: BillDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: CustomerId,
    pub personal_details: PersonalDetailsDto,
    #[serde(default)]
    pub measurements: Vec<MeasurementProfileDto>,
    #[serde(default)]
    pub comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsDto {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementProfileDto {
    pub garment_type: String,
    #[serde(default)]
    pub fields: Vec<MeasurementFieldDto>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_measured_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementFieldDto {
    pub name: String,
    pub value: String,
}

/// Paged customer list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPageDto {
    pub customers: Vec<CustomerDto>,
    #[serde(default)]
    pub last_evaluated_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOfferingDto {
    pub id: ServiceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub default_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTemplateDto {
    pub garment_type: String,
    #[serde(default)]
    pub measurements: Vec<String>,
}

impl BillDto {
    /// Converts into the domain aggregate. Derived wire fields are
    /// discarded except for the lifecycle overrides.
    #[must_use]
    pub fn into_domain(self) -> BillAggregate {
        let lifecycle = match self.status {
            Some(BillStatus::Draft) => BillLifecycle::Draft,
            Some(BillStatus::Cancelled) => BillLifecycle::Cancelled,
            _ => BillLifecycle::Active,
        };
        BillAggregate {
            id: self.bill_id,
            customer_id: self.customer_id,
            bill_date: self.bill_date,
            total_amount: self.total_amount,
            lifecycle,
            payments: self.payments.into_iter().map(PaymentDto::into_domain).collect(),
            items: self.items.into_iter().map(BillItemDto::into_domain).collect(),
            received_items: self
                .received_items
                .into_iter()
                .map(ReceivedItemDto::into_domain)
                .collect(),
        }
    }
}

impl PaymentDto {
    #[must_use]
    pub fn into_domain(self) -> Payment {
        Payment {
            id: self.payment_id,
            amount: self.amount,
            payment_date: self.payment_date,
            method: self.payment_method,
            notes: self.notes,
        }
    }
}

impl From<PaymentInput> for PaymentRequestDto {
    fn from(input: PaymentInput) -> Self {
        Self {
            amount: input.amount,
            payment_date: input.payment_date,
            payment_method: input.method,
            notes: input.notes,
        }
    }
}

impl BillItemDto {
    #[must_use]
    pub fn into_domain(self) -> BillItem {
        BillItem {
            id: self.id,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            delivery_status: self.delivery_status,
            status_change_date: self.status_change_date,
        }
    }
}

impl From<&BillItem> for BillItemDto {
    fn from(item: &BillItem) -> Self {
        Self {
            id: item.id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            delivery_status: item.delivery_status,
            status_change_date: item.status_change_date,
        }
    }
}

impl ReceivedItemDto {
    #[must_use]
    pub fn into_domain(self) -> ReceivedItem {
        ReceivedItem {
            id: self.id,
            description: self.description,
            quantity: self.quantity,
            received_date: self.received_date,
            status: self.status,
            returned_date: self.returned_date,
        }
    }
}

impl CustomerDto {
    #[must_use]
    pub fn into_domain(self) -> Customer {
        Customer {
            id: self.id,
            name: self.personal_details.name,
            phone: self.personal_details.phone,
            address: self.personal_details.address,
            comments: self.comments,
            customer_number: self.customer_number,
            measurements: self
                .measurements
                .into_iter()
                .map(MeasurementProfileDto::into_domain)
                .collect(),
        }
    }
}

impl MeasurementProfileDto {
    #[must_use]
    pub fn into_domain(self) -> MeasurementProfile {
        MeasurementProfile {
            garment_type: self.garment_type,
            fields: self
                .fields
                .into_iter()
                .map(|field| MeasurementField {
                    name: field.name,
                    value: field.value,
                })
                .collect(),
            notes: self.notes,
            last_measured: self.last_measured_date,
        }
    }
}

impl ServiceOfferingDto {
    #[must_use]
    pub fn into_domain(self) -> ServiceOffering {
        ServiceOffering {
            id: self.id,
            name: self.name,
            description: self.description,
            default_price: self.default_price,
        }
    }
}

impl MeasurementTemplateDto {
    #[must_use]
    pub fn into_domain(self) -> MeasurementTemplate {
        MeasurementTemplate {
            garment_type: self.garment_type,
            fields: self.measurements,
        }
    }
}
