//! Catalog types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use darzi_shared::types::{CustomerId, ServiceId};

/// A billable service the shop offers (stitching, alteration, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Unique service ID.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Price suggested when the service is added to a bill.
    pub default_price: Decimal,
}

/// One named measurement reading, e.g. ("chest", "40.5").
///
/// Values stay as entered; tailors record fractions and annotations
/// ("40.5", "32 loose") that a numeric type would mangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementField {
    /// Field name, from the garment's template.
    pub name: String,
    /// The recorded value, verbatim.
    pub value: String,
}

/// A customer's saved measurements for one garment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementProfile {
    /// The garment type this profile measures, e.g. "kurta".
    pub garment_type: String,
    /// Recorded fields.
    pub fields: Vec<MeasurementField>,
    /// Free-form notes.
    pub notes: String,
    /// When the customer was last measured for this garment.
    pub last_measured: Option<NaiveDate>,
}

/// The set of measurement field names expected for a garment type.
///
/// Templates are keyed by garment type; a customer profile for the same
/// garment type records values against these names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementTemplate {
    /// The garment type, also the template's identity.
    pub garment_type: String,
    /// Field names, in display order.
    pub fields: Vec<String>,
}

/// A customer record with contact details and measurement profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional address.
    pub address: Option<String>,
    /// Free-form comments.
    pub comments: String,
    /// Human-facing sequential number, when assigned.
    pub customer_number: Option<u32>,
    /// Measurement profiles, at most one per garment type.
    pub measurements: Vec<MeasurementProfile>,
}

impl Customer {
    /// Looks up the measurement profile for a garment type.
    #[must_use]
    pub fn measurement_for(&self, garment_type: &str) -> Option<&MeasurementProfile> {
        self.measurements
            .iter()
            .find(|profile| profile.garment_type == garment_type)
    }

    /// Saves a measurement profile, replacing any existing profile for the
    /// same garment type.
    pub fn upsert_measurement(&mut self, profile: MeasurementProfile) {
        match self
            .measurements
            .iter_mut()
            .find(|existing| existing.garment_type == profile.garment_type)
        {
            Some(slot) => *slot = profile,
            None => self.measurements.push(profile),
        }
    }

    /// Case-insensitive match against name, phone, and address, for list
    /// filtering.
    #[must_use]
    pub fn matches_search(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.phone.to_lowercase().contains(&needle)
            || self
                .address
                .as_ref()
                .is_some_and(|address| address.to_lowercase().contains(&needle))
    }
}
