//! Validation rules for catalog records.
//!
//! Follows the same field-keyed shape as payment validation: collect every
//! offending field, never stop at the first.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{Customer, ServiceOffering};

/// The field a catalog validation message applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatalogField {
    /// A customer's or offering's name.
    Name,
    /// A customer's phone number.
    Phone,
    /// An offering's default price.
    DefaultPrice,
    /// A measurement profile's garment type.
    GarmentType,
}

impl CatalogField {
    /// Returns the field name used in message keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::DefaultPrice => "default_price",
            Self::GarmentType => "garment_type",
        }
    }
}

/// Field-keyed catalog validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogErrors {
    errors: BTreeMap<CatalogField, String>,
}

impl CatalogErrors {
    fn push(&mut self, field: CatalogField, message_key: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message_key.into());
    }

    /// Returns the message key for a field, if any.
    #[must_use]
    pub fn message(&self, field: CatalogField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for CatalogErrors {
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

impl std::error::Error for CatalogErrors {}

/// Validates a customer record: name and phone are required, and no two
/// measurement profiles may share a garment type.
///
/// # Errors
///
/// Returns every offending field.
pub fn validate_customer(customer: &Customer) -> Result<(), CatalogErrors> {
    let mut errors = CatalogErrors::default();

    if customer.name.trim().is_empty() {
        errors.push(CatalogField::Name, "customer.name.required");
    }
    if customer.phone.trim().is_empty() {
        errors.push(CatalogField::Phone, "customer.phone.required");
    }

    let mut seen: Vec<&str> = Vec::new();
    for profile in &customer.measurements {
        if profile.garment_type.trim().is_empty() {
            errors.push(CatalogField::GarmentType, "measurement.garment_type.required");
        } else if seen.contains(&profile.garment_type.as_str()) {
            errors.push(CatalogField::GarmentType, "measurement.garment_type.duplicate");
        } else {
            seen.push(&profile.garment_type);
        }
    }

    errors.into_result()
}

/// Validates a service offering: name is required and the default price
/// must not be negative.
///
/// # Errors
///
/// Returns every offending field.
pub fn validate_offering(offering: &ServiceOffering) -> Result<(), CatalogErrors> {
    let mut errors = CatalogErrors::default();

    if offering.name.trim().is_empty() {
        errors.push(CatalogField::Name, "service.name.required");
    }
    if offering.default_price < Decimal::ZERO {
        errors.push(CatalogField::DefaultPrice, "service.default_price.negative");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::MeasurementProfile;
    use darzi_shared::types::{CustomerId, ServiceId};
    use rust_decimal_macros::dec;

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new(),
            name: "Arjun Mehta".to_string(),
            phone: "9820011223".to_string(),
            address: None,
            comments: String::new(),
            customer_number: None,
            measurements: Vec::new(),
        }
    }

    fn profile(garment_type: &str) -> MeasurementProfile {
        MeasurementProfile {
            garment_type: garment_type.to_string(),
            fields: Vec::new(),
            notes: String::new(),
            last_measured: None,
        }
    }

    #[test]
    fn test_valid_customer() {
        assert!(validate_customer(&customer()).is_ok());
    }

    #[test]
    fn test_name_and_phone_required() {
        let mut customer = customer();
        customer.name = "  ".to_string();
        customer.phone = String::new();
        let err = validate_customer(&customer).unwrap_err();
        assert_eq!(err.message(CatalogField::Name), Some("customer.name.required"));
        assert_eq!(
            err.message(CatalogField::Phone),
            Some("customer.phone.required")
        );
    }

    #[test]
    fn test_duplicate_garment_types_rejected() {
        let mut customer = customer();
        customer.measurements = vec![profile("kurta"), profile("blouse"), profile("kurta")];
        let err = validate_customer(&customer).unwrap_err();
        assert_eq!(
            err.message(CatalogField::GarmentType),
            Some("measurement.garment_type.duplicate")
        );
    }

    #[test]
    fn test_offering_rules() {
        let mut offering = ServiceOffering {
            id: ServiceId::new(),
            name: "Blouse stitching".to_string(),
            description: None,
            default_price: dec!(450),
        };
        assert!(validate_offering(&offering).is_ok());

        offering.name = String::new();
        offering.default_price = dec!(-1);
        let err = validate_offering(&offering).unwrap_err();
        assert_eq!(err.message(CatalogField::Name), Some("service.name.required"));
        assert_eq!(
            err.message(CatalogField::DefaultPrice),
            Some("service.default_price.negative")
        );
    }
}
