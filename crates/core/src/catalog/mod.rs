//! Catalog domain: customers with their measurement profiles, service
//! offerings, and per-garment measurement templates.

pub mod types;
pub mod validation;

pub use types::{
    Customer, MeasurementField, MeasurementProfile, MeasurementTemplate, ServiceOffering,
};
pub use validation::{validate_customer, validate_offering, CatalogErrors, CatalogField};
