//! HTTP client for the remote billing service.
//!
//! [`HttpBillService`] implements the core [`darzi_core::mutation::BillService`]
//! contract over the shop's REST API, plus the read paths the app lists
//! from (bills, customers, service offerings, measurement templates).

pub mod dto;
mod http;

pub use http::HttpBillService;
