//! Optimistic mutation coordination.
//!
//! This module implements the apply-locally / commit-remotely /
//! rollback-on-failure flow for bill mutations:
//! - The per-target mutation state machine
//! - The remote bill service contract
//! - The coordinator orchestrating validation, optimistic apply, commit,
//!   rollback, and transient feedback

pub mod coordinator;
pub mod error;
pub mod feedback;
pub mod service;
pub mod state;

pub use coordinator::{MutationCoordinator, MutationOutcome};
pub use error::MutationError;
pub use feedback::{Feedback, FeedbackConfig, FeedbackKind};
pub use service::{AddPaymentResponse, BillPatch, BillService, CacheScope, ServiceError};
pub use state::{MutationState, MutationTarget};
