//! Core business logic for Darzi.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, derivation rules, and the optimistic
//! mutation coordination live here.
//!
//! # Modules
//!
//! - `bill` - Bill aggregate, payment ledger, and delivery-status derivation
//! - `mutation` - Optimistic mutation coordination against the remote store
//! - `catalog` - Service offerings and measurement profiles

pub mod bill;
pub mod catalog;
pub mod mutation;
