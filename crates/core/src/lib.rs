//! Hawk Leather Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront client components:
//! - `storefront` - API client, session/cart/checkout state
//! - `cli` - Terminal front end
//! - `integration-tests` - Mock-backend tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Price arithmetic, checkout totals and pagination live here so
//! they can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, statuses, emails, addresses, totals, pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
