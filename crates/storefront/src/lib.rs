//! Hawk Leather Storefront client library.
//!
//! This crate holds the storefront client as a library: the REST API client,
//! the persisted session, and the cart, checkout, catalog, order and review
//! state, so every front end (and the tests) drive the same logic.
//!
//! Start with [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;

pub use state::Storefront;
