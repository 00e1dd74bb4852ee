//! Atelier Core - Shared domain types.
//!
//! This crate provides the types shared by every Atelier component:
//! - `client` - Session, API access, and admin workflows
//! - `cli` - Terminal front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types, status machines, and input validation.
//! No I/O, no HTTP clients. Everything here can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, features, and statuses
//! - [`models`] - Wire representations of products, orders, requests, and content
//! - [`validation`] - Pre-flight checks applied before a request leaves the client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::ValidationError;
