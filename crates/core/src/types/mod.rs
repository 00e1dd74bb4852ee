//! Core types for Atelier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod features;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use features::{Features, FeaturesError, ImageUrls, JsonStringList};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::*;
