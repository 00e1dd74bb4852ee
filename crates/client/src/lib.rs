//! Atelier Client - Session, API access, and admin workflows.
//!
//! # Architecture
//!
//! - [`SessionStore`] holds the bearer credential and persists it through a
//!   [`CredentialSlot`].
//! - [`ApiClient`] is the only HTTP boundary. It attaches the credential to
//!   every request when one is present.
//! - [`OrderWorkflow`] and [`CustomRequestWorkflow`] drive status transitions
//!   and reload their collection after every change.
//! - [`AdminGate`] decides whether an admin view may be entered and handles
//!   login and logout.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::open(FileSlot::new(&config.session_file))?;
//! let api = ApiClient::new(&config, session)?;
//!
//! match AdminGate::new(api.clone()).check().await {
//!     GateDecision::Allow(admin) => {
//!         let orders = OrderWorkflow::new(api);
//!         orders.refresh().await?;
//!     }
//!     GateDecision::RedirectToLogin => { /* show login */ }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod session;
pub mod workflow;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use gate::{AdminGate, GateDecision, LoginError};
pub use session::{CredentialSlot, FileSlot, MemorySlot, SessionError, SessionStore};
pub use workflow::{CustomRequestWorkflow, OrderWorkflow};
