//! Wire models for the marketplace backend.
//!
//! Read models (`Product`, `Order`, ...) mirror what the backend returns.
//! Input models (`NewOrder`, `ProductUpdate`, ...) mirror what it accepts and
//! carry a `validate()` that the client runs before sending.

pub mod auth;
pub mod content;
pub mod custom_request;
pub mod order;
pub mod product;
pub mod upload;

pub use auth::{AdminProfile, HealthStatus, TokenResponse};
pub use content::{ContentType, NewPageContent, PageContent, PageContentUpdate};
pub use custom_request::{CustomRequest, CustomRequestUpdate, NewCustomRequest};
pub use order::{CustomerContact, NewOrder, Order, OrderUpdate};
pub use product::{NewProduct, Product, ProductQuery, ProductUpdate};
pub use upload::{MessageResponse, UploadedFile};
