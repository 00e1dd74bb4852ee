//! Order operations.
//!
//! Customers create orders anonymously; listing, reading, and updating
//! require an admin credential.

use atelier_core::{NewOrder, Order, OrderId, OrderUpdate};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, &["api", "orders"]).await;
        Self::send(request).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["api", "orders", &id]).await;
        Self::send(request).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without contacting the backend if the
    /// order fails validation, e.g. a customization order without details.
    #[instrument(skip(self, order), fields(order_type = %order.order_type))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        order.validate()?;
        let request = self.request(Method::POST, &["api", "orders"]).await;
        Self::send(request.json(order)).await
    }

    /// Update an order. The backend decides whether a status change is
    /// allowed; see [`crate::OrderWorkflow`] for the admin-facing rules.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self, update), fields(order_id = %id))]
    pub async fn update_order(&self, id: OrderId, update: &OrderUpdate) -> Result<Order, ApiError> {
        let id = id.to_string();
        let request = self.request(Method::PUT, &["api", "orders", &id]).await;
        Self::send(request.json(update)).await
    }
}
