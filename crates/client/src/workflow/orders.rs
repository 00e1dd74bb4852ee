//! Order queue workflow.

use atelier_core::{Order, OrderAction, OrderId, OrderStatus, OrderUpdate, ValidationError};
use tracing::instrument;

use super::{Board, force_logout_on_auth_failure};
use crate::api::ApiClient;
use crate::error::ApiError;

/// The admin order queue.
///
/// Offers `process` on pending orders and `complete` on processing ones.
/// Cancellation is left to the backend and is not offered.
#[derive(Debug, Clone)]
pub struct OrderWorkflow {
    api: ApiClient,
    board: Board<Order>,
}

impl OrderWorkflow {
    /// An empty queue. Call [`refresh`](Self::refresh) to load it.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            board: Board::new(),
        }
    }

    /// Fetch the order collection and display it.
    ///
    /// Returns the displayed collection, which is unchanged if this result
    /// was superseded or the queue was detached.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the displayed collection is unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<Order>, ApiError> {
        let ticket = self.board.begin().await;
        let result = self.api.list_orders().await;
        let orders = force_logout_on_auth_failure(self.api.session(), result).await?;
        tracing::debug!(count = orders.len(), "Fetched orders");
        self.board.apply(ticket, orders).await;
        Ok(self.board.snapshot().await)
    }

    /// The displayed collection.
    pub async fn orders(&self) -> Vec<Order> {
        self.board.snapshot().await
    }

    /// Displayed status of an order, if it is in the collection.
    pub async fn status_of(&self, id: OrderId) -> Option<OrderStatus> {
        self.board
            .find(|o| (o.id == id).then_some(o.status))
            .await
    }

    /// Actions offered for an order. Empty for unknown or terminal orders.
    pub async fn actions_for(&self, id: OrderId) -> &'static [OrderAction] {
        match self.status_of(id).await {
            Some(status) => status.available_actions(),
            None => &[],
        }
    }

    /// Apply an admin action, then reload the collection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order is not displayed and
    /// `ApiError::Transition` if the action is not offered from its status,
    /// both without contacting the backend. Otherwise returns the update or
    /// reload error. The displayed collection only changes on a successful
    /// reload.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn apply(&self, id: OrderId, action: OrderAction) -> Result<Vec<Order>, ApiError> {
        let current = self
            .status_of(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Order {id} is not loaded")))?;
        let target = current.apply(action)?;
        tracing::info!(from = %current, to = %target, "Transitioning order");
        self.send_status(id, target).await
    }

    /// Ask the backend for a status change the workflow does not offer.
    ///
    /// The backend decides. Nothing is displayed until a reload after the
    /// backend accepts the change.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an unrecognized status without
    /// contacting the backend, otherwise the update or reload error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn request_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, ApiError> {
        tracing::info!(to = %status, "Requesting order status from backend");
        if status == OrderStatus::Unknown {
            return Err(ValidationError::UnknownStatus.into());
        }
        self.send_status(id, status).await
    }

    /// Stop displaying results, e.g. when the view goes away. Calls already
    /// in flight run to completion and their results are dropped.
    pub async fn detach(&self) {
        self.board.detach().await;
    }

    async fn send_status(&self, id: OrderId, status: OrderStatus) -> Result<Vec<Order>, ApiError> {
        let result = self.api.update_order(id, &OrderUpdate::status(status)).await;
        force_logout_on_auth_failure(self.api.session(), result).await?;
        self.refresh().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::ClientConfig;
    use crate::session::SessionStore;

    fn workflow() -> OrderWorkflow {
        // Port 9 (discard): any request that slips through fails as transport.
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        OrderWorkflow::new(ApiClient::new(&config, SessionStore::in_memory()).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_order_offers_nothing() {
        let workflow = workflow();
        assert!(workflow.actions_for(OrderId::new(1)).await.is_empty());
        assert_eq!(workflow.status_of(OrderId::new(1)).await, None);
    }

    #[tokio::test]
    async fn test_apply_on_unloaded_order_is_not_found() {
        let err = workflow()
            .apply(OrderId::new(1), OrderAction::Process)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_status_is_never_requested() {
        let err = workflow()
            .request_status(OrderId::new(1), OrderStatus::Unknown)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Invalid(ValidationError::UnknownStatus)
        ));
    }
}
