//! Custom request queue workflow.

use atelier_core::{
    CustomRequest, CustomRequestId, CustomRequestStatus, CustomRequestUpdate, RequestAction,
    ValidationError,
};
use tracing::instrument;

use super::{Board, force_logout_on_auth_failure};
use crate::api::ApiClient;
use crate::error::ApiError;

/// The admin custom request queue.
///
/// Pending requests can be accepted or rejected; accepted ones completed.
#[derive(Debug, Clone)]
pub struct CustomRequestWorkflow {
    api: ApiClient,
    board: Board<CustomRequest>,
}

impl CustomRequestWorkflow {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            board: Board::new(),
        }
    }

    /// Fetch the request collection and display it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the displayed collection is unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<CustomRequest>, ApiError> {
        let ticket = self.board.begin().await;
        let result = self.api.list_custom_requests().await;
        let requests = force_logout_on_auth_failure(self.api.session(), result).await?;
        tracing::debug!(count = requests.len(), "Fetched custom requests");
        self.board.apply(ticket, requests).await;
        Ok(self.board.snapshot().await)
    }

    pub async fn requests(&self) -> Vec<CustomRequest> {
        self.board.snapshot().await
    }

    pub async fn status_of(&self, id: CustomRequestId) -> Option<CustomRequestStatus> {
        self.board
            .find(|r| (r.id == id).then_some(r.status))
            .await
    }

    /// Actions offered for a request. Empty for unknown or terminal ones.
    pub async fn actions_for(&self, id: CustomRequestId) -> &'static [RequestAction] {
        match self.status_of(id).await {
            Some(status) => status.available_actions(),
            None => &[],
        }
    }

    /// Apply an admin action, then reload the collection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` or `ApiError::Transition` without
    /// contacting the backend when the request is not displayed or the
    /// action is not offered. Otherwise returns the update or reload error.
    #[instrument(skip(self), fields(request_id = %id))]
    pub async fn apply(
        &self,
        id: CustomRequestId,
        action: RequestAction,
    ) -> Result<Vec<CustomRequest>, ApiError> {
        let current = self
            .status_of(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Custom request {id} is not loaded")))?;
        let target = current.apply(action)?;
        tracing::info!(from = %current, to = %target, "Transitioning custom request");
        self.send_status(id, target).await
    }

    /// Ask the backend for a status change the workflow does not offer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an unrecognized status without
    /// contacting the backend, otherwise the update or reload error.
    #[instrument(skip(self), fields(request_id = %id))]
    pub async fn request_status(
        &self,
        id: CustomRequestId,
        status: CustomRequestStatus,
    ) -> Result<Vec<CustomRequest>, ApiError> {
        tracing::info!(to = %status, "Requesting custom request status from backend");
        if status == CustomRequestStatus::Unknown {
            return Err(ValidationError::UnknownStatus.into());
        }
        self.send_status(id, status).await
    }

    /// Stop displaying results.
    pub async fn detach(&self) {
        self.board.detach().await;
    }

    async fn send_status(
        &self,
        id: CustomRequestId,
        status: CustomRequestStatus,
    ) -> Result<Vec<CustomRequest>, ApiError> {
        let result = self
            .api
            .update_custom_request(id, CustomRequestUpdate { status })
            .await;
        force_logout_on_auth_failure(self.api.session(), result).await?;
        self.refresh().await
    }
}
