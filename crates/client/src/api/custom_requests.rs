//! Custom project request operations.

use atelier_core::{CustomRequest, CustomRequestId, CustomRequestUpdate, NewCustomRequest};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List all custom requests.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_custom_requests(&self) -> Result<Vec<CustomRequest>, ApiError> {
        let request = self.request(Method::GET, &["api", "custom-requests"]).await;
        Self::send(request).await
    }

    /// Submit a custom project request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without contacting the backend if a
    /// required field is blank.
    #[instrument(skip(self, body), fields(project_title = %body.project_title))]
    pub async fn create_custom_request(
        &self,
        body: &NewCustomRequest,
    ) -> Result<CustomRequest, ApiError> {
        body.validate()?;
        let request = self.request(Method::POST, &["api", "custom-requests"]).await;
        Self::send(request.json(body)).await
    }

    /// Update a custom request's status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(request_id = %id))]
    pub async fn update_custom_request(
        &self,
        id: CustomRequestId,
        update: CustomRequestUpdate,
    ) -> Result<CustomRequest, ApiError> {
        let id = id.to_string();
        let request = self
            .request(Method::PUT, &["api", "custom-requests", &id])
            .await;
        Self::send(request.json(&update)).await
    }
}
