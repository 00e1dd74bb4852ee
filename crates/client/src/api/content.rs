//! Page content operations, addressed by page key.

use atelier_core::{NewPageContent, PageContent, PageContentUpdate};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List every content block.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_content(&self) -> Result<Vec<PageContent>, ApiError> {
        let request = self.request(Method::GET, &["api", "content"]).await;
        Self::send(request).await
    }

    /// Fetch the block stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown key.
    #[instrument(skip(self))]
    pub async fn get_content(&self, key: &str) -> Result<PageContent, ApiError> {
        let request = self.request(Method::GET, &["api", "content", key]).await;
        Self::send(request).await
    }

    /// Create a block.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without contacting the backend for a blank
    /// key, `ApiError::Rejected` if the key already exists.
    #[instrument(skip(self, body), fields(page_key = %body.page_key))]
    pub async fn create_content(&self, body: &NewPageContent) -> Result<PageContent, ApiError> {
        body.validate()?;
        let request = self.request(Method::POST, &["api", "content"]).await;
        Self::send(request.json(body)).await
    }

    /// Replace the text of the block stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown key.
    #[instrument(skip(self, update))]
    pub async fn update_content(
        &self,
        key: &str,
        update: &PageContentUpdate,
    ) -> Result<PageContent, ApiError> {
        let request = self.request(Method::PUT, &["api", "content", key]).await;
        Self::send(request.json(update)).await
    }
}
