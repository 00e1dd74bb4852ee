//! Product catalog operations.
//!
//! Reads are public; writes need an admin credential.

use atelier_core::{MessageResponse, NewProduct, Product, ProductId, ProductQuery, ProductUpdate};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, &["api", "products"]).await;
        Self::send(request.query(query)).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["api", "products", &id]).await;
        Self::send(request).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without contacting the backend if the
    /// product fails validation.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        product.validate()?;
        let request = self.request(Method::POST, &["api", "products"]).await;
        Self::send(request.json(product)).await
    }

    /// Update the set fields of a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without contacting the backend if the
    /// update fails validation, `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        update.validate()?;
        let id = id.to_string();
        let request = self.request(Method::PUT, &["api", "products", &id]).await;
        Self::send(request.json(update)).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<MessageResponse, ApiError> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["api", "products", &id]).await;
        Self::send(request).await
    }
}
