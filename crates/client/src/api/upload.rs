//! File uploads.
//!
//! One multipart request per file, no chunking or resumption.

use atelier_core::{MessageResponse, UploadedFile, ValidationError};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

/// Multipart field the backend reads the file from.
const FILE_FIELD: &str = "file";

impl ApiClient {
    /// Upload `bytes` as a file named `file_name`.
    ///
    /// Returns the stored file's name and backend-relative URL; use
    /// [`ApiClient::resolve`] to make the URL absolute.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for a blank file name, `ApiError::Rejected`
    /// if the backend refuses the file (e.g. too large).
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile, ApiError> {
        if file_name.trim().is_empty() {
            return Err(ValidationError::MissingField("file name").into());
        }
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new().part(FILE_FIELD, part);
        let request = self.request(Method::POST, &["api", "upload"]).await;
        Self::send(request.multipart(form)).await
    }

    /// Delete a previously uploaded file by its stored name.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such file exists.
    #[instrument(skip(self))]
    pub async fn delete_upload(&self, file_name: &str) -> Result<MessageResponse, ApiError> {
        let request = self
            .request(Method::DELETE, &["api", "upload", file_name])
            .await;
        Self::send(request).await
    }
}
