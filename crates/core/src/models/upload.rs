//! Upload responses.

use serde::{Deserialize, Serialize};

/// A file stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Name the backend stored the file under; pass it to delete.
    pub filename: String,
    /// Resource URL, relative to the backend base URL.
    pub url: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Plain acknowledgement body, e.g. `{"message": "File deleted successfully"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
