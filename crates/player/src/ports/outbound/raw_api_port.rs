//! Raw API Port - Object-safe HTTP boundary
//!
//! Works in `serde_json::Value` so it can live behind `Arc<dyn RawApiPort>`.
//! The application layer wraps it in the typed `TheatreApi`.

use serde_json::Value;

use super::ApiError;

/// Multipart upload: one `file` part plus plain text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait::async_trait]
pub trait RawApiPort: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn post_multipart(&self, path: &str, form: UploadForm) -> Result<Value, ApiError>;

    /// POST a JSON body and return the raw response bytes (file downloads).
    async fn post_for_bytes(&self, path: &str, body: &Value) -> Result<Vec<u8>, ApiError>;
}
