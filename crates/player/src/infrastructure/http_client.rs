//! reqwest adapter for the theatre backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::ports::outbound::{ApiError, RawApiPort, UploadForm};

/// HTTP implementation of [`RawApiPort`]. One request per call; no retries.
#[derive(Clone)]
pub struct ApiAdapter {
    client: Client,
    base_url: String,
}

/// Default backend address (the Flask dev server).
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

impl ApiAdapter {
    /// Fails only if the TLS backend or resolver cannot be initialised.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.api_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(path, error = %e, "Request did not reach the backend");
            ApiError::RequestFailed(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(path, status = status.as_u16(), "Backend returned error status");
            return Err(ApiError::http_status(status.as_u16(), body));
        }

        Ok(response)
    }

    async fn read_json(path: &str, response: Response) -> Result<Value, ApiError> {
        response.json::<Value>().await.map_err(|e| {
            tracing::debug!(path, error = %e, "Response body was not JSON");
            ApiError::ParseError(e.to_string())
        })
    }
}

#[async_trait]
impl RawApiPort for ApiAdapter {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.send(path, self.client.get(self.url(path))).await?;
        Self::read_json(path, response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        tracing::debug!(path, "POST");
        let response = self
            .send(path, self.client.post(self.url(path)).json(body))
            .await?;
        Self::read_json(path, response).await
    }

    async fn post_multipart(&self, path: &str, form: UploadForm) -> Result<Value, ApiError> {
        tracing::debug!(path, file = %form.file_name, "POST multipart");
        let file_part = multipart::Part::bytes(form.bytes).file_name(form.file_name);
        let mut multipart = multipart::Form::new().part("file", file_part);
        for (name, value) in form.fields {
            multipart = multipart.text(name, value);
        }

        let response = self
            .send(path, self.client.post(self.url(path)).multipart(multipart))
            .await?;
        Self::read_json(path, response).await
    }

    async fn post_for_bytes(&self, path: &str, body: &Value) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(path, "POST (download)");
        let response = self
            .send(path, self.client.post(self.url(path)).json(body))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
