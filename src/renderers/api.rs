//! mjml.io API renderer.
//!
//! # Example
//!
//! ```rust,ignore
//! use mjml_mailer::renderers::ApiRenderer;
//!
//! let renderer = ApiRenderer::new("application-id", "secret-key");
//! let html = renderer.render("<mjml><mj-body></mj-body></mjml>").await?;
//! ```
//!
//! Requests go to `POST {base_url}/render` with HTTP basic auth built from
//! the application id and secret key.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RenderError;
use crate::renderer::Renderer;

const MJML_API_URL: &str = "https://api.mjml.io/v1";

/// Renders MJML through the mjml.io API.
pub struct ApiRenderer {
    application_id: String,
    secret_key: String,
    client: Client,
    base_url: String,
}

impl ApiRenderer {
    /// Create a new API renderer with the given credentials.
    pub fn new(application_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            secret_key: secret_key.into(),
            client: Client::new(),
            base_url: MJML_API_URL.to_string(),
        }
    }

    /// Create with a custom reqwest client.
    pub fn with_client(
        application_id: impl Into<String>,
        secret_key: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            secret_key: secret_key.into(),
            client,
            base_url: MJML_API_URL.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.application_id, self.secret_key);
        format!("Basic {}", BASE64.encode(credentials.as_bytes()))
    }
}

#[async_trait]
impl Renderer for ApiRenderer {
    async fn render(&self, mjml: &str) -> Result<String, RenderError> {
        let url = format!("{}/render", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .header("User-Agent", format!("mjml-mailer/{}", crate::VERSION))
            .json(&RenderRequest { mjml })
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let result: RenderResponse = response.json().await?;
            if !result.errors.is_empty() {
                tracing::warn!(
                    count = result.errors.len(),
                    errors = ?result.errors,
                    mjml_version = ?result.mjml_version,
                    "mjml.io reported validation errors"
                );
            }
            Ok(result.html)
        } else {
            let error: ApiError = response.json().await.unwrap_or(ApiError {
                message: "Unknown error".to_string(),
                request_id: None,
            });
            tracing::debug!(
                status = status.as_u16(),
                request_id = ?error.request_id,
                "mjml.io request failed"
            );
            Err(RenderError::backend_with_status(
                "api",
                error.message,
                status.as_u16(),
            ))
        }
    }

    fn renderer_name(&self) -> &'static str {
        "api"
    }
}

// ============================================================================
// mjml.io API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    mjml: &'a str,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    html: String,
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    mjml_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    request_id: Option<String>,
}
