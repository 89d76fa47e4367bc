//! Error types for mjml-mailer.

use thiserror::Error;

/// Errors that can occur when rendering MJML.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// The configured renderer id is not registered.
    #[error("MJML renderer not found: {0}")]
    RendererNotFound(String),

    /// Configuration error (invalid env var value, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend rejected the markup or answered with a failure.
    #[error("Renderer error ({renderer}): {message}")]
    Backend {
        renderer: &'static str,
        message: String,
        /// Optional HTTP status code or process exit code
        status: Option<u16>,
    },

    /// The renderer process could not be spawned or talked to.
    #[error("Process error: {0}")]
    Process(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(String),
}

impl RenderError {
    /// Create a backend error.
    pub fn backend(renderer: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            renderer,
            message: message.into(),
            status: None,
        }
    }

    /// Create a backend error with a status code.
    pub fn backend_with_status(
        renderer: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::Backend {
            renderer,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Whether this error comes from a registry miss rather than a backend.
    pub fn is_renderer_not_found(&self) -> bool {
        matches!(self, Self::RendererNotFound(_))
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RendererNotFound(_) => "renderer_not_found",
            Self::Configuration(_) => "configuration",
            Self::Backend { .. } => "render",
            Self::Process(_) => "process",
            Self::HttpError(_) => "http",
            Self::JsonError(_) => "json",
            Self::TemplateError(_) => "template",
        }
    }

    /// Name of the renderer that produced the error, if known.
    pub fn renderer(&self) -> Option<&'static str> {
        match self {
            Self::Backend { renderer, .. } => Some(*renderer),
            _ => None,
        }
    }
}

#[cfg(feature = "_http")]
impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Process(err.to_string())
    }
}
