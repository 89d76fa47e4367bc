//! # mjml-mailer
//!
//! Render MJML mail bodies to HTML right before delivery.
//!
//! ## Quick Start
//!
//! Tag the message body as MJML:
//! ```rust,ignore
//! use mjml_mailer::{formatter_from_env, MailFormatter, OutgoingMessage, CONTENT_TYPE_MJML};
//!
//! let formatter = formatter_from_env()?;
//!
//! let message = OutgoingMessage::new()
//!     .to("user@example.com")
//!     .subject("Welcome!")
//!     .content_type(CONTENT_TYPE_MJML)
//!     .body("<mjml><mj-body><mj-text>Hello</mj-text></mj-body></mjml>");
//!
//! let message = formatter.format(message).await;
//! // Content-Type: text/html, body is the rendered page
//! ```
//!
//! ## Content Types
//!
//! | Content-Type | Handling |
//! |--------------|----------|
//! | `text/mjml` | rendered with the default renderer |
//! | `text/mjml+twig` | already rendered upstream, relabeled as `text/html` |
//! | anything else | plain-text formatter |
//!
//! A message whose MJML cannot be rendered is logged and sent through the
//! plain-text formatter instead of being dropped.
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `MJML_DEFAULT_RENDERER` | `binary` (default) or `api` |
//! | `MJML_BINARY_PATH` | `mjml` executable (default: `mjml` from `PATH`) |
//! | `MJML_BINARY_MINIFY` | Minify binary renderer output (default: `false`) |
//! | `MJML_API_APPLICATION_ID` | mjml.io application id |
//! | `MJML_API_SECRET_KEY` | mjml.io secret key |
//!
//! Environment values are the deployment layer and override module
//! parameters passed to [`formatter_from_layers`].
//!
//! ## Feature Flags
//!
//! - `binary` (default) - renderer backed by the `mjml` executable
//! - `api` - renderer backed by the mjml.io API
//! - `templates` - build MJML messages from Askama templates
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//! - `full` - everything above
//!
//! ## Metrics
//!
//! Enable `features = ["metrics"]` to emit:
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `mjml_render_total` | Counter | renderer, status | Render attempts |
//! | `mjml_render_duration_seconds` | Histogram | renderer | Render duration |
//! | `mjml_fallback_total` | Counter | kind | Messages sent unrendered |

/// The version of the mjml-mailer crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod error;
mod message;
mod registry;
mod renderer;
mod selector;

pub mod formatter;
pub mod renderers;

#[cfg(feature = "templates")]
mod template;
#[cfg(feature = "templates")]
pub use template::MjmlTemplate;

// Re-exports
pub use config::{
    ApiClientOptions, ApiSection, BinaryOptions, BinarySection, MjmlSettings, RendererConfig,
    RendererSection, API_RENDERER_ID, BINARY_RENDERER_ID, DEFAULT_BINARY_PATH,
};
pub use error::RenderError;
pub use formatter::{MailFormatter, MjmlFormatter, PlainTextFormatter, CONTENT_TYPE_PLAIN};
pub use message::{
    Body, ContentKind, OutgoingMessage, CONTENT_TYPE_HTML, CONTENT_TYPE_MJML,
    CONTENT_TYPE_MJML_TWIG,
};
pub use registry::RendererRegistry;
pub use renderer::Renderer;
pub use selector::DefaultRenderer;

/// Build a formatter from `MJML_*` environment variables.
///
/// ```rust,ignore
/// let formatter = mjml_mailer::formatter_from_env()?;
/// ```
pub fn formatter_from_env() -> Result<MjmlFormatter, RenderError> {
    formatter_from_layers(MjmlSettings::default())
}

/// Build a formatter from module `parameters`, overridden by `MJML_*`
/// environment variables.
pub fn formatter_from_layers(parameters: MjmlSettings) -> Result<MjmlFormatter, RenderError> {
    let config = RendererConfig::new(MjmlSettings::from_env()?, parameters);
    tracing::debug!(
        default_renderer = config.default_renderer(),
        "Configuring MJML formatter"
    );
    Ok(MjmlFormatter::from_config(config))
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Body;
    pub use crate::DefaultRenderer;
    pub use crate::MailFormatter;
    pub use crate::MjmlFormatter;
    pub use crate::OutgoingMessage;
    pub use crate::RenderError;
    pub use crate::Renderer;
    pub use crate::RendererRegistry;
    pub use crate::{formatter_from_env, formatter_from_layers};
    pub use crate::{CONTENT_TYPE_HTML, CONTENT_TYPE_MJML, CONTENT_TYPE_MJML_TWIG};
}
