//! Renderer trait.
//!
//! # Why `async_trait`?
//!
//! Renderers are stored as `Arc<dyn Renderer>` in the
//! [`RendererRegistry`](crate::RendererRegistry) and picked by id at call
//! time, so the trait must be object-safe. Native async traits are not, so
//! `#[async_trait]` boxes the future. Rendering spawns a process or makes an
//! HTTP round trip; the allocation is noise next to that.

use async_trait::async_trait;

use crate::error::RenderError;

/// Converts MJML markup into HTML.
///
/// Implementations must not keep state between calls: the same markup
/// rendered twice goes through the backend twice.
///
/// # Example
///
/// ```rust,ignore
/// use mjml_mailer::{RenderError, Renderer};
///
/// struct Upper;
///
/// #[async_trait::async_trait]
/// impl Renderer for Upper {
///     async fn render(&self, mjml: &str) -> Result<String, RenderError> {
///         Ok(mjml.to_uppercase())
///     }
/// }
/// ```
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render a complete MJML document to HTML.
    async fn render(&self, mjml: &str) -> Result<String, RenderError>;

    /// Get the renderer name (for logging/debugging).
    fn renderer_name(&self) -> &'static str {
        "unknown"
    }
}
