//! Default renderer selection.
//!
//! [`DefaultRenderer`] picks the renderer for each call from the layered
//! configuration:
//!
//! 1. `default_renderer` from deployment settings
//! 2. `default_renderer` from module parameters
//! 3. the binary renderer
//!
//! The chosen id must be registered. A miss is reported as
//! [`RenderError::RendererNotFound`], never replaced by another renderer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::registry::RendererRegistry;
use crate::renderer::Renderer;

/// Renderer that delegates to the configured default.
#[derive(Debug, Clone)]
pub struct DefaultRenderer {
    registry: Arc<RendererRegistry>,
    config: Arc<RendererConfig>,
}

impl DefaultRenderer {
    /// Create a selector over `registry` driven by `config`.
    pub fn new(registry: Arc<RendererRegistry>, config: Arc<RendererConfig>) -> Self {
        Self { registry, config }
    }

    /// Build the registry from `config` and select from it.
    pub fn from_config(config: RendererConfig) -> Self {
        let registry = RendererRegistry::from_config(&config);
        Self::new(Arc::new(registry), Arc::new(config))
    }

    /// Id the next call will resolve.
    pub fn default_renderer_id(&self) -> &str {
        self.config.default_renderer()
    }

    /// Resolve the default renderer.
    pub fn resolve(&self) -> Result<Arc<dyn Renderer>, RenderError> {
        let id = self.default_renderer_id();
        let renderer = self.registry.get(id)?;
        tracing::debug!(
            renderer_id = id,
            renderer = renderer.renderer_name(),
            "Resolved default MJML renderer"
        );
        Ok(renderer)
    }

    /// The registry this selector reads from.
    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }
}

#[async_trait]
impl Renderer for DefaultRenderer {
    async fn render(&self, mjml: &str) -> Result<String, RenderError> {
        self.resolve()?.render(mjml).await
    }

    fn renderer_name(&self) -> &'static str {
        "default"
    }
}
