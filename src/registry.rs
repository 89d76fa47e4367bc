//! Renderer registry.
//!
//! Maps renderer ids to constructed renderers. Filled once at wiring time,
//! then only read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::renderer::Renderer;

/// Prefix of the legacy service names (`mjml.renderer.binary`, ...).
const LEGACY_ID_PREFIX: &str = "mjml.renderer.";

/// Renderers keyed by id.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration.
    ///
    /// Registers the binary renderer when the `binary` feature is enabled and
    /// the API renderer when the `api` feature is enabled. A renderer whose
    /// feature is off is simply absent; selecting it fails at lookup time.
    pub fn from_config(config: &RendererConfig) -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "binary")]
        {
            let renderer = crate::renderers::BinaryRenderer::new(config.binary_path())
                .minify(config.binary_minify());
            registry.register(crate::config::BINARY_RENDERER_ID, renderer);
        }

        #[cfg(feature = "api")]
        {
            let renderer = crate::renderers::ApiRenderer::new(
                config.api_application_id(),
                config.api_secret_key(),
            );
            registry.register(crate::config::API_RENDERER_ID, renderer);
        }

        #[cfg(not(any(feature = "binary", feature = "api")))]
        let _ = config;

        tracing::debug!(renderers = ?registry.ids(), "MJML renderers registered");
        registry
    }

    /// Register a renderer under `id`, replacing any previous entry.
    pub fn register<R: Renderer + 'static>(&mut self, id: impl Into<String>, renderer: R) {
        self.register_arc(id, Arc::new(renderer));
    }

    /// Register an already shared renderer.
    pub fn register_arc(&mut self, id: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.renderers.insert(id.into(), renderer);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<R: Renderer + 'static>(mut self, id: impl Into<String>, renderer: R) -> Self {
        self.register(id, renderer);
        self
    }

    /// Get the renderer registered under `id`.
    ///
    /// Legacy service names such as `mjml.renderer.api` resolve to `api`.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Renderer>, RenderError> {
        self.renderers
            .get(id)
            .or_else(|| {
                id.strip_prefix(LEGACY_ID_PREFIX)
                    .and_then(|short| self.renderers.get(short))
            })
            .cloned()
            .ok_or_else(|| RenderError::RendererNotFound(id.to_string()))
    }

    /// Whether `id` resolves to a renderer.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered renderers.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether no renderer is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("renderers", &self.ids())
            .finish()
    }
}
