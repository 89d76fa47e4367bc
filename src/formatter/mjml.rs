//! MJML-aware formatter.
//!
//! Messages are classified by their content type:
//!
//! | Content-Type | Handling |
//! |--------------|----------|
//! | `text/mjml` | body rendered to HTML, content type set to `text/html` |
//! | `text/mjml+twig` | body already HTML, content type set to `text/html` |
//! | anything else | handed to the fallback formatter |
//!
//! MJML always produces one complete HTML page, so a body with several
//! fragments keeps only the first one (with a warning). When rendering
//! fails the error is logged and the untouched message goes to the
//! fallback formatter instead, so it still gets delivered.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

#[cfg(feature = "metrics")]
use std::time::Instant;

use super::{MailFormatter, PlainTextFormatter};
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::message::{Body, ContentKind, OutgoingMessage, CONTENT_TYPE_HTML};
use crate::renderer::Renderer;
use crate::selector::DefaultRenderer;

/// Formatter that renders MJML bodies and delegates everything else.
pub struct MjmlFormatter<F = PlainTextFormatter> {
    renderer: Arc<dyn Renderer>,
    fallback: F,
}

impl<F: MailFormatter> MjmlFormatter<F> {
    /// Create a formatter rendering with `renderer` and falling back to `fallback`.
    pub fn new(renderer: Arc<dyn Renderer>, fallback: F) -> Self {
        Self { renderer, fallback }
    }

    /// Create a formatter from an owned renderer.
    pub fn with_renderer<R: Renderer + 'static>(renderer: R, fallback: F) -> Self {
        Self::new(Arc::new(renderer), fallback)
    }

    /// The fallback formatter.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Relabel as HTML and collapse the body to its first fragment.
    fn normalize(message: &mut OutgoingMessage) -> String {
        message.set_content_type(CONTENT_TYPE_HTML);

        if message.body.fragment_count() > 1 {
            tracing::warn!(
                message_id = %message.id,
                parts = message.body.fragment_count(),
                message_body = %message.body,
                "Message body contained more than one item. MJML always generates a complete \
                 HTML page, so only the first item was kept"
            );
        }

        std::mem::take(&mut message.body).into_first()
    }

    async fn render(&self, message_id: &str, mjml: &str) -> Result<String, RenderError> {
        let span = tracing::info_span!(
            "mjml.format",
            message_id = %message_id,
            renderer = self.renderer.renderer_name(),
        );

        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let result = self.renderer.render(mjml).instrument(span).await;

        #[cfg(feature = "metrics")]
        {
            let renderer = self.renderer.renderer_name();
            let status = if result.is_ok() { "success" } else { "error" };
            metrics::counter!("mjml_render_total", "renderer" => renderer, "status" => status)
                .increment(1);
            metrics::histogram!("mjml_render_duration_seconds", "renderer" => renderer)
                .record(start.elapsed().as_secs_f64());
        }

        result
    }
}

impl MjmlFormatter<PlainTextFormatter> {
    /// Wire the configured renderers behind a [`DefaultRenderer`] with the
    /// plain-text formatter as fallback.
    pub fn from_config(config: RendererConfig) -> Self {
        Self::with_renderer(DefaultRenderer::from_config(config), PlainTextFormatter::new())
    }
}

#[async_trait]
impl<F: MailFormatter> MailFormatter for MjmlFormatter<F> {
    async fn format(&self, message: OutgoingMessage) -> OutgoingMessage {
        match message.content_kind() {
            ContentKind::Other => self.fallback.format(message).await,
            ContentKind::MjmlPreRendered => {
                let mut message = message;
                let body = Self::normalize(&mut message);
                message.body = Body::Text(body);
                message
            }
            ContentKind::MjmlSource => {
                let mut converted = message.clone();
                let mjml = Self::normalize(&mut converted);

                match self.render(&converted.id, &mjml).await {
                    Ok(html) => {
                        converted.body = Body::Text(html);
                        converted
                    }
                    Err(error) => {
                        let renderer = error
                            .renderer()
                            .unwrap_or_else(|| self.renderer.renderer_name());
                        if error.is_renderer_not_found() {
                            tracing::error!(
                                message_id = %message.id,
                                message_body = %mjml,
                                error = %error,
                                error_kind = error.kind(),
                                "Configured MJML renderer is not registered, sending message unrendered"
                            );
                        } else {
                            tracing::error!(
                                message_id = %message.id,
                                message_body = %mjml,
                                error = %error,
                                error_kind = error.kind(),
                                renderer = renderer,
                                "Unable to render MJML message body"
                            );
                        }

                        #[cfg(feature = "metrics")]
                        metrics::counter!("mjml_fallback_total", "kind" => error.kind())
                            .increment(1);

                        self.fallback.format(message).await
                    }
                }
            }
        }
    }

    fn formatter_name(&self) -> &'static str {
        "mjml"
    }
}
