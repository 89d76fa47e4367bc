//! Mail formatters.
//!
//! A formatter turns an outgoing message into its deliverable shape just
//! before it is handed to the transport. [`PlainTextFormatter`] is the
//! baseline; [`MjmlFormatter`] renders MJML bodies and hands everything
//! else, including failed conversions, to a baseline formatter.
//!
//! # Example
//!
//! ```rust,ignore
//! use mjml_mailer::{MailFormatter, MjmlFormatter, OutgoingMessage, PlainTextFormatter};
//! use mjml_mailer::renderers::BinaryRenderer;
//!
//! let formatter = MjmlFormatter::with_renderer(BinaryRenderer::default(), PlainTextFormatter::new());
//!
//! let message = OutgoingMessage::new()
//!     .content_type("text/mjml")
//!     .body("<mjml><mj-body><mj-text>Hi</mj-text></mj-body></mjml>");
//!
//! let message = formatter.format(message).await;
//! assert_eq!(message.get_content_type(), Some("text/html"));
//! ```

use async_trait::async_trait;

use crate::message::OutgoingMessage;

mod mjml;
mod plain;

pub use mjml::MjmlFormatter;
pub use plain::{PlainTextFormatter, CONTENT_TYPE_PLAIN};

/// Prepares an outgoing message for delivery.
///
/// Formatting never fails: whatever goes wrong inside, a deliverable
/// message comes out.
///
/// For simple cases, use a closure:
///
/// ```rust,ignore
/// let formatter = |message: OutgoingMessage| message.header("X-Formatted", "yes");
/// ```
#[async_trait]
pub trait MailFormatter: Send + Sync {
    /// Format the message for delivery.
    async fn format(&self, message: OutgoingMessage) -> OutgoingMessage;

    /// Get the formatter name (for logging/debugging).
    fn formatter_name(&self) -> &'static str {
        "unknown"
    }
}

/// Blanket implementation for closures.
#[async_trait]
impl<F> MailFormatter for F
where
    F: Fn(OutgoingMessage) -> OutgoingMessage + Send + Sync,
{
    async fn format(&self, message: OutgoingMessage) -> OutgoingMessage {
        (self)(message)
    }
}
