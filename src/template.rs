//! Askama template integration for MJML messages.
//!
//! Render an Askama template that produces MJML into an [`OutgoingMessage`]
//! tagged `text/mjml`, ready for [`MjmlFormatter`](crate::MjmlFormatter).
//!
//! # Example
//!
//! ```rust,ignore
//! use askama::Template;
//! use mjml_mailer::MjmlTemplate;
//!
//! #[derive(Template)]
//! #[template(path = "emails/welcome.mjml", escape = "html")]
//! struct WelcomeEmail {
//!     user_name: String,
//!     to_email: String,
//! }
//!
//! impl MjmlTemplate for WelcomeEmail {
//!     fn subject(&self) -> String {
//!         format!("Welcome, {}!", self.user_name)
//!     }
//!
//!     fn to(&self) -> String {
//!         self.to_email.clone()
//!     }
//! }
//!
//! let message = WelcomeEmail {
//!     user_name: "Alice".to_string(),
//!     to_email: "alice@example.com".to_string(),
//! }.into_message()?;
//!
//! let message = formatter.format(message).await;
//! ```

use askama::Template;

use crate::error::RenderError;
use crate::message::{OutgoingMessage, CONTENT_TYPE_MJML};

/// Trait for MJML message templates.
pub trait MjmlTemplate: Template {
    /// The subject line.
    fn subject(&self) -> String;

    /// The recipient.
    fn to(&self) -> String;

    /// Message identifier, for diagnostics.
    fn id(&self) -> String {
        String::new()
    }

    /// Render the template into a `text/mjml` message.
    fn into_message(self) -> Result<OutgoingMessage, RenderError>
    where
        Self: Sized,
    {
        let mjml = self
            .render()
            .map_err(|e| RenderError::TemplateError(e.to_string()))?;

        Ok(OutgoingMessage::new()
            .id(self.id())
            .to(self.to())
            .subject(self.subject())
            .content_type(CONTENT_TYPE_MJML)
            .body(mjml))
    }
}
