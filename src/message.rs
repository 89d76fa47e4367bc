//! Outgoing message model with builder pattern.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Content type of a message whose body is an MJML document.
pub const CONTENT_TYPE_MJML: &str = "text/mjml";

/// Content type of a message whose body was already rendered from MJML to
/// HTML by an upstream templating step.
pub const CONTENT_TYPE_MJML_TWIG: &str = "text/mjml+twig";

/// Content type written on messages after MJML handling.
pub const CONTENT_TYPE_HTML: &str = "text/html";

const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Message body.
///
/// The mail subsystem may hand over a single document or an ordered list of
/// fragments. Serialized untagged, so JSON `"..."` and `["...", "..."]` both
/// deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// A single document.
    Text(String),
    /// Ordered fragments.
    Parts(Vec<String>),
}

impl Body {
    /// Number of fragments. A single document counts as one, even when it
    /// is empty, so `fragment_count() == 1` and `is_empty()` can both hold.
    pub fn fragment_count(&self) -> usize {
        match self {
            Body::Text(_) => 1,
            Body::Parts(parts) => parts.len(),
        }
    }

    /// True for an empty fragment list or an empty document.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Text(text) => text.is_empty(),
            Body::Parts(parts) => parts.is_empty(),
        }
    }

    /// The fragments as a slice-like iterator.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        let parts: &[String] = match self {
            Body::Text(text) => std::slice::from_ref(text),
            Body::Parts(parts) => parts,
        };
        parts.iter().map(String::as_str)
    }

    /// Keep the first fragment only. An empty list becomes an empty string.
    pub fn into_first(self) -> String {
        match self {
            Body::Text(text) => text,
            Body::Parts(parts) => parts.into_iter().next().unwrap_or_default(),
        }
    }

    /// The single document, if the body has been collapsed.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Parts(_) => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Parts(Vec::new())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<String>> for Body {
    fn from(parts: Vec<String>) -> Self {
        Body::Parts(parts)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.write_str(text),
            Body::Parts(parts) => write!(f, "{:?}", parts),
        }
    }
}

/// How a message body has to be treated, derived from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Anything that is not MJML. Left to the baseline formatter.
    Other,
    /// Raw MJML that must be rendered.
    MjmlSource,
    /// Already HTML, only the content type needs fixing.
    MjmlPreRendered,
}

impl ContentKind {
    /// Classify a content-type header value. Only the exact MJML literals
    /// are recognized.
    pub fn from_content_type(value: Option<&str>) -> Self {
        match value {
            Some(CONTENT_TYPE_MJML) => ContentKind::MjmlSource,
            Some(CONTENT_TYPE_MJML_TWIG) => ContentKind::MjmlPreRendered,
            _ => ContentKind::Other,
        }
    }

    /// Whether the body is MJML of either flavor.
    pub fn is_mjml(self) -> bool {
        !matches!(self, ContentKind::Other)
    }
}

/// A mail message on its way to delivery.
///
/// ```
/// use mjml_mailer::{OutgoingMessage, CONTENT_TYPE_MJML};
///
/// let message = OutgoingMessage::new()
///     .id("user_register")
///     .to("recipient@example.com")
///     .subject("Welcome!")
///     .content_type(CONTENT_TYPE_MJML)
///     .body("<mjml><mj-body></mj-body></mjml>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Identifier of the message kind, for diagnostics
    #[serde(default)]
    pub id: String,
    /// Recipient, as handed over by the mail subsystem
    #[serde(default)]
    pub to: String,
    /// Subject line
    #[serde(default)]
    pub subject: String,
    /// Mail headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Body document or fragments
    #[serde(default)]
    pub body: Body,
}

impl OutgoingMessage {
    /// Create a new empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the recipient.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type header.
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.set_content_type(value);
        self
    }

    /// Set the body to a single document.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Text(body.into());
        self
    }

    /// Append a body fragment.
    ///
    /// A single-document body becomes the first fragment.
    pub fn body_part(mut self, part: impl Into<String>) -> Self {
        self.body = match std::mem::take(&mut self.body) {
            Body::Text(text) => Body::Parts(vec![text, part.into()]),
            Body::Parts(mut parts) => {
                parts.push(part.into());
                Body::Parts(parts)
            }
        };
        self
    }

    /// Look up a header, ignoring the case of its name.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The content type header, if any.
    pub fn get_content_type(&self) -> Option<&str> {
        self.get_header(CONTENT_TYPE_HEADER)
    }

    /// Replace the content type header, keeping the existing key's spelling.
    pub fn set_content_type(&mut self, value: impl Into<String>) {
        let key = self
            .headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
            .cloned()
            .unwrap_or_else(|| CONTENT_TYPE_HEADER.to_string());
        self.headers.insert(key, value.into());
    }

    /// Classify the body by its content type.
    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_content_type(self.get_content_type())
    }
}
