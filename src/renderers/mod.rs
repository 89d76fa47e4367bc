//! MJML renderer implementations.
//!
//! Each renderer implements the [`Renderer`](crate::Renderer) trait.
//!
//! ## Available Renderers
//!
//! | Renderer | Feature Flag | Id | Description |
//! |----------|-------------|----|-------------|
//! | [`BinaryRenderer`] | `binary` (default) | `binary` | Local `mjml` executable |
//! | [`ApiRenderer`] | `api` | `api` | mjml.io HTTP API |

#[cfg(feature = "binary")]
mod binary;
#[cfg(feature = "binary")]
pub use binary::BinaryRenderer;

#[cfg(feature = "api")]
mod api;
#[cfg(feature = "api")]
pub use api::ApiRenderer;
