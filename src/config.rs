//! Layered renderer configuration.
//!
//! Two layers feed renderer wiring and selection: deployment-level
//! settings and module-level parameters. Both use the same nested layout:
//!
//! ```json
//! {
//!   "default_renderer": "binary",
//!   "renderer": {
//!     "binary": { "options": { "path": "/usr/local/bin/mjml", "minify": true } },
//!     "api": { "client": { "application-id": "...", "secret-key": "..." } }
//!   }
//! }
//! ```
//!
//! Each key is resolved on its own: a value from the settings layer wins,
//! then the parameters layer, then the built-in default.
//!
//! ## Environment Variables
//!
//! [`MjmlSettings::from_env`] builds the settings layer from:
//!
//! | Variable | Key |
//! |----------|-----|
//! | `MJML_DEFAULT_RENDERER` | `default_renderer` |
//! | `MJML_BINARY_PATH` | `renderer.binary.options.path` |
//! | `MJML_BINARY_MINIFY` | `renderer.binary.options.minify` |
//! | `MJML_API_APPLICATION_ID` | `renderer.api.client.application-id` |
//! | `MJML_API_SECRET_KEY` | `renderer.api.client.secret-key` |

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::RenderError;

/// Id of the renderer backed by the local `mjml` executable.
pub const BINARY_RENDERER_ID: &str = "binary";

/// Id of the renderer backed by the mjml.io API.
pub const API_RENDERER_ID: &str = "api";

/// Executable used when no path is configured.
pub const DEFAULT_BINARY_PATH: &str = "mjml";

/// One configuration layer. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MjmlSettings {
    /// Id of the renderer used for `text/mjml` messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_renderer: Option<String>,
    /// Per-renderer options
    pub renderer: RendererSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSection {
    pub binary: BinarySection,
    pub api: ApiSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarySection {
    pub options: BinaryOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub client: ApiClientOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiClientOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl MjmlSettings {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layer from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a layer from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RenderError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read a layer from `MJML_*` environment variables.
    ///
    /// Unset variables leave the key empty. `MJML_BINARY_MINIFY` accepts
    /// `true`/`false`/`1`/`0`/`yes`/`no`/`on`/`off` in any case; an empty
    /// value means `false`. Anything else is a [`RenderError::Configuration`].
    pub fn from_env() -> Result<Self, RenderError> {
        let minify = match env::var("MJML_BINARY_MINIFY") {
            Ok(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                RenderError::Configuration(format!(
                    "MJML_BINARY_MINIFY must be true or false, got {:?}",
                    raw
                ))
            })?),
            Err(_) => None,
        };

        Ok(Self::new()
            .maybe_default_renderer(env::var("MJML_DEFAULT_RENDERER").ok())
            .maybe_binary_path(env::var("MJML_BINARY_PATH").ok())
            .maybe_minify(minify)
            .maybe_api_credentials(
                env::var("MJML_API_APPLICATION_ID").ok(),
                env::var("MJML_API_SECRET_KEY").ok(),
            ))
    }

    /// Set the default renderer id.
    pub fn default_renderer(mut self, id: impl Into<String>) -> Self {
        self.default_renderer = Some(id.into());
        self
    }

    /// Set the `mjml` executable path.
    pub fn binary_path(mut self, path: impl Into<String>) -> Self {
        self.renderer.binary.options.path = Some(path.into());
        self
    }

    /// Set whether the binary renderer minifies its output.
    pub fn minify(mut self, minify: bool) -> Self {
        self.renderer.binary.options.minify = Some(minify);
        self
    }

    /// Set the mjml.io API credentials.
    pub fn api_credentials(
        mut self,
        application_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.renderer.api.client.application_id = Some(application_id.into());
        self.renderer.api.client.secret_key = Some(secret_key.into());
        self
    }

    fn maybe_default_renderer(mut self, id: Option<String>) -> Self {
        self.default_renderer = id;
        self
    }

    fn maybe_binary_path(mut self, path: Option<String>) -> Self {
        self.renderer.binary.options.path = path;
        self
    }

    fn maybe_minify(mut self, minify: Option<bool>) -> Self {
        self.renderer.binary.options.minify = minify;
        self
    }

    fn maybe_api_credentials(
        mut self,
        application_id: Option<String>,
        secret_key: Option<String>,
    ) -> Self {
        self.renderer.api.client.application_id = application_id;
        self.renderer.api.client.secret_key = secret_key;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Both configuration layers, resolved key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererConfig {
    settings: MjmlSettings,
    parameters: MjmlSettings,
}

impl RendererConfig {
    /// Combine deployment `settings` with module `parameters`.
    pub fn new(settings: MjmlSettings, parameters: MjmlSettings) -> Self {
        Self {
            settings,
            parameters,
        }
    }

    /// Only module parameters, no deployment overrides.
    pub fn from_parameters(parameters: MjmlSettings) -> Self {
        Self::new(MjmlSettings::default(), parameters)
    }

    /// Deployment settings from the environment, no module parameters.
    pub fn from_env() -> Result<Self, RenderError> {
        Ok(Self::new(MjmlSettings::from_env()?, MjmlSettings::default()))
    }

    /// Id of the renderer used for `text/mjml` messages.
    pub fn default_renderer(&self) -> &str {
        self.lookup(|layer| layer.default_renderer.as_deref())
            .unwrap_or(BINARY_RENDERER_ID)
    }

    /// Path of the `mjml` executable.
    pub fn binary_path(&self) -> &str {
        self.lookup(|layer| layer.renderer.binary.options.path.as_deref())
            .unwrap_or(DEFAULT_BINARY_PATH)
    }

    /// Whether the binary renderer minifies its output.
    pub fn binary_minify(&self) -> bool {
        self.lookup(|layer| layer.renderer.binary.options.minify)
            .unwrap_or(false)
    }

    /// mjml.io application id.
    pub fn api_application_id(&self) -> &str {
        self.lookup(|layer| layer.renderer.api.client.application_id.as_deref())
            .unwrap_or_default()
    }

    /// mjml.io secret key.
    pub fn api_secret_key(&self) -> &str {
        self.lookup(|layer| layer.renderer.api.client.secret_key.as_deref())
            .unwrap_or_default()
    }

    fn lookup<'a, T>(&'a self, key: impl Fn(&'a MjmlSettings) -> Option<T>) -> Option<T> {
        key(&self.settings).or_else(|| key(&self.parameters))
    }
}
