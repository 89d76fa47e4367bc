//! Renderer backed by the `mjml` command line tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use mjml_mailer::renderers::BinaryRenderer;
//!
//! let renderer = BinaryRenderer::new("/usr/local/bin/mjml").minify(true);
//! let html = renderer.render("<mjml><mj-body></mj-body></mjml>").await?;
//! ```
//!
//! The markup is piped to `<path> -i -s --config.minify <bool>` and the HTML
//! is read back from stdout.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::DEFAULT_BINARY_PATH;
use crate::error::RenderError;
use crate::renderer::Renderer;

/// Renders MJML by spawning the `mjml` executable once per call.
#[derive(Debug, Clone)]
pub struct BinaryRenderer {
    path: String,
    minify: bool,
}

impl BinaryRenderer {
    /// Create a renderer for the executable at `path`.
    ///
    /// An empty path means `mjml` from `PATH`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                DEFAULT_BINARY_PATH.to_string()
            } else {
                path
            },
            minify: false,
        }
    }

    /// Set whether the output is minified.
    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Executable path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the output is minified.
    pub fn is_minified(&self) -> bool {
        self.minify
    }

    fn args(&self) -> [&'static str; 4] {
        [
            "-i",
            "-s",
            "--config.minify",
            if self.minify { "true" } else { "false" },
        ]
    }
}

impl Default for BinaryRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_PATH)
    }
}

#[async_trait]
impl Renderer for BinaryRenderer {
    async fn render(&self, mjml: &str) -> Result<String, RenderError> {
        let mut child = Command::new(&self.path)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::Process(format!("failed to spawn {}: {}", self.path, e)))?;

        // stdout is drained while stdin is still being written, otherwise a
        // child that fills its output pipe first never reads the rest
        let stdin = child.stdin.take();
        let write = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(mjml.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        // The exit status tells more than a broken pipe when mjml bails early
        match written {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) if output.status.success() => return Err(e.into()),
            _ => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.path, output.status)
            } else {
                stderr
            };
            tracing::debug!(path = %self.path, status = %output.status, "mjml process failed");
            return Err(match output.status.code().and_then(|c| u16::try_from(c).ok()) {
                Some(code) => RenderError::backend_with_status("binary", message, code),
                None => RenderError::backend("binary", message),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RenderError::backend("binary", format!("output is not UTF-8: {}", e)))
    }

    fn renderer_name(&self) -> &'static str {
        "binary"
    }
}
