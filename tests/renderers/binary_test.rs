//! Binary renderer tests.
//!
//! Each test writes a small shell script standing in for the `mjml` CLI.

use mjml_mailer::renderers::BinaryRenderer;
use mjml_mailer::{
    Body, MailFormatter, MjmlFormatter, OutgoingMessage, PlainTextFormatter, RenderError,
    Renderer,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;
use tempfile::TempDir;

use crate::common::LogCapture;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write an executable `/bin/sh` script and return its path.
fn fake_mjml(dir: &TempDir, script: &str) -> String {
    let path = dir.path().join("mjml");
    fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
    path.to_string_lossy().into_owned()
}

// ============================================================================
// Success Tests
// ============================================================================

#[tokio::test]
async fn stdout_is_returned_as_html() {
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(&dir, "cat"));

    let html = renderer.render("<mjml><mj-body></mj-body></mjml>").await.unwrap();
    assert_eq!(html, "<mjml><mj-body></mj-body></mjml>");
}

#[tokio::test]
async fn passes_stdin_stdout_and_minify_flags() {
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(&dir, "cat > /dev/null\necho \"$@\""));

    let args = renderer.render("<mjml/>").await.unwrap();
    assert_eq!(args.trim(), "-i -s --config.minify false");

    let renderer = renderer.minify(true);
    let args = renderer.render("<mjml/>").await.unwrap();
    assert_eq!(args.trim(), "-i -s --config.minify true");
}

#[tokio::test]
async fn large_body_does_not_block_on_full_pipes() {
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(&dir, "cat"));

    // Several times the usual 64 KiB pipe buffer
    let text = "<mj-text>Lorem ipsum dolor sit amet</mj-text>".repeat(12_000);
    let mjml = format!("<mjml><mj-body>{}</mj-body></mjml>", text);
    assert!(mjml.len() > 512 * 1024);

    let html = tokio::time::timeout(Duration::from_secs(10), renderer.render(&mjml))
        .await
        .expect("render did not finish")
        .unwrap();
    assert_eq!(html.len(), mjml.len());
    assert_eq!(html, mjml);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn non_zero_exit_is_backend_error_with_stderr() {
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(
        &dir,
        "cat > /dev/null\necho 'Line 3 of mj-section: unclosed tag' >&2\nexit 3",
    ));

    match renderer.render("<mjml><mj-section></mjml>").await {
        Err(RenderError::Backend {
            renderer,
            message,
            status,
        }) => {
            assert_eq!(renderer, "binary");
            assert_eq!(message, "Line 3 of mj-section: unclosed tag");
            assert_eq!(status, Some(3));
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn silent_failure_reports_exit_status() {
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(&dir, "exit 1"));

    match renderer.render("<mjml/>").await {
        Err(RenderError::Backend { message, status, .. }) => {
            assert!(message.contains("exited with"));
            assert_eq!(status, Some(1));
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_executable_is_process_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not-installed");
    let renderer = BinaryRenderer::new(path.to_string_lossy());

    let result = renderer.render("<mjml/>").await;
    assert!(matches!(result, Err(RenderError::Process(_))));
}

// ============================================================================
// Formatter Integration Tests
// ============================================================================

#[tokio::test]
async fn failing_binary_falls_back_to_plain_text() {
    let (logs, _guard) = LogCapture::install();
    let dir = TempDir::new().unwrap();
    let renderer = BinaryRenderer::new(fake_mjml(
        &dir,
        "cat > /dev/null\necho 'mjml: command crashed' >&2\nexit 2",
    ));
    let formatter = MjmlFormatter::with_renderer(renderer, PlainTextFormatter::new());

    let message = OutgoingMessage::new()
        .content_type("text/mjml")
        .body("<mjml><mj-body><mj-text>Still delivered</mj-text></mj-body></mjml>");

    let result = formatter.format(message).await;

    assert_eq!(result.body, Body::Text("Still delivered".into()));
    let errors = logs.lines_at("ERROR");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("mjml: command crashed"));
    assert!(errors[0].contains("binary"));
}
