//! mjml.io API renderer tests.

use base64::Engine;
use mjml_mailer::renderers::ApiRenderer;
use mjml_mailer::{
    Body, DefaultRenderer, MailFormatter, MjmlFormatter, MjmlSettings, OutgoingMessage,
    PlainTextFormatter, RenderError, Renderer, RendererConfig, RendererRegistry,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

const MJML: &str = "<mjml><mj-body><mj-text>Hello</mj-text></mj-body></mjml>";

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "html": "<!doctype html><html><body>Hello</body></html>",
        "mjml": MJML,
        "mjml_version": "4.15.3",
        "errors": []
    }))
}

// ============================================================================
// Basic Render Tests
// ============================================================================

#[tokio::test]
async fn successful_render_returns_html() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("app-id", "secret").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/render"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "mjml": MJML })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let html = renderer.render(MJML).await.unwrap();
    assert_eq!(html, "<!doctype html><html><body>Hello</body></html>");
}

#[tokio::test]
async fn sends_basic_auth_header() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("app-id", "secret").base_url(server.uri());

    // Base64 of "app-id:secret"
    let expected_auth = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("app-id:secret")
    );

    Mock::given(method("POST"))
        .and(path("/render"))
        .and(header("Authorization", expected_auth.as_str()))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    assert!(renderer.render(MJML).await.is_ok());
}

#[tokio::test]
async fn validation_errors_do_not_fail_the_render() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("app-id", "secret").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<html>partial</html>",
            "errors": [{
                "line": 1,
                "message": "mj-text cannot be used inside mj-body",
                "tagName": "mj-text"
            }]
        })))
        .mount(&server)
        .await;

    assert_eq!(renderer.render(MJML).await.unwrap(), "<html>partial</html>");
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn error_response_is_backend_error() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("app-id", "secret").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Malformed MJML",
            "request_id": "req-123"
        })))
        .mount(&server)
        .await;

    match renderer.render("<mjml>").await {
        Err(RenderError::Backend {
            renderer,
            message,
            status,
        }) => {
            assert_eq!(renderer, "api");
            assert_eq!(message, "Malformed MJML");
            assert_eq!(status, Some(400));
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_is_backend_error() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("wrong", "credentials").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    match renderer.render(MJML).await {
        Err(RenderError::Backend { status, .. }) => assert_eq!(status, Some(401)),
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_error_body_uses_unknown_error() {
    let server = MockServer::start().await;
    let renderer = ApiRenderer::new("app-id", "secret").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    match renderer.render(MJML).await {
        Err(RenderError::Backend {
            message, status, ..
        }) => {
            assert_eq!(message, "Unknown error");
            assert_eq!(status, Some(502));
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_api_is_http_error() {
    // Nothing listens on port 1
    let renderer = ApiRenderer::new("app-id", "secret").base_url("http://127.0.0.1:1");
    let result = renderer.render(MJML).await;
    assert!(matches!(result, Err(RenderError::HttpError(_))));
}

// ============================================================================
// Selection Tests
// ============================================================================

#[tokio::test]
async fn api_selected_by_settings_renders_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let registry = RendererRegistry::new()
        .with("api", ApiRenderer::new("app-id", "secret").base_url(server.uri()));
    let selector = DefaultRenderer::new(
        Arc::new(registry),
        Arc::new(RendererConfig::new(
            MjmlSettings::new().default_renderer("api"),
            MjmlSettings::new().default_renderer("binary"),
        )),
    );
    let formatter = MjmlFormatter::with_renderer(selector, PlainTextFormatter::new());

    let message = OutgoingMessage::new().content_type("text/mjml").body(MJML);
    let result = formatter.format(message).await;

    assert_eq!(result.get_content_type(), Some("text/html"));
    assert_eq!(
        result.body,
        Body::Text("<!doctype html><html><body>Hello</body></html>".into())
    );
}
