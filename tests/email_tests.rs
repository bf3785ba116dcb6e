mod common;

use common::{html, json, ScriptedTransport};
use tersify::{send_summary_email, EmailError, EmailRequest, Endpoint};

fn endpoint() -> Endpoint {
    Endpoint::parse("/api/sendEmail")
}

fn request() -> EmailRequest {
    EmailRequest::new(
        "a@example.com, b@example.com",
        "<strong>Summary</strong>",
        "AI Generated Summary",
    )
    .unwrap()
}

#[test]
fn test_blank_inputs_are_rejected() {
    for (recipients, content) in [("", "summary"), ("a@example.com", "  "), (" \t", "\n")] {
        assert!(
            matches!(
                EmailRequest::new(recipients, content, "subject"),
                Err(EmailError::MissingInput)
            ),
            "({recipients:?}, {content:?}) should be rejected"
        );
    }
}

#[tokio::test]
async fn test_success_sends_one_request_with_wire_body() {
    let transport = ScriptedTransport::new([json(200, r#"{"success":true}"#)]);

    send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].endpoint, "/api/sendEmail");
    assert_eq!(
        calls[0].body,
        serde_json::json!({
            "recipients": "a@example.com, b@example.com",
            "subject": "AI Generated Summary",
            "content": "<strong>Summary</strong>"
        })
    );
}

#[tokio::test]
async fn test_success_false_carries_error_message() {
    let transport = ScriptedTransport::new([json(200, r#"{"success":false,"error":"x"}"#)]);

    let err = send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, EmailError::Rejected(ref m) if m == "x"));
    assert_eq!(err.to_string(), "x");
}

#[tokio::test]
async fn test_http_failure_prefers_details_over_error() {
    let transport = ScriptedTransport::new([json(
        500,
        r#"{"error":"Failed to send email","details":"SMTP auth failed"}"#,
    )]);

    let err = send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "SMTP auth failed");
}

#[tokio::test]
async fn test_http_failure_without_detail_uses_generic_message() {
    let transport = ScriptedTransport::new([json(502, r#"{}"#)]);

    let err = send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to send email");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_non_json_reply_is_invalid() {
    let transport = ScriptedTransport::new([html(200, "<html>ok</html>")]);

    let err = send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, EmailError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_html_error_page_keeps_status() {
    let transport = ScriptedTransport::new([html(502, "<html>Bad Gateway</html>")]);

    let err = send_summary_email(&transport, &endpoint(), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, EmailError::Rejected(_)));
    assert_eq!(err.to_string(), "Failed to send email (HTTP 502)");
}
