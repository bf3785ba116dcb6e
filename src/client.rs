//! Summary request client.
//!
//! Tries each candidate endpoint in order. A 404 moves on to the next
//! candidate; every other failure ends the request.

use crate::endpoint::Endpoint;
use crate::summary::{FormattedSummary, SummarizeRequest, SummaryReply};
use crate::transport::{HttpReply, Transport, TransportError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Default per-endpoint deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("no text to summarise")]
    EmptyText,
    #[error("HTTP error! status: {status} - {body}")]
    Http { status: u16, body: String },
    #[error("API returned non-JSON response")]
    UnexpectedShape,
    #[error("Invalid response format: missing sendtext field")]
    MalformedResponse,
    #[error("request to {endpoint} timed out after {}s", .after.as_secs())]
    Timeout { endpoint: String, after: Duration },
    #[error("no summary endpoint found (tried {attempted})")]
    NoEndpoint { attempted: usize },
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// How a single candidate attempt ended
#[derive(Debug)]
enum Attempt {
    Success(String),
    NotFound,
    Fatal(SummaryError),
}

/// Request a summary, falling back across `candidates` on 404.
///
/// Candidates are tried one at a time; at most `candidates.len()` requests are
/// issued. Returns the formatted summary from the first candidate that answers.
pub async fn request_summary<T>(
    transport: &T,
    candidates: &[Endpoint],
    request: &SummarizeRequest,
    timeout: Duration,
) -> Result<FormattedSummary, SummaryError>
where
    T: Transport + ?Sized,
{
    let body = serde_json::to_value(request.payload())?;

    for endpoint in candidates {
        debug!(endpoint = %endpoint, "Trying summary endpoint");

        let reply = match tokio::time::timeout(timeout, transport.post_json(endpoint, &body)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(endpoint = %endpoint, error = %e, "Summary request failed");
                return Err(e.into());
            }
            Err(_) => {
                error!(endpoint = %endpoint, timeout_secs = timeout.as_secs(), "Summary request timed out");
                return Err(SummaryError::Timeout {
                    endpoint: endpoint.to_string(),
                    after: timeout,
                });
            }
        };

        match classify(reply) {
            Attempt::Success(text) => {
                info!(endpoint = %endpoint, chars = text.len(), "Summary received");
                return Ok(FormattedSummary::from_raw(&text));
            }
            Attempt::NotFound => {
                warn!(endpoint = %endpoint, "Endpoint not found, trying next");
            }
            Attempt::Fatal(e) => {
                error!(endpoint = %endpoint, error = %e, "Summary request failed");
                return Err(e);
            }
        }
    }

    Err(SummaryError::NoEndpoint {
        attempted: candidates.len(),
    })
}

fn classify(reply: HttpReply) -> Attempt {
    if reply.status == 404 {
        return Attempt::NotFound;
    }
    if !reply.is_success() {
        return Attempt::Fatal(SummaryError::Http {
            status: reply.status,
            body: reply.body,
        });
    }
    if !reply.is_json() {
        debug!(body = %reply.body, "Non-JSON response");
        return Attempt::Fatal(SummaryError::UnexpectedShape);
    }

    match serde_json::from_str::<SummaryReply>(&reply.body) {
        Ok(SummaryReply {
            sendtext: Some(text),
        }) if !text.is_empty() => Attempt::Success(text),
        _ => Attempt::Fatal(SummaryError::MalformedResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_reply(status: u16, body: &str) -> HttpReply {
        HttpReply {
            status,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn not_found_is_not_terminal() {
        assert!(matches!(classify(json_reply(404, "")), Attempt::NotFound));
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        match classify(json_reply(500, "boom")) {
            Attempt::Fatal(SummaryError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_or_non_string_sendtext_is_malformed() {
        for body in [r#"{}"#, r#"{"sendtext":""}"#, r#"{"sendtext":42}"#, "not json"] {
            assert!(
                matches!(
                    classify(json_reply(200, body)),
                    Attempt::Fatal(SummaryError::MalformedResponse)
                ),
                "body {body} should be malformed"
            );
        }
    }
}
