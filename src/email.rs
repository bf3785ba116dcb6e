//! Email relay client.
//!
//! Hands a summary to the mail-sending endpoint. One attempt, no timeout,
//! no fallback.

use crate::endpoint::Endpoint;
use crate::transport::{Transport, TransportError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

const GENERIC_FAILURE: &str = "Failed to send email";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("recipients and content are both required")]
    MissingInput,
    #[error("{0}")]
    Rejected(String),
    #[error("invalid response from email endpoint: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A validated email relay request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRequest {
    /// Comma-separated addresses, passed through unchecked
    pub recipients: String,
    pub subject: String,
    pub content: String,
}

impl EmailRequest {
    pub fn new(
        recipients: impl Into<String>,
        content: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, EmailError> {
        let recipients = recipients.into();
        let content = content.into();
        if recipients.trim().is_empty() || content.trim().is_empty() {
            return Err(EmailError::MissingInput);
        }

        Ok(Self {
            recipients,
            subject: subject.into(),
            content,
        })
    }
}

/// Reply body of the email endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmailReply {
    success: bool,
    error: Option<String>,
    details: Option<String>,
}

/// Send `request` to `endpoint`.
pub async fn send_summary_email<T>(
    transport: &T,
    endpoint: &Endpoint,
    request: &EmailRequest,
) -> Result<(), EmailError>
where
    T: Transport + ?Sized,
{
    let body = serde_json::to_value(request)?;
    let reply = transport.post_json(endpoint, &body).await?;
    let parsed = serde_json::from_str::<EmailReply>(&reply.body);

    if !reply.is_success() {
        // Proxies answer errors with HTML; keep the status in that case
        let message = match parsed {
            Ok(data) => non_empty(data.details)
                .or(non_empty(data.error))
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            Err(_) => format!("{GENERIC_FAILURE} (HTTP {})", reply.status),
        };
        error!(endpoint = %endpoint, status = reply.status, error = %message, "Email relay rejected");
        return Err(EmailError::Rejected(message));
    }

    let data = parsed?;
    if !data.success {
        let message = non_empty(data.error).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        error!(endpoint = %endpoint, error = %message, "Email relay reported failure");
        return Err(EmailError::Rejected(message));
    }

    info!(endpoint = %endpoint, recipients = %request.recipients, "Email sent");
    Ok(())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
