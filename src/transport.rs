//! HTTP transport seam.
//!
//! The request clients talk to a [`Transport`] rather than to reqwest directly,
//! so the fallback and classification logic can run against a scripted fake.

use crate::endpoint::Endpoint;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("tersify/", env!("CARGO_PKG_VERSION"), " (https://github.com/cladam/tersify)");

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid endpoint {0}: {1}")]
    InvalidEndpoint(String, String),
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// What came back from a POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to `endpoint` and collect the reply
    async fn post_json(
        &self,
        endpoint: &Endpoint,
        body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError>;
}

/// reqwest-backed transport. Relative endpoints resolve against `origin`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    origin: Url,
}

impl HttpTransport {
    pub fn new(origin: Url) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &Endpoint,
        body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let url = endpoint
            .resolve(&self.origin)
            .map_err(|e| TransportError::InvalidEndpoint(endpoint.to_string(), e.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(HttpReply {
            status,
            content_type,
            body,
        })
    }
}
