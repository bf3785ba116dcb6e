#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tersify::{Endpoint, HttpReply, Transport, TransportError};
use tokio::sync::watch;

/// What the fake should do for the next call
pub enum Scripted {
    Reply(HttpReply),
    Hang,
    Refuse,
}

pub fn json(status: u16, body: &str) -> Scripted {
    Scripted::Reply(HttpReply {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    })
}

pub fn html(status: u16, body: &str) -> Scripted {
    Scripted::Reply(HttpReply {
        status,
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.to_string(),
    })
}

pub fn not_found() -> Scripted {
    html(404, "<h1>404</h1>")
}

/// A recorded POST
#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: String,
    pub body: serde_json::Value,
    /// Value of the watched in-flight flag while the call was outstanding
    pub flag: Option<bool>,
}

/// Transport that plays back scripted replies and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
    flag: Mutex<Option<watch::Receiver<bool>>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Record this flag's value on every call
    pub fn watch(&self, flag: watch::Receiver<bool>) {
        *self.flag.lock().unwrap() = Some(flag);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        endpoint: &Endpoint,
        body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let flag = self.flag.lock().unwrap().as_ref().map(|rx| *rx.borrow());
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            body: body.clone(),
            flag,
        });

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Hang) => std::future::pending().await,
            Some(Scripted::Refuse) | None => Err(TransportError::InvalidEndpoint(
                endpoint.to_string(),
                "connection refused".to_string(),
            )),
        }
    }
}

pub fn endpoints(list: &[&str]) -> Vec<Endpoint> {
    list.iter().map(|s| Endpoint::parse(s)).collect()
}
