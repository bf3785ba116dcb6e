//! Session controller.
//!
//! Owns the state a front end displays: the input text, the current summary,
//! the recipients, the in-flight flags and a queue of user-facing notices.
//! The request clients stay pure; this is the only place their results turn
//! into state changes.

use crate::client::{self, SummaryError};
use crate::config::Config;
use crate::email::{self, EmailError, EmailRequest};
use crate::endpoint::{self, Endpoint, ResolverInputs};
use crate::format::Markup;
use crate::summary::SummarizeRequest;
use crate::transport::Transport;
use std::path::Path;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

pub const EMPTY_TEXT_NOTICE: &str = "Please upload a file or enter text first.";
pub const SUMMARY_SUCCESS_NOTICE: &str = "Summary generated successfully!";
pub const EMAIL_INPUT_NOTICE: &str =
    "Please enter recipient emails and ensure you have a summary to share.";
pub const EMAIL_SUCCESS_NOTICE: &str = "Email sent successfully!";
pub const UNSUPPORTED_FILE_NOTICE: &str =
    "Please upload a .txt file (PDF/DOC/DOCX not yet supported)";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Which input the summary is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Upload,
    Text,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub source: Source,
    pub uploaded_text: String,
    pub input_text: String,
    pub custom_prompt: String,
    /// Formatted summary markup, editable in place
    pub summary: String,
    /// Parsed form of `summary`, dropped once the user edits it
    pub summary_markup: Option<Markup>,
    pub email_recipients: String,
}

impl SessionState {
    /// Text of the active source
    pub fn active_text(&self) -> &str {
        match self.source {
            Source::Upload => &self.uploaded_text,
            Source::Text => &self.input_text,
        }
    }
}

/// Raises an in-flight flag and lowers it again when dropped
struct InFlight<'a>(&'a watch::Sender<bool>);

impl<'a> InFlight<'a> {
    fn raise(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

pub struct Session<T> {
    transport: T,
    config: Config,
    state: SessionState,
    generating: watch::Sender<bool>,
    sending_email: watch::Sender<bool>,
    processing_file: watch::Sender<bool>,
    notices: Vec<Notice>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            state: SessionState::default(),
            generating: watch::Sender::new(false),
            sending_email: watch::Sender::new(false),
            processing_file: watch::Sender::new(false),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_generating(&self) -> bool {
        *self.generating.borrow()
    }

    pub fn is_sending_email(&self) -> bool {
        *self.sending_email.borrow()
    }

    /// Watch the summary in-flight flag
    pub fn subscribe_generating(&self) -> watch::Receiver<bool> {
        self.generating.subscribe()
    }

    /// Watch the email in-flight flag
    pub fn subscribe_sending_email(&self) -> watch::Receiver<bool> {
        self.sending_email.subscribe()
    }

    pub fn is_processing_file(&self) -> bool {
        *self.processing_file.borrow()
    }

    /// Watch the file-loading flag
    pub fn subscribe_processing_file(&self) -> watch::Receiver<bool> {
        self.processing_file.subscribe()
    }

    /// Drain pending notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_source(&mut self, source: Source) {
        self.state.source = source;
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.state.input_text = text.into();
    }

    pub fn set_custom_prompt(&mut self, prompt: impl Into<String>) {
        self.state.custom_prompt = prompt.into();
    }

    pub fn set_email_recipients(&mut self, recipients: impl Into<String>) {
        self.state.email_recipients = recipients.into();
    }

    /// Replace the summary with a user-edited version
    pub fn edit_summary(&mut self, summary: impl Into<String>) {
        self.state.summary = summary.into();
        self.state.summary_markup = None;
    }

    pub fn remove_uploaded_file(&mut self) {
        self.state.uploaded_text.clear();
    }

    /// Summary endpoint candidates for the current configuration
    pub fn candidates(&self) -> Vec<Endpoint> {
        endpoint::candidates(
            &ResolverInputs::from_config(&self.config),
            &self.config.summary.path,
        )
    }

    /// Load a plain-text file as the upload source.
    pub async fn load_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if !is_txt {
            self.notify(NoticeLevel::Warning, UNSUPPORTED_FILE_NOTICE);
            return Err(SessionError::UnsupportedFile(path.display().to_string()));
        }

        let read = {
            let _in_flight = InFlight::raise(&self.processing_file);
            tokio::fs::read_to_string(path).await
        };

        match read {
            Ok(text) => {
                debug!(path = %path.display(), chars = text.len(), "Loaded upload");
                self.state.uploaded_text = text;
                self.state.source = Source::Upload;
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Error processing file: {e}"));
                Err(e.into())
            }
        }
    }

    /// Summarise the active source and store the formatted result.
    pub async fn summarize(&mut self) -> Result<(), SessionError> {
        let request = match SummarizeRequest::new(
            self.state.active_text(),
            Some(self.state.custom_prompt.as_str()),
            &self.config.summary.default_instruction,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.notify(NoticeLevel::Warning, EMPTY_TEXT_NOTICE);
                return Err(e.into());
            }
        };
        let candidates = self.candidates();

        let result = {
            let _in_flight = InFlight::raise(&self.generating);
            client::request_summary(
                &self.transport,
                &candidates,
                &request,
                self.config.summary.timeout(),
            )
            .await
        };

        match result {
            Ok(summary) => {
                let (markup, html) = summary.into_parts();
                self.state.summary = html;
                self.state.summary_markup = Some(markup);
                self.notify(NoticeLevel::Success, SUMMARY_SUCCESS_NOTICE);
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Failed to generate summary: {e}"));
                Err(e.into())
            }
        }
    }

    /// Relay the current summary to the entered recipients.
    ///
    /// Clears the recipients on success.
    pub async fn share_via_email(&mut self) -> Result<(), SessionError> {
        let request = match EmailRequest::new(
            self.state.email_recipients.as_str(),
            self.state.summary.as_str(),
            self.config.email.subject.as_str(),
        ) {
            Ok(request) => request,
            Err(e) => {
                self.notify(NoticeLevel::Warning, EMAIL_INPUT_NOTICE);
                return Err(e.into());
            }
        };
        let endpoint = Endpoint::parse(&self.config.email.endpoint);

        let result = {
            let _in_flight = InFlight::raise(&self.sending_email);
            email::send_summary_email(&self.transport, &endpoint, &request).await
        };

        match result {
            Ok(()) => {
                self.state.email_recipients.clear();
                self.notify(NoticeLevel::Success, EMAIL_SUCCESS_NOTICE);
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Failed to send email: {e}"));
                Err(e.into())
            }
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }
}
