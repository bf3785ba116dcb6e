//! Summary request and response types.

use crate::client::SummaryError;
use crate::format::Markup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated request to summarise some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    text: String,
    instruction: String,
}

impl SummarizeRequest {
    /// Validate the input text and settle the instruction.
    ///
    /// Fails with [`SummaryError::EmptyText`] when `text` is blank. A blank or
    /// missing instruction is replaced by `default_instruction`.
    pub fn new(
        text: impl Into<String>,
        instruction: Option<&str>,
        default_instruction: &str,
    ) -> Result<Self, SummaryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SummaryError::EmptyText);
        }

        let instruction = instruction
            .filter(|i| !i.trim().is_empty())
            .unwrap_or(default_instruction)
            .to_string();

        Ok(Self { text, instruction })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// JSON body for the summarisation handler
    pub fn payload(&self) -> SummaryPayload<'_> {
        SummaryPayload {
            textinput: &self.text,
            custom_prompt: &self.instruction,
        }
    }
}

/// Wire body of a summary request
#[derive(Debug, Serialize)]
pub struct SummaryPayload<'a> {
    pub textinput: &'a str,
    #[serde(rename = "customPrompt")]
    pub custom_prompt: &'a str,
}

/// Wire body of a successful summary response
#[derive(Debug, Deserialize)]
pub struct SummaryReply {
    #[serde(default)]
    pub sendtext: Option<String>,
}

/// Parsed provider text together with its rendered markup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedSummary {
    markup: Markup,
    html: String,
}

impl FormattedSummary {
    /// Format raw provider text
    pub fn from_raw(raw: &str) -> Self {
        let markup = Markup::parse(raw);
        let html = markup.to_html();
        Self { markup, html }
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_parts(self) -> (Markup, String) {
        (self.markup, self.html)
    }
}

impl fmt::Display for FormattedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}
