//! Candidate endpoint resolution.
//!
//! Hosting setups disagree about trailing slashes and about whether the API
//! lives on the configured base URL or on the serving origin, so a request is
//! tried against an ordered list of variants.

use crate::config::{Config, RuntimeMode, LOCAL_BASE_URL};
use std::fmt;
use url::Url;

/// One URL variant to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Fully qualified URL
    Absolute(String),
    /// Path resolved against the serving origin
    Relative(String),
}

impl Endpoint {
    /// Build from a string, absolute if it carries a scheme
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Endpoint::Absolute(s.to_string())
        } else {
            Endpoint::Relative(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Endpoint::Absolute(s) | Endpoint::Relative(s) => s,
        }
    }

    /// Concrete URL for this endpoint
    pub fn resolve(&self, origin: &Url) -> Result<Url, url::ParseError> {
        match self {
            Endpoint::Absolute(s) => Url::parse(s),
            Endpoint::Relative(path) => origin.join(path),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment inputs the candidate list depends on
#[derive(Debug, Clone, Default)]
pub struct ResolverInputs {
    pub mode: RuntimeMode,
    pub api_url: Option<String>,
    pub site_url: Option<String>,
}

impl ResolverInputs {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.runtime.mode,
            api_url: config.runtime.api_url.clone(),
            site_url: config.runtime.site_url.clone(),
        }
    }

    /// Base URL for the absolute candidates. Blank overrides count as unset.
    pub fn base_url(&self) -> String {
        let base = match self.mode {
            RuntimeMode::Development => LOCAL_BASE_URL,
            RuntimeMode::Production => [&self.api_url, &self.site_url]
                .into_iter()
                .flatten()
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .unwrap_or(LOCAL_BASE_URL),
        };
        base.trim_end_matches('/').to_string()
    }
}

/// Ordered candidates for `path`, most specific first, ending with the bare
/// relative path.
pub fn candidates(inputs: &ResolverInputs, path: &str) -> Vec<Endpoint> {
    let path = format!("/{}", path.trim_matches('/'));
    let base = inputs.base_url();

    vec![
        Endpoint::Absolute(format!("{base}{path}/")),
        Endpoint::Absolute(format!("{base}{path}")),
        Endpoint::Relative(format!("{path}/")),
        Endpoint::Relative(path),
    ]
}
