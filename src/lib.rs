//! # Tersify
//!
//! Summarise text through a hosted LLM summarisation endpoint and relay the
//! result by email.
//!
//! ## Features
//!
//! - **Endpoint fallback**: tries an ordered list of candidate URLs, moving on
//!   only when a candidate answers 404
//! - **Safe formatting**: provider markdown (`**bold**`, `*italic*`, newlines)
//!   is parsed into a typed tree and rendered with escaping
//! - **Session controller**: owns input, summary and in-flight state so any
//!   front end can drive it
//!
//! ```no_run
//! use tersify::{Config, HttpTransport, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tersify::setup_logging(0);
//!
//!     let config = Config::load()?;
//!     let transport = HttpTransport::new(config.origin()?)?;
//!     let mut session = Session::new(transport, config);
//!
//!     session.set_source(tersify::Source::Text);
//!     session.set_input_text("A long article...");
//!     session.summarize().await?;
//!     println!("{}", session.state().summary);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod email;
pub mod endpoint;
pub mod format;
pub mod session;
pub mod summary;
pub mod transport;

pub use client::{request_summary, SummaryError};
pub use config::Config;
pub use email::{send_summary_email, EmailError, EmailRequest};
pub use endpoint::{Endpoint, ResolverInputs};
pub use format::{format_summary, Markup};
pub use session::{Notice, NoticeLevel, Session, SessionError, Source};
pub use summary::{FormattedSummary, SummarizeRequest};
pub use transport::{HttpReply, HttpTransport, Transport, TransportError};

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace). Calling it twice is harmless.
pub fn setup_logging(verbosity: u8) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tersify={default_level}")));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
