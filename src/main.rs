//! Tersify CLI - summarise text and relay it by email
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use tersify::{Config, HttpTransport, NoticeLevel, Session, Source};

#[derive(Parser)]
#[command(name = "tersify")]
#[command(author, version, about = "Summarise text through a hosted LLM and share it by email", long_about = None)]
struct Cli {
    /// Path to a tersify.toml to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a .txt file, inline text, or stdin
    Summarise {
        /// Plain-text file to summarise
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Text to summarise
        #[arg(long)]
        text: Option<String>,
        /// Custom instruction for the model
        #[arg(long)]
        prompt: Option<String>,
        /// Print the HTML markup instead of terminal formatting
        #[arg(long)]
        html: bool,
        /// Open the summary in $EDITOR before printing or sending
        #[arg(long)]
        edit: bool,
        /// Comma-separated recipients to email the summary to
        #[arg(long)]
        email: Option<String>,
        /// Do not ask for confirmation before sending
        #[arg(long, short)]
        yes: bool,
    },
    /// Email an existing summary file
    Email {
        /// Comma-separated recipients
        #[arg(long)]
        to: String,
        /// File holding the summary markup
        #[arg(long)]
        file: PathBuf,
    },
    /// Show the summary endpoints that would be tried, in order
    Endpoints,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tersify::setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Summarise {
            file,
            text,
            prompt,
            html,
            edit,
            email,
            yes,
        } => {
            let mut session = new_session(config)?;

            match (file, text) {
                (Some(path), _) => {
                    let loaded = session.load_file(&path).await;
                    print_notices(&mut session);
                    exit_on_failure(loaded);
                }
                (None, Some(text)) => {
                    session.set_source(Source::Text);
                    session.set_input_text(text);
                }
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    session.set_source(Source::Text);
                    session.set_input_text(buf);
                }
            }
            if let Some(prompt) = prompt {
                session.set_custom_prompt(prompt);
            }

            eprintln!("{}", "Generating summary...".dimmed());
            let summarised = session.summarize().await;
            print_notices(&mut session);
            exit_on_failure(summarised);

            if edit {
                let edited = edit::edit(&session.state().summary)
                    .context("failed to open editor")?;
                session.edit_summary(edited.trim_end());
            }

            print_summary(&session, html);

            if let Some(recipients) = email {
                if !yes && atty::is(atty::Stream::Stdin) {
                    let confirmed = dialoguer::Confirm::new()
                        .with_prompt(format!("Send summary to {recipients}?"))
                        .default(true)
                        .interact()?;
                    if !confirmed {
                        return Ok(());
                    }
                }
                session.set_email_recipients(recipients);
                let sent = session.share_via_email().await;
                print_notices(&mut session);
                exit_on_failure(sent);
            }
        }
        Commands::Email { to, file } => {
            let summary = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mut session = new_session(config)?;
            session.edit_summary(summary);
            session.set_email_recipients(to);
            let sent = session.share_via_email().await;
            print_notices(&mut session);
            exit_on_failure(sent);
        }
        Commands::Endpoints => {
            let session = new_session(config)?;
            println!(
                "Mode: {}  Origin: {}\n",
                session.config().runtime.mode,
                session.transport().origin()
            );
            for (i, endpoint) in session.candidates().iter().enumerate() {
                println!("  {}. {}", i + 1, endpoint);
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn new_session(config: Config) -> anyhow::Result<Session<HttpTransport>> {
    let transport = HttpTransport::new(config.origin()?)?;
    Ok(Session::new(transport, config))
}

/// Print the summary for the terminal, or as markup when asked or edited
fn print_summary<T>(session: &Session<T>, html: bool)
where
    T: tersify::Transport,
{
    let state = session.state();
    match (&state.summary_markup, html) {
        (Some(markup), false) => println!("\n{}\n", markup.to_terminal()),
        _ => println!("{}", state.summary),
    }
}

fn print_notices<T>(session: &mut Session<T>)
where
    T: tersify::Transport,
{
    for notice in session.take_notices() {
        let line = match notice.level {
            NoticeLevel::Success => format!("✅ {}", notice.message).green(),
            NoticeLevel::Warning => format!("⚠️  {}", notice.message).yellow(),
            NoticeLevel::Error => format!("❌ {}", notice.message).red(),
        };
        eprintln!("{line}");
    }
}

/// The failure was already shown as a notice, so exit without repeating it
fn exit_on_failure<E: std::fmt::Display>(outcome: Result<(), E>) {
    if let Err(e) = outcome {
        tracing::debug!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
