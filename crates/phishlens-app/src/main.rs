#![warn(missing_docs)]
//! # phishlens binary
//!
//! Terminal entry point for phishlens.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use phishlens_app::{APP_VERSION, AnalysisSession, AppConfig, DEFAULT_ENDPOINT, SubmitOutcome};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "phishlens",
    about = "Submit URLs to a phishing classifier and render its verdicts",
    version = APP_VERSION,
    long_about = None
)]
struct Cli {
    /// Base URL of the classification backend
    #[arg(long, env = "PHISHLENS_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Request timeout in seconds; waits indefinitely when unset
    #[arg(long, env = "PHISHLENS_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Disable ANSI colour output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more URLs in order
    Analyze {
        /// URLs to analyze
        #[arg(required = true)]
        urls: Vec<String>,

        /// Show DNS and site-probe details
        #[arg(long)]
        deep: bool,
    },
    /// Read URLs from stdin, one per line (`:deep` toggles details, `:quit` exits)
    Interactive {
        /// Start with DNS and site-probe details open
        #[arg(long)]
        deep: bool,
    },
    /// Check whether the backend is online
    Health,
}

/// CLI entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let deep = match &cli.command {
        Command::Analyze { deep, .. } | Command::Interactive { deep } => *deep,
        Command::Health => false,
    };
    let config = AppConfig {
        endpoint: cli.endpoint,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        color: !cli.no_color && phishlens_app::color_enabled_from_env(),
        expand_deep_scan: deep,
    };

    let mut session = match config.connect() {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "failed to configure backend");
            eprintln!("phishlens: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Analyze { urls, .. } => run_analyze(&mut session, &config, &urls),
        Command::Interactive { .. } => run_interactive(&mut session, &config),
        Command::Health => run_health(&session),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_analyze(session: &mut AnalysisSession, config: &AppConfig, urls: &[String]) -> ExitCode {
    let mut failed = false;
    for url in urls {
        match analyze_one(session, config, url) {
            SubmitOutcome::Failed(_) => failed = true,
            SubmitOutcome::Presented(_) | SubmitOutcome::Ignored => {}
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn analyze_one(session: &mut AnalysisSession, config: &AppConfig, url: &str) -> SubmitOutcome {
    if !url.trim().is_empty() {
        eprintln!("Scanning {}...", url.trim());
    }

    let outcome = session.submit(url);
    if outcome == SubmitOutcome::Ignored {
        return outcome;
    }

    if config.expand_deep_scan {
        session.expand_deep_scan();
    }
    print!("{}", session.render(config.render_options()));
    outcome
}

fn run_interactive(session: &mut AnalysisSession, config: &AppConfig) -> ExitCode {
    let stdin = io::stdin();
    prompt();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!(error = %err, "stdin read failed");
                return ExitCode::FAILURE;
            }
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":deep" => {
                session.toggle_deep_scan();
                print!("{}", session.render(config.render_options()));
            }
            input => {
                analyze_one(session, config, input);
            }
        }
        prompt();
    }

    ExitCode::SUCCESS
}

fn prompt() {
    print!("url> ");
    let _ = io::stdout().flush();
}

fn run_health(session: &AnalysisSession) -> ExitCode {
    match session.health() {
        Ok(health) => {
            let message = health.message.as_deref().unwrap_or("");
            println!("{} {message}", health.status);
            if health.is_online() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!(error = %err, "health probe failed");
            eprintln!("phishlens: {err}");
            ExitCode::FAILURE
        }
    }
}
