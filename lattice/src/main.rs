//! Lattice - goal analysis and strategy synthesis
//!
//! CLI entry point: the interactive UI by default, batch commands otherwise.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use lattice::cli::{Cli, Command, KeyCommand, OutputFormat, generate_after_help};
use lattice::clients::Advisor;
use lattice::config::Config;
use lattice::credential::{Credential, CredentialStore, FileCredentialStore};
use lattice::report;
use lattice::session::{Screen, SessionController};
use lattice::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lattice")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("lattice.log")).context("Failed to create log file")?;

    // The TUI owns the terminal, so logs only ever go to the file
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, "Lattice loaded config");

    let store = FileCredentialStore::new(config.storage.credential_path());

    // Command's Debug output would include a raw key for `key set`
    debug!(has_command = cli.command.is_some(), "main: dispatching command");
    match cli.command {
        Some(Command::Analyze { goal, format }) => cmd_analyze(&config, store, &goal, format).await,
        Some(Command::Strategize { goal, format }) => cmd_strategize(&config, store, &goal, format).await,
        Some(Command::Key { command }) => cmd_key(store, command),
        None => cmd_tui(&config, store).await,
    }
}

/// Launch the interactive UI
async fn cmd_tui(config: &Config, store: FileCredentialStore) -> Result<()> {
    let advisor = Advisor::from_config(config)?;
    let session = SessionController::start(Box::new(store));
    tui::run(advisor, session).await
}

/// Start a session for a batch command, which needs a saved key
fn batch_session(store: FileCredentialStore) -> Result<SessionController> {
    let path = store.path().to_path_buf();
    let session = SessionController::start(Box::new(store));
    if session.screen() == Screen::AwaitingCredential {
        let detail = session
            .state()
            .error_message()
            .map(|e| format!(" ({})", e))
            .unwrap_or_default();
        return Err(eyre!(
            "No API key saved at {}{}. Run `lattice key set <KEY>` first.",
            path.display(),
            detail
        ));
    }
    Ok(session)
}

async fn cmd_analyze(config: &Config, store: FileCredentialStore, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(%goal, %format, "cmd_analyze: called");
    let advisor = Advisor::from_config(config)?;
    let mut session = batch_session(store)?;

    session.submit_goal(&advisor, goal).await?;
    let state = session.state();
    let analysis = state.analysis().ok_or_else(|| eyre!("Analysis finished without a result"))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
        OutputFormat::Text => print!("{}", report::analysis_text(state.goal_text(), analysis)),
    }
    Ok(())
}

async fn cmd_strategize(config: &Config, store: FileCredentialStore, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(%goal, %format, "cmd_strategize: called");
    let advisor = Advisor::from_config(config)?;
    let mut session = batch_session(store)?;

    session.submit_goal(&advisor, goal).await?;
    session.generate_strategies(&advisor).await?;

    let state = session.state();
    let analysis = state.analysis().ok_or_else(|| eyre!("Analysis finished without a result"))?;
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "goal": state.goal_text(),
                "analysis": analysis,
                "strategies": state.strategies(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            print!("{}", report::analysis_text(state.goal_text(), analysis));
            print!("{}", report::strategies_text(state.strategies()));
        }
    }
    Ok(())
}

fn cmd_key(mut store: FileCredentialStore, command: KeyCommand) -> Result<()> {
    debug!("cmd_key: called");
    match command {
        KeyCommand::Set { key } => {
            let credential = Credential::new(key)?;
            store.save(&credential)?;
            println!("API key {} saved to {}", credential, store.path().display());
        }
        KeyCommand::Show => match store.load()? {
            Some(credential) => println!("{}", credential),
            None => println!("No API key saved."),
        },
        KeyCommand::Clear => {
            store.clear()?;
            println!("API key removed.");
        }
    }
    Ok(())
}
