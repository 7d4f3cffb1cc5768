//! albawatch CLI
//!
//! Watches a campus board for part-time job listings and relays new posts
//! to a Telegram channel.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use albawatch::{
    config::{apply_env_overrides, telegram_from_env},
    error::Result,
    models::Config,
    pipeline::{run_loop, run_tick},
    services::{Fetcher, TelegramNotifier},
    storage::SeenStore,
    utils::http,
};

/// albawatch - Campus Part-Time-Job Board Notifier
#[derive(Parser, Debug)]
#[command(
    name = "albawatch",
    version,
    about = "Campus part-time-job board notifier"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "albawatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the board until interrupted
    Run,

    /// Run a single fetch-notify cycle and exit
    Tick,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    apply_env_overrides(&mut config);
    config.validate()?;

    if let Command::Validate = cli.command {
        log::info!("Configuration OK ({})", cli.config.display());
        return Ok(());
    }

    let telegram = telegram_from_env().map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    let config = Arc::new(config);
    let fetcher = Fetcher::new(Arc::clone(&config))?;
    let notifier = TelegramNotifier::new(
        http::create_notify_client(&config.http)?,
        telegram.bot_token,
        telegram.chat_id,
        config.board.post_url_base.clone(),
    );
    let mut seen = SeenStore::load(&config.board.state_file).await;

    match cli.command {
        Command::Run => {
            log::info!("albawatch starting (board {})", config.board.board_id);
            run_loop(&config, &fetcher, &notifier, &mut seen).await?;
        }
        Command::Tick => {
            let outcome = run_tick(&config, &fetcher, &notifier, &mut seen).await?;
            log::info!(
                "Tick: {} fetched, {} matched, {} new, {} notified ({} failed)",
                outcome.fetched,
                outcome.matched,
                outcome.new_count,
                outcome.notified,
                outcome.notify_failures
            );
        }
        Command::Validate => unreachable!(),
    }

    Ok(())
}
