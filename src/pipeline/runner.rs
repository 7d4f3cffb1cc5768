//! Long-running poll loop.
//!
//! State machine: Starting → Polling → (Idle | Notifying) → Sleeping →
//! Polling, with ErrorBackoff on an unclassified tick error and a clean
//! stop on Ctrl-C.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::run_tick;
use crate::services::{Fetcher, TelegramNotifier};
use crate::storage::SeenStore;

enum LoopState {
    Polling,
    Sleeping,
    ErrorBackoff,
}

/// Run the polling loop until interrupted.
pub async fn run_loop(
    config: &Config,
    fetcher: &Fetcher,
    notifier: &TelegramNotifier,
    seen: &mut SeenStore,
) -> Result<()> {
    // Startup announcement is best-effort.
    if let Err(e) = notifier.send_startup().await {
        log::warn!("Startup notification failed: {}", e);
    }

    let interval = Duration::from_secs(config.poller.check_interval_secs);
    let backoff = Duration::from_secs(config.poller.error_backoff_secs);
    log::info!(
        "Polling every {}s, backing off {}s on errors",
        interval.as_secs(),
        backoff.as_secs()
    );

    let mut shutdown = shutdown_signal();
    let mut state = LoopState::Polling;

    loop {
        match state {
            LoopState::Polling => {
                state = match run_tick(config, fetcher, notifier, seen).await {
                    Ok(outcome) => {
                        if outcome.new_count > 0 {
                            log::info!(
                                "Tick: {} fetched, {} matched, {} new, {} notified ({} failed)",
                                outcome.fetched,
                                outcome.matched,
                                outcome.new_count,
                                outcome.notified,
                                outcome.notify_failures
                            );
                        } else {
                            log::info!("Tick: {} fetched, nothing new", outcome.fetched);
                        }
                        LoopState::Sleeping
                    }
                    Err(e) => {
                        log::error!("Tick failed: {}. Retrying after backoff.", e);
                        LoopState::ErrorBackoff
                    }
                };
                if *shutdown.borrow() {
                    break;
                }
            }
            LoopState::Sleeping => {
                if sleep_or_shutdown(interval, &mut shutdown).await {
                    break;
                }
                state = LoopState::Polling;
            }
            LoopState::ErrorBackoff => {
                if sleep_or_shutdown(backoff, &mut shutdown).await {
                    break;
                }
                state = LoopState::Polling;
            }
        }
    }

    log::info!("Interrupt received, stopping.");
    Ok(())
}

/// Watch channel flipped to true on the first Ctrl-C.
fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    rx
}

/// Sleep for the given duration, returning true when shutdown was
/// requested before it elapsed.
async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.changed() => true,
    }
}
