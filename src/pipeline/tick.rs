//! One polling cycle: fetch, filter, dedup, notify, persist.

use std::time::Duration;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::partition_new;
use crate::services::{Fetcher, TelegramNotifier};
use crate::storage::SeenStore;

/// Summary of one tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Listings the source returned
    pub fetched: usize,
    /// Listings passing the filter policy
    pub matched: usize,
    /// Listings not present in the seen-set
    pub new_count: usize,
    /// Notifications delivered
    pub notified: usize,
    /// Notifications that failed (logged, not retried)
    pub notify_failures: usize,
}

/// Run a single fetch-filter-dedup-notify-persist cycle.
///
/// The seen-set is persisted only when the tick produced new entries; an
/// idle tick leaves the file untouched.
pub async fn run_tick(
    config: &Config,
    fetcher: &Fetcher,
    notifier: &TelegramNotifier,
    seen: &mut SeenStore,
) -> Result<TickOutcome> {
    let mut outcome = TickOutcome::default();

    let listings = fetcher.fetch().await;
    outcome.fetched = listings.len();

    let matched: Vec<_> = listings
        .into_iter()
        .filter(|l| config.filter.matches(l))
        .collect();
    outcome.matched = matched.len();

    let fresh = partition_new(matched, seen);
    outcome.new_count = fresh.len();

    let pacing = Duration::from_secs(config.http.notify_delay_secs);
    for (i, listing) in fresh.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
        match notifier.notify_listing(listing).await {
            Ok(()) => {
                outcome.notified += 1;
                log::info!("Notified: {}", listing.title);
            }
            Err(e) => {
                outcome.notify_failures += 1;
                log::warn!("Failed to notify '{}': {}", listing.title, e);
            }
        }
    }

    if !fresh.is_empty() {
        seen.save().await?;
        log::debug!("Seen-set persisted ({} keys)", seen.len());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::utils::http;

    const ARTICLES_BODY: &str = r#"{"articles":[
        {"id":101,"title":"주말 아르바이트 A"},
        {"id":102,"title":"주말 아르바이트 B"}
    ]}"#;

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).into_owned();
                let mut content_length = 0;
                for line in headers.lines() {
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
                if buf.len() >= pos + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    /// Serve the board API and the messaging endpoint from one local
    /// listener. The first sendMessage call gets a 500, later ones
    /// succeed.
    async fn spawn_board_and_sink() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let send_calls = AtomicUsize::new(0);
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let request = read_request(&mut stream).await;
                let response = if request.starts_with("GET /articles") {
                    http_response("200 OK", ARTICLES_BODY)
                } else if send_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    http_response("500 Internal Server Error", "")
                } else {
                    http_response("200 OK", r#"{"ok":true}"#)
                };
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_notify_failure_does_not_block_batch() {
        let tmp = TempDir::new().unwrap();
        let state_path = tmp.path().join("seen_posts.json");
        let addr = spawn_board_and_sink().await;

        let mut config = Config::default();
        config.board.api_url = format!("http://{}/articles", addr);
        config.board.state_file = state_path.display().to_string();
        config.http.notify_delay_secs = 0;

        let config = Arc::new(config);
        let fetcher = Fetcher::new(Arc::clone(&config)).unwrap();
        let notifier = TelegramNotifier::new(
            http::create_notify_client(&config.http).unwrap(),
            "test-token",
            "test-chat",
            "https://koreatech.in/board",
        )
        .with_api_base(format!("http://{}", addr));
        let mut seen = SeenStore::load(&state_path).await;

        let outcome = run_tick(&config, &fetcher, &notifier, &mut seen)
            .await
            .unwrap();

        // The failed delivery is logged and skipped; the second entry is
        // still notified and both keys end up persisted.
        assert_eq!(outcome.fetched, 2);
        assert_eq!(outcome.new_count, 2);
        assert_eq!(outcome.notified, 1);
        assert_eq!(outcome.notify_failures, 1);

        let reloaded = SeenStore::load(&state_path).await;
        assert!(reloaded.contains("101"));
        assert!(reloaded.contains("102"));
    }

    #[tokio::test]
    async fn test_unreachable_board_yields_idle_tick() {
        let tmp = TempDir::new().unwrap();
        let state_path = tmp.path().join("seen_posts.json");

        let mut config = Config::default();
        // Nothing listens on the discard port, so both adapters fail fast
        // and the tick degrades to an empty batch.
        config.board.api_url = "http://127.0.0.1:9/articles".to_string();
        config.board.page_url = "http://127.0.0.1:9/board/job".to_string();
        config.http.fetch_timeout_secs = 1;
        config.board.state_file = state_path.display().to_string();

        let config = Arc::new(config);
        let fetcher = Fetcher::new(Arc::clone(&config)).unwrap();
        let notifier = TelegramNotifier::new(
            http::create_notify_client(&config.http).unwrap(),
            "test-token",
            "test-chat",
            "https://koreatech.in/board",
        );
        let mut seen = SeenStore::load(&state_path).await;

        let outcome = run_tick(&config, &fetcher, &notifier, &mut seen)
            .await
            .unwrap();

        assert_eq!(outcome.fetched, 0);
        assert_eq!(outcome.new_count, 0);
        assert_eq!(outcome.notified, 0);
        assert!(seen.is_empty());
        assert!(!state_path.exists());
    }
}
