//! Periodic self-ping.
//!
//! Fires one outbound GET on a fixed interval to keep the hosting platform
//! from idling the service out. Failures are logged and dropped; there is no
//! retry, no backoff, and no coupling to request handling.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const PING_URL: &str = "https://customer-data-check.onrender.com/";
const PING_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct Pinger {
    url: String,
    interval: Duration,
    client: reqwest::Client,
}

impl Pinger {
    pub fn new() -> Self {
        Self::with_target(PING_URL.to_string(), PING_INTERVAL)
    }

    pub fn with_target(url: String, interval: Duration) -> Self {
        Self {
            url,
            interval,
            client: reqwest::Client::new(),
        }
    }

    /// Spawn the ping loop. The first ping fires one full interval after
    /// startup; the loop runs until the token is cancelled.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            // The first tick completes immediately; consume it so pings are
            // spaced one interval from startup.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("Pinger shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.client.get(&self.url).send().await {
                            Ok(response) => {
                                tracing::info!(url = %self.url, status = %response.status(), "Self ping");
                            }
                            Err(e) => {
                                tracing::warn!(url = %self.url, "Ping failed: {}", e);
                            }
                        }
                    }
                }
            }
        })
    }
}

impl Default for Pinger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn pinger_hits_target_on_interval_and_stops_on_cancel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let accepted = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                .await
                .ok();
        });

        let shutdown = CancellationToken::new();
        let pinger = Pinger::with_target(
            format!("http://{}/", addr),
            Duration::from_millis(20),
        );
        let handle = pinger.spawn(shutdown.clone());

        // The target sees a request within a few intervals.
        tokio::time::timeout(Duration::from_secs(5), accepted)
            .await
            .expect("pinger never reached target")
            .expect("accept task failed");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("pinger did not stop on cancel")
            .expect("pinger task panicked");
    }
}
