use std::time::Duration;

use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::api::sse::SseParser;

use super::SyncEvent;

/// Default delay before reopening a dropped event stream
pub const RETRY_DELAY: Duration = Duration::from_secs(3);
/// Floor for the server's `retry:` hint
pub const MIN_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Connection status shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "live",
            ConnectionStatus::Disconnected => "offline",
        }
    }
}

/// Transport lifecycle events reported by the channel task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    /// Stream opened
    Opened,
    /// Server signalled that something changed
    Update,
    /// Stream failed or closed
    Failed(String),
    /// A new connection attempt is starting
    Reconnecting,
}

/// Status tracker driven only by real lifecycle events.
#[derive(Debug, Clone)]
pub struct LiveStatus {
    status: ConnectionStatus,
    last_error: Option<String>,
    updates: u64,
}

impl Default for LiveStatus {
    fn default() -> Self {
        LiveStatus {
            status: ConnectionStatus::Connecting,
            last_error: None,
            updates: 0,
        }
    }
}

impl LiveStatus {
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of update signals received
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Apply an event; returns true when a refetch-all should fire.
    pub fn apply(&mut self, event: &LiveEvent) -> bool {
        match event {
            LiveEvent::Opened => {
                self.status = ConnectionStatus::Connected;
                self.last_error = None;
                false
            }
            LiveEvent::Update => {
                self.status = ConnectionStatus::Connected;
                self.updates += 1;
                true
            }
            LiveEvent::Failed(reason) => {
                self.status = ConnectionStatus::Disconnected;
                self.last_error = Some(reason.clone());
                false
            }
            LiveEvent::Reconnecting => {
                self.status = ConnectionStatus::Connecting;
                false
            }
        }
    }
}

/// A running event-stream subscription. Dropping it tears the stream down.
pub struct LiveChannel {
    task: JoinHandle<()>,
}

impl LiveChannel {
    /// Subscribe on `runtime`, forwarding lifecycle events to `tx`.
    pub fn spawn(
        runtime: &Handle,
        api: ApiClient,
        retry: Duration,
        tx: UnboundedSender<SyncEvent>,
    ) -> Self {
        let task = runtime.spawn(run_channel(api, retry, tx));
        LiveChannel { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_channel(api: ApiClient, retry: Duration, tx: UnboundedSender<SyncEvent>) {
    let send = |event: LiveEvent| tx.send(SyncEvent::Live(event)).is_ok();
    let mut first = true;

    loop {
        if !first && !send(LiveEvent::Reconnecting) {
            return;
        }
        first = false;

        let mut parser = SseParser::new();
        let reason = match api.open_events().await {
            Ok(response) => {
                tracing::info!("event stream connected");
                if !send(LiveEvent::Opened) {
                    return;
                }
                let mut body = response.bytes_stream();
                let mut reason = "event stream closed by server".to_string();
                while let Some(chunk) = body.next().await {
                    match chunk {
                        Ok(bytes) => {
                            for event in parser.feed(&bytes) {
                                if event.is_update() && !send(LiveEvent::Update) {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            reason = e.to_string();
                            break;
                        }
                    }
                }
                reason
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(%reason, "event stream lost, will reconnect");
        if !send(LiveEvent::Failed(reason)) {
            return;
        }
        tokio::time::sleep(retry_delay(parser.retry(), retry)).await;
    }
}

fn retry_delay(hint: Option<Duration>, default: Duration) -> Duration {
    hint.unwrap_or(default).max(MIN_RETRY_DELAY)
}
