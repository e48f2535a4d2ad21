//! Client core: the channel reader task and request/response correlation.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use framehub_core::error::{FrameHubError, Result};
use framehub_core::protocol::commands;
use framehub_core::Envelope;

/// The widget's end of the channel pair the embedder wired to the host.
pub struct HostLink {
    pub to_host: mpsc::Sender<String>,
    pub from_host: mpsc::Receiver<String>,
}

#[derive(Debug, Clone)]
pub struct WidgetClientConfig {
    /// Bound on every request/response wait. A response that never arrives
    /// resolves the caller with `RpcTimeout` instead of hanging.
    pub reply_timeout_ms: u64,
    /// Capacity of the non-correlated host push queue.
    pub event_queue: usize,
}

impl Default for WidgetClientConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 10_000,
            event_queue: 64,
        }
    }
}

/// Host pushes that are not RPC responses (reloads, config updates).
pub struct WidgetEvents {
    rx: mpsc::Receiver<Envelope>,
}

impl WidgetEvents {
    pub async fn next(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }
}

/// Frame-side protocol client. One per embedded widget instance.
pub struct WidgetClient {
    guid: String,
    to_host: mpsc::Sender<String>,
    pending: Arc<DashMap<String, oneshot::Sender<Envelope>>>,
    reply_timeout: Duration,
    reader: JoinHandle<()>,
}

impl WidgetClient {
    /// Wire the client to the host channel. Spawns the reader task that
    /// routes correlated responses to their waiting callers and everything
    /// else into the returned `WidgetEvents` stream.
    pub fn attach(
        guid: impl Into<String>,
        link: HostLink,
        config: WidgetClientConfig,
    ) -> (Self, WidgetEvents) {
        let pending: Arc<DashMap<String, oneshot::Sender<Envelope>>> = Arc::new(DashMap::new());
        let (event_tx, event_rx) = mpsc::channel(config.event_queue);
        let reader = tokio::spawn(read_loop(link.from_host, Arc::clone(&pending), event_tx));
        (
            Self {
                guid: guid.into(),
                to_host: link.to_host,
                pending,
                reply_timeout: Duration::from_millis(config.reply_timeout_ms),
                reader,
            },
            WidgetEvents { rx: event_rx },
        )
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Tear the client down, stopping the reader task.
    pub fn detach(self) {
        self.reader.abort();
    }

    /// Fire-and-forget shape: serialize and enqueue, nothing to wait for.
    pub(crate) async fn send(&self, env: Envelope) -> Result<()> {
        let text = env.to_text()?;
        self.to_host
            .send(text)
            .await
            .map_err(|_| FrameHubError::ChannelClosed)
    }

    /// Request/response shape. The pending entry is installed before the
    /// request is sent, so a response cannot slip past the correlation
    /// map no matter how fast the host answers.
    pub(crate) async fn request<T: Serialize>(
        &self,
        event: &'static str,
        payload: &T,
    ) -> Result<Envelope> {
        let expected = commands::response_event(event).ok_or_else(|| {
            FrameHubError::Internal(format!("{event} has no response event"))
        })?;

        let txn = Uuid::new_v4().to_string();
        let env = Envelope::command(event, payload)?.with_txn(txn.clone());
        let text = env.to_text()?;

        let (tx, rx) = oneshot::channel();
        self.pending.insert(txn.clone(), tx);

        if self.to_host.send(text).await.is_err() {
            self.pending.remove(&txn);
            return Err(FrameHubError::ChannelClosed);
        }

        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(resp)) => {
                if resp.event != expected {
                    return Err(FrameHubError::Internal(format!(
                        "host answered {} where {expected} was expected",
                        resp.event
                    )));
                }
                Ok(resp)
            }
            // Sender dropped without an answer: the reader task is gone.
            Ok(Err(_)) => {
                self.pending.remove(&txn);
                Err(FrameHubError::ChannelClosed)
            }
            Err(_) => {
                self.pending.remove(&txn);
                Err(FrameHubError::RpcTimeout {
                    event: event.to_string(),
                    waited_ms: self.reply_timeout.as_millis() as u64,
                })
            }
        }
    }
}

async fn read_loop(
    mut from_host: mpsc::Receiver<String>,
    pending: Arc<DashMap<String, oneshot::Sender<Envelope>>>,
    events: mpsc::Sender<Envelope>,
) {
    while let Some(text) = from_host.recv().await {
        let env = match Envelope::parse(&text) {
            Ok(env) => env,
            Err(e) => {
                debug!(error = %e, "ignoring unparseable host message");
                continue;
            }
        };
        // A txn marks an RPC response; anything else is a host push.
        if let Some(txn) = env.txn.clone() {
            match pending.remove(&txn) {
                Some((_, tx)) => {
                    if tx.send(env).is_err() {
                        debug!(txn = %txn, "rpc caller gave up before the response arrived");
                    }
                }
                None => debug!(txn = %txn, "dropping uncorrelated response"),
            }
            continue;
        }
        if events.try_send(env).is_err() {
            debug!("widget event queue full or closed; dropping host push");
        }
    }
    // Host side gone: release anyone still waiting so they fail fast
    // instead of running out their timeout.
    pending.clear();
}
