//! Session-gated polling for alerts, news, broadcasts, and the maintenance
//! flag.
//!
//! Runs only while a session is established. `start` is idempotent; `stop`
//! cancels the poll timer and also stops the command router, since both
//! constitute being an active session. A failed poll is logged and the loop
//! keeps going.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use framehub_core::protocol::commands::Toast;

use crate::collab::{OverlayController, PortalBackend, WorkspaceController};
use crate::config::schema::HeartbeatSection;
use crate::dispatch::CommandRouter;
use crate::session::Session;
use crate::shell::HostShell;
use crate::telemetry::TelemetrySink;

/// What one poll sends: who is asking plus everything already seen, so the
/// backend only returns genuinely new items.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatQuery {
    pub user_id: i64,
    pub known_alert_ids: Vec<String>,
    pub known_article_ids: Vec<String>,
}

/// What one poll returns. Business payloads stay opaque to this core; only
/// identity (for dedup) and display text are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeartbeatDelta {
    #[serde(default)]
    pub alerts: Vec<AlertItem>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub broadcasts: Vec<BroadcastItem>,
    #[serde(default)]
    pub maintenance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertItem {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastItem {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct KnownItems {
    alert_ids: Vec<String>,
    article_ids: Vec<String>,
    broadcast_ids: Vec<String>,
}

pub struct HeartbeatLoop {
    cfg: HeartbeatSection,
    session: Session,
    maintenance_url: String,
    backend: Arc<dyn PortalBackend>,
    workspace: Arc<dyn WorkspaceController>,
    overlay: Arc<dyn OverlayController>,
    shell: Arc<dyn HostShell>,
    router: Arc<CommandRouter>,
    telemetry: Arc<dyn TelemetrySink>,
    known: StdMutex<KnownItems>,
    running: Mutex<Option<JoinHandle<()>>>,
}

impl HeartbeatLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cfg: HeartbeatSection,
        session: Session,
        maintenance_url: String,
        backend: Arc<dyn PortalBackend>,
        workspace: Arc<dyn WorkspaceController>,
        overlay: Arc<dyn OverlayController>,
        shell: Arc<dyn HostShell>,
        router: Arc<CommandRouter>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            cfg,
            session,
            maintenance_url,
            backend,
            workspace,
            overlay,
            shell,
            router,
            telemetry,
            known: StdMutex::new(KnownItems::default()),
            running: Mutex::new(None),
        }
    }

    /// Start polling. A second call while running is a no-op: exactly one
    /// timer exists at a time.
    pub async fn start(self: &Arc<Self>) {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("heartbeat already running");
            return;
        }
        let this = Arc::clone(self);
        *running = Some(tokio::spawn(async move { this.poll_loop().await }));
        debug!(interval_ms = self.cfg.interval_ms, "heartbeat started");
    }

    /// Stop polling and stop the command router with it.
    pub async fn stop(&self) {
        {
            let mut running = self.running.lock().await;
            if let Some(handle) = running.take() {
                handle.abort();
                debug!("heartbeat stopped");
            } else {
                debug!("heartbeat already stopped");
            }
        }
        self.router.stop().await;
    }

    async fn poll_loop(self: Arc<Self>) {
        let mut tick = tokio::time::interval(Duration::from_millis(self.cfg.interval_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let query = self.build_query();
            match self.backend.poll_updates(query).await {
                Ok(delta) => {
                    self.telemetry.heartbeat_poll(true);
                    if !self.apply(delta).await {
                        // Maintenance accepted; the page is navigating away.
                        return;
                    }
                }
                Err(e) => {
                    self.telemetry.heartbeat_poll(false);
                    warn!(error = %e, "heartbeat poll failed");
                }
            }
        }
    }

    fn build_query(&self) -> HeartbeatQuery {
        let known = self.known.lock().unwrap_or_else(PoisonError::into_inner);
        HeartbeatQuery {
            user_id: self.session.user_id,
            known_alert_ids: known.alert_ids.clone(),
            known_article_ids: known.article_ids.clone(),
        }
    }

    /// Merge a poll result into known state and fan notifications out.
    /// Returns `false` when polling must stop (maintenance accepted).
    async fn apply(&self, delta: HeartbeatDelta) -> bool {
        let mut fresh_alerts = 0usize;
        let mut fresh_news = 0usize;
        let mut fresh_broadcasts = Vec::new();
        {
            let mut known = self.known.lock().unwrap_or_else(PoisonError::into_inner);
            for alert in delta.alerts {
                if !known.alert_ids.contains(&alert.id) {
                    known.alert_ids.push(alert.id);
                    fresh_alerts += 1;
                }
            }
            for article in delta.news {
                if !known.article_ids.contains(&article.id) {
                    known.article_ids.push(article.id);
                    fresh_news += 1;
                }
            }
            for broadcast in delta.broadcasts {
                if !known.broadcast_ids.contains(&broadcast.id) {
                    known.broadcast_ids.push(broadcast.id.clone());
                    fresh_broadcasts.push(broadcast);
                }
            }
        }

        if fresh_alerts > 0 {
            debug!(count = fresh_alerts, "heartbeat found new alerts");
            if let Err(e) = self.workspace.refresh_desktop_menu().await {
                warn!(error = %e, "desktop menu refresh failed");
            }
        }
        if fresh_news > 0 {
            debug!(count = fresh_news, "heartbeat found new articles");
            if let Err(e) = self.workspace.refresh_news().await {
                warn!(error = %e, "news refresh failed");
            }
        }
        for broadcast in fresh_broadcasts {
            let toast = Toast {
                message: broadcast.message,
                icon: None,
                color: None,
                timer: None,
            };
            if let Err(e) = self.overlay.show_toast(&toast).await {
                warn!(error = %e, "broadcast toast failed");
            }
        }

        if delta.maintenance {
            info!("backend flagged maintenance mode");
            if self.overlay.confirm_maintenance().await {
                info!(url = %self.maintenance_url, "leaving for maintenance page");
                self.shell.navigate_top(&self.maintenance_url);
                return false;
            }
        }
        true
    }
}
