//! framehub loopback harness
//!
//! Runs the host runtime and the widget client SDK back to back on
//! in-process channels: a scripted SSO frame completes the handshake, a
//! scripted backend answers RPCs and heartbeat polls, and one widget
//! client exercises the public command surface before the harness dumps
//! its collected metrics and shuts down.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use framehub::client::{HostLink, WidgetClient, WidgetClientConfig};
use framehub::core::error::Result;
use framehub::core::protocol::commands::{events, HubToken, ModalOptions, Toast, TokenGrant};
use framehub::core::{Envelope, Origin};
use framehub::host::collab::{
    InactivityTimer, OverlayController, PortalBackend, WorkspaceController,
};
use framehub::host::config;
use framehub::host::dispatch::CommandRouter;
use framehub::host::frames::{FrameRegistry, FrameSpec};
use framehub::host::handlers::{standard_table, Collaborators, HostInfo};
use framehub::host::heartbeat::{
    AlertItem, BroadcastItem, HeartbeatDelta, HeartbeatLoop, HeartbeatQuery, NewsItem,
};
use framehub::host::policy::OriginPolicy;
use framehub::host::session::{BootstrapOutcome, EnvironmentState, SessionBootstrapper};
use framehub::host::shell::HostShell;
use framehub::host::telemetry::HostMetrics;

const SSO_ORIGIN: &str = "https://sso.dev.localhost";
const WIDGET_ORIGIN: &str = "https://widgets.dev.localhost";
const PAGE_URL: &str = "https://portal.dev.localhost/hub";

/// Timings are pinned to the low end of their allowed ranges so the whole
/// demo completes in a few seconds.
const DEV_CONFIG: &str = "
version: 1
host:
  name: dev-portal
  api_base_url: https://api.dev.localhost
environment:
  base_url: https://sso.dev.localhost
handshake:
  slow_notice_ms: 1000
  fail_after_ms: 5000
heartbeat:
  interval_ms: 5000
security:
  allowed_origins:
    - https://sso.dev.localhost
    - https://widgets.dev.localhost
";

/// Page shell that answers an SSO mount by playing the endpoint's side of
/// the handshake after a short delay.
struct DevShell {
    sso_to_host: mpsc::Sender<String>,
}

impl HostShell for DevShell {
    fn mount_sso_frame(&self, url: &str) {
        info!(%url, "shell: sso frame mounted");
        let up = self.sso_to_host.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let env = Envelope::command(
                events::AUTH_HUBTOKEN,
                &HubToken {
                    token: Some("dev-hub-token".into()),
                    user_id: 1,
                },
            )
            .expect("hubtoken payload encodes");
            let _ = up.send(env.to_text().expect("hubtoken serializes")).await;
        });
    }

    fn refresh_sso_frame(&self) {
        info!("shell: sso frame refreshed");
    }

    fn navigate_top(&self, url: &str) {
        info!(%url, "shell: top-level navigation");
    }

    fn show_slow_notice(&self) {
        info!("shell: slow handshake notice shown");
    }
}

struct LoggingWorkspace;

#[async_trait]
impl WorkspaceController for LoggingWorkspace {
    async fn spawn_by_name(&self, name: &str) -> Result<()> {
        info!(%name, "workspace: spawn widget by name");
        Ok(())
    }

    async fn spawn_by_guid(&self, guid: &str) -> Result<()> {
        info!(%guid, "workspace: spawn widget by guid");
        Ok(())
    }

    async fn resize_widget(&self, guid: &str, width: u32, height: u32) -> Result<()> {
        info!(%guid, width, height, "workspace: resize widget");
        Ok(())
    }

    async fn rename_widget(&self, guid: &str, name: &str) -> Result<()> {
        info!(%guid, %name, "workspace: rename widget");
        Ok(())
    }

    async fn reload_widget(&self, target: &str, cfg: Option<&Value>) -> Result<()> {
        info!(%target, has_cfg = cfg.is_some(), "workspace: reload widget");
        Ok(())
    }

    async fn reload_app_mode(&self, target: Option<&str>) -> Result<()> {
        info!(?target, "workspace: reload app mode");
        Ok(())
    }

    async fn switch_desktop(&self, desktop_id: &str) -> Result<()> {
        info!(%desktop_id, "workspace: switch desktop");
        Ok(())
    }

    async fn clear_alerts(&self) -> Result<()> {
        info!("workspace: clear alerts");
        Ok(())
    }

    async fn refresh_desktop_menu(&self) -> Result<()> {
        info!("workspace: refresh desktop menu");
        Ok(())
    }

    async fn refresh_news(&self) -> Result<()> {
        info!("workspace: refresh news");
        Ok(())
    }
}

struct LoggingOverlay;

#[async_trait]
impl OverlayController for LoggingOverlay {
    async fn open_modal(&self, url: &str, options: &ModalOptions) -> Result<()> {
        info!(%url, title = ?options.title, "overlay: open modal");
        Ok(())
    }

    async fn open_app_mode(&self, title: &str, url: &str) -> Result<()> {
        info!(%title, %url, "overlay: open app mode");
        Ok(())
    }

    async fn show_share_link(&self, url: &str) -> Result<()> {
        info!(%url, "overlay: share link ready");
        Ok(())
    }

    async fn show_toast(&self, toast: &Toast) -> Result<()> {
        info!(message = %toast.message, "overlay: toast");
        Ok(())
    }

    async fn confirm_maintenance(&self) -> bool {
        info!("overlay: maintenance prompt auto-declined");
        false
    }
}

struct LoggingTimer;

impl InactivityTimer for LoggingTimer {
    fn set_enabled(&self, enabled: bool) {
        info!(enabled, "inactivity timer toggled");
    }

    fn reset(&self) {
        info!("inactivity timer reset");
    }
}

/// Backend stub: fixed token grants and a first heartbeat poll that
/// delivers one of everything.
#[derive(Default)]
struct DevBackend {
    polls: AtomicU64,
}

#[async_trait]
impl PortalBackend for DevBackend {
    async fn issue_widget_token(&self, guid: &str) -> Result<TokenGrant> {
        info!(%guid, "backend: issuing widget token");
        Ok(TokenGrant {
            sso_token: "dev-widget-token".into(),
            domain: "sso.dev.localhost".into(),
        })
    }

    async fn current_user(&self, _guid: &str) -> Result<Value> {
        Ok(json!({ "id": 1, "name": "Dev User", "roles": ["admin"] }))
    }

    async fn create_share_link(&self, guid: &str, _state_json: &str) -> Result<String> {
        Ok(format!("https://portal.dev.localhost/share/{guid}"))
    }

    async fn poll_updates(&self, query: HeartbeatQuery) -> Result<HeartbeatDelta> {
        let first = self.polls.fetch_add(1, Ordering::Relaxed) == 0;
        info!(user = query.user_id, first, "backend: heartbeat poll");
        if !first {
            return Ok(HeartbeatDelta::default());
        }
        Ok(HeartbeatDelta {
            alerts: vec![AlertItem {
                id: "a-1".into(),
                message: "Disk space running low".into(),
            }],
            news: vec![NewsItem {
                id: "n-1".into(),
                title: "Maintenance window on Friday".into(),
            }],
            broadcasts: vec![BroadcastItem {
                id: "b-1".into(),
                message: "Welcome to the dev portal".into(),
            }],
            maintenance: false,
        })
    }
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_str(DEV_CONFIG).expect("config load failed");

    let policy = Arc::new(
        OriginPolicy::compile(&cfg.security.allowed_origins).expect("allowlist must compile"),
    );
    let metrics = Arc::new(HostMetrics::new());
    let (registry, mut inbound) = FrameRegistry::new(cfg.channel.queue_capacity);

    // The hidden SSO frame, attached before bootstrap so its messages can
    // reach the handshake.
    let sso_link = registry.attach(FrameSpec {
        guid: "sso".into(),
        source_url: format!("{SSO_ORIGIN}{}", cfg.environment.sso_init_path),
        origin: Origin::parse(SSO_ORIGIN).expect("sso origin parses"),
    });
    let shell = Arc::new(DevShell {
        sso_to_host: sso_link.to_host.clone(),
    });

    let bootstrapper = SessionBootstrapper::new(
        cfg.handshake.clone(),
        cfg.environment.clone(),
        shell.clone(),
    );
    let env_state = EnvironmentState {
        base_url: cfg.environment.base_url.clone(),
        settled: true,
    };
    let session = match bootstrapper.run(&env_state, PAGE_URL, &mut inbound).await {
        BootstrapOutcome::Established(session) => session,
        other => {
            error!(outcome = ?other, "bootstrap did not establish a session");
            return;
        }
    };
    let keepalive = bootstrapper.spawn_sso_keepalive();

    let collab = Collaborators {
        workspace: Arc::new(LoggingWorkspace),
        overlay: Arc::new(LoggingOverlay),
        inactivity: Arc::new(LoggingTimer),
        backend: Arc::new(DevBackend::default()),
    };
    let host_info = HostInfo {
        hostname: cfg.host.name.clone(),
        api_base_url: cfg.host.api_base_url.clone(),
    };
    let table = Arc::new(standard_table(&collab, &host_info));

    let router = Arc::new(CommandRouter::new(
        registry.clone(),
        table,
        policy,
        metrics.clone(),
        inbound,
    ));
    router.start().await.expect("router start failed");

    let heartbeat = Arc::new(HeartbeatLoop::new(
        cfg.heartbeat.clone(),
        session,
        cfg.environment.maintenance_url.clone(),
        collab.backend.clone(),
        collab.workspace.clone(),
        collab.overlay.clone(),
        shell.clone(),
        router.clone(),
        metrics.clone(),
    ));
    heartbeat.start().await;

    // One widget frame, driven through the SDK.
    let widget_link = registry.attach(FrameSpec {
        guid: "w-demo".into(),
        source_url: format!("{WIDGET_ORIGIN}/widget.html"),
        origin: Origin::parse(WIDGET_ORIGIN).expect("widget origin parses"),
    });
    let (widget, _events) = WidgetClient::attach(
        "w-demo",
        HostLink {
            to_host: widget_link.to_host,
            from_host: widget_link.from_host,
        },
        WidgetClientConfig::default(),
    );

    let hostname = widget.host_name().await.expect("gethostname failed");
    info!(%hostname, "widget resolved the host name");

    let base_url = widget.api_base_url().await.expect("getapibaseurl failed");
    info!(%base_url, "widget resolved the api base url");

    let grant = widget.generate_token().await.expect("generatetoken failed");
    info!(domain = %grant.domain, "widget received an sso token");

    let profile = widget.current_user().await.expect("getuser failed");
    info!(%profile, "widget fetched the user profile");

    widget
        .toast("loopback harness online", None, Some("success"), None)
        .await
        .expect("toast failed");
    widget.resize(480, 320).await.expect("resize failed");
    widget
        .spawn_widget_by_name("ticker")
        .await
        .expect("spawn failed");

    // Let the fire-and-forget envelopes drain through the router.
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!("{}", metrics.render());

    widget.detach();
    keepalive.stop();
    heartbeat.stop().await;
}
