//! The startup handshake: drive a hidden frame through the SSO endpoint
//! and resolve to an authenticated session or a terminal failure.
//!
//! State machine: `Idle -> AwaitingEnvironment -> HandshakePending ->
//! {SlowNotice} -> Established | FatalError | RedirectIssued`. The slow
//! notice is cosmetic; both timers keep running through it. A handshake
//! attempt resolves exactly once, and the hard timeout is not retried;
//! recovery is a page reload.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use framehub_core::protocol::commands::{events, HubToken};
use framehub_core::{Envelope, Origin};

use crate::config::schema::{EnvironmentSection, HandshakeSection};
use crate::frames::InboundMessage;
use crate::session::Session;
use crate::shell::HostShell;

/// Runtime view of the environment resolution. `settled` distinguishes "the
/// loader finished and found nothing" (a dead end) from "still resolving"
/// (strip query state and retry via navigation).
#[derive(Debug, Clone, Default)]
pub struct EnvironmentState {
    pub base_url: Option<String>,
    pub settled: bool,
}

/// Why bootstrap ended in `FatalError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalReason {
    /// No environment configured and the loader settled.
    MissingEnvironment,
    /// The SSO endpoint answered with a falsy token.
    TokenRefused,
    /// Nothing usable arrived before the hard timeout.
    HandshakeTimeout,
    /// The inbound channel closed mid-handshake.
    ChannelClosed,
}

impl FatalReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FatalReason::MissingEnvironment => "missing_environment",
            FatalReason::TokenRefused => "token_refused",
            FatalReason::HandshakeTimeout => "handshake_timeout",
            FatalReason::ChannelClosed => "channel_closed",
        }
    }
}

/// Terminal result of one bootstrap run.
#[derive(Debug)]
pub enum BootstrapOutcome {
    Established(Session),
    /// The top-level document was navigated away; this page load is over.
    RedirectIssued,
    FatalError(FatalReason),
}

pub struct SessionBootstrapper {
    handshake: HandshakeSection,
    environment: EnvironmentSection,
    shell: Arc<dyn HostShell>,
}

impl SessionBootstrapper {
    pub fn new(
        handshake: HandshakeSection,
        environment: EnvironmentSection,
        shell: Arc<dyn HostShell>,
    ) -> Self {
        Self {
            handshake,
            environment,
            shell,
        }
    }

    /// Run one handshake attempt. Borrows the aggregated inbound receiver;
    /// the router takes ownership of it afterwards.
    pub async fn run(
        &self,
        env_state: &EnvironmentState,
        current_url: &str,
        inbound: &mut mpsc::Receiver<InboundMessage>,
    ) -> BootstrapOutcome {
        let Some(base_url) = env_state.base_url.as_deref() else {
            if !env_state.settled {
                // Loader still resolving: restart clean, without query state.
                let stripped = strip_query(current_url);
                info!(url = %stripped, "environment unresolved, restarting without query state");
                self.shell.navigate_top(&stripped);
                return BootstrapOutcome::RedirectIssued;
            }
            error!("no environment configured; handshake cannot start");
            return BootstrapOutcome::FatalError(FatalReason::MissingEnvironment);
        };

        let sso_url = format!("{base_url}{}", self.environment.sso_init_path);
        info!(url = %sso_url, "mounting sso frame");
        self.shell.mount_sso_frame(&sso_url);

        // Only the SSO environment may complete the handshake; everything
        // else on the channel is ignored during this phase.
        let expected_origin = Origin::parse(base_url).ok();

        let slow = tokio::time::sleep(Duration::from_millis(self.handshake.slow_notice_ms));
        let fail = tokio::time::sleep(Duration::from_millis(self.handshake.fail_after_ms));
        tokio::pin!(slow, fail);
        let mut slow_notified = false;

        loop {
            tokio::select! {
                () = &mut slow, if !slow_notified => {
                    slow_notified = true;
                    info!("sso handshake is taking longer than usual");
                    self.shell.show_slow_notice();
                }
                () = &mut fail => {
                    error!(waited_ms = self.handshake.fail_after_ms, "sso handshake timed out");
                    return BootstrapOutcome::FatalError(FatalReason::HandshakeTimeout);
                }
                msg = inbound.recv() => {
                    let Some(msg) = msg else {
                        error!("inbound channel closed during handshake");
                        return BootstrapOutcome::FatalError(FatalReason::ChannelClosed);
                    };
                    if let Some(expected) = &expected_origin {
                        if msg.origin != *expected {
                            debug!(origin = %msg.origin, "ignoring handshake message from foreign origin");
                            continue;
                        }
                    }
                    let Ok(env) = Envelope::parse(&msg.text) else {
                        debug!("ignoring unparseable handshake message");
                        continue;
                    };
                    match env.event.as_str() {
                        events::AUTH_HUBTOKEN => match env.decode::<HubToken>() {
                            Ok(hub) => match hub.usable_token() {
                                Some(token) => {
                                    info!(user_id = hub.user_id, "session established");
                                    return BootstrapOutcome::Established(Session {
                                        token: token.to_string(),
                                        user_id: hub.user_id,
                                    });
                                }
                                None => {
                                    error!("sso endpoint refused to issue a token");
                                    return BootstrapOutcome::FatalError(FatalReason::TokenRefused);
                                }
                            },
                            Err(e) => debug!(error = %e, "ignoring malformed hubtoken payload"),
                        },
                        events::LOGIN_REDIRECT => {
                            let target = format!(
                                "{base_url}{}?return={}",
                                self.environment.login_path,
                                STANDARD.encode(current_url)
                            );
                            info!("sso requested interactive login");
                            self.shell.navigate_top(&target);
                            return BootstrapOutcome::RedirectIssued;
                        }
                        other => debug!(event = other, "ignoring unrelated handshake event"),
                    }
                }
            }
        }
    }

    /// After establishment: reload the hidden SSO frame on a fixed period
    /// so the auth cookie stays warm. Never re-runs handshake logic.
    pub fn spawn_sso_keepalive(&self) -> SsoKeepalive {
        let period = Duration::from_millis(self.handshake.sso_refresh_ms);
        let shell = Arc::clone(&self.shell);
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the frame was just
            // mounted, skip it.
            tick.tick().await;
            loop {
                tick.tick().await;
                debug!("refreshing sso frame");
                shell.refresh_sso_frame();
            }
        });
        SsoKeepalive { handle }
    }
}

/// Handle for the hourly SSO refresh task; aborts on drop.
pub struct SsoKeepalive {
    handle: JoinHandle<()>,
}

impl SsoKeepalive {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SsoKeepalive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn strip_query(url: &str) -> String {
    url.split(['?', '#']).next().unwrap_or(url).to_string()
}
