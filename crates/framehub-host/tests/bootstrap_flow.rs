#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use framehub_core::Origin;
use framehub_host::config::schema::{EnvironmentSection, HandshakeSection};
use framehub_host::frames::{FrameRegistry, FrameSpec};
use framehub_host::session::{BootstrapOutcome, EnvironmentState, FatalReason, SessionBootstrapper};
use framehub_host::shell::HostShell;

const SSO_BASE: &str = "https://sso.acme.com";
const PAGE_URL: &str = "https://portal.acme.com/hub?x=1";

#[derive(Default)]
struct RecordingShell {
    mounted: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
    slow_notices: AtomicUsize,
    refreshes: AtomicUsize,
}

impl HostShell for RecordingShell {
    fn mount_sso_frame(&self, url: &str) {
        self.mounted.lock().unwrap().push(url.to_string());
    }

    fn refresh_sso_frame(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate_top(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }

    fn show_slow_notice(&self) {
        self.slow_notices.fetch_add(1, Ordering::SeqCst);
    }
}

fn handshake(slow_ms: u64, fail_ms: u64) -> HandshakeSection {
    HandshakeSection {
        slow_notice_ms: slow_ms,
        fail_after_ms: fail_ms,
        sso_refresh_ms: 60_000,
    }
}

fn settled_env() -> EnvironmentState {
    EnvironmentState {
        base_url: Some(SSO_BASE.to_string()),
        settled: true,
    }
}

fn sso_spec() -> FrameSpec {
    FrameSpec {
        guid: "sso".into(),
        source_url: format!("{SSO_BASE}/sso/init"),
        origin: Origin::parse(SSO_BASE).unwrap(),
    }
}

#[tokio::test]
async fn token_before_timeout_establishes_and_cancels_timers() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(50, 5_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let sso = registry.attach(sso_spec());
    sso.to_host
        .send(r#"{"event":"auth.hubtoken","token":"abc","userId":7}"#.into())
        .await
        .unwrap();

    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    let BootstrapOutcome::Established(session) = outcome else {
        panic!("expected Established, got {outcome:?}");
    };
    assert_eq!(session.token, "abc");
    assert_eq!(session.user_id, 7);
    assert_eq!(shell.mounted.lock().unwrap()[0], format!("{SSO_BASE}/sso/init"));

    // Past the slow-notice deadline: both timers died with the handshake.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(shell.slow_notices.load(Ordering::SeqCst), 0);
    assert!(shell.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn silence_hits_hard_timeout_exactly_once() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(30, 80),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let sso = registry.attach(sso_spec());

    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    assert!(matches!(
        outcome,
        BootstrapOutcome::FatalError(FatalReason::HandshakeTimeout)
    ));
    // The cosmetic notice fired on the way.
    assert_eq!(shell.slow_notices.load(Ordering::SeqCst), 1);

    // A late token changes nothing; nobody is listening anymore.
    sso.to_host
        .send(r#"{"event":"auth.hubtoken","token":"late","userId":1}"#.into())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(shell.navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn falsy_token_fails_immediately() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(10_000, 30_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let sso = registry.attach(sso_spec());
    sso.to_host
        .send(r#"{"event":"auth.hubtoken","token":null,"userId":7}"#.into())
        .await
        .unwrap();

    let started = Instant::now();
    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    assert!(matches!(
        outcome,
        BootstrapOutcome::FatalError(FatalReason::TokenRefused)
    ));
    assert!(started.elapsed() < Duration::from_secs(1), "did not wait for the hard timeout");
}

#[tokio::test]
async fn login_redirect_navigates_with_encoded_return_target() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(1_000, 5_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let sso = registry.attach(sso_spec());
    sso.to_host
        .send(r#"{"event":"login.redirect"}"#.into())
        .await
        .unwrap();

    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    assert!(matches!(outcome, BootstrapOutcome::RedirectIssued));

    let navigations = shell.navigations.lock().unwrap();
    assert_eq!(
        navigations[0],
        format!("{SSO_BASE}/login?return={}", STANDARD.encode(PAGE_URL))
    );
}

#[tokio::test]
async fn missing_environment_after_settle_is_fatal() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(1_000, 5_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (_registry, mut inbound) = FrameRegistry::new(64);
    let env = EnvironmentState {
        base_url: None,
        settled: true,
    };
    let outcome = boot.run(&env, PAGE_URL, &mut inbound).await;
    assert!(matches!(
        outcome,
        BootstrapOutcome::FatalError(FatalReason::MissingEnvironment)
    ));
    assert!(shell.mounted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unsettled_environment_restarts_without_query_state() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(1_000, 5_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (_registry, mut inbound) = FrameRegistry::new(64);
    let env = EnvironmentState {
        base_url: None,
        settled: false,
    };
    let outcome = boot.run(&env, PAGE_URL, &mut inbound).await;
    assert!(matches!(outcome, BootstrapOutcome::RedirectIssued));
    assert_eq!(
        shell.navigations.lock().unwrap()[0],
        "https://portal.acme.com/hub"
    );
}

#[tokio::test]
async fn foreign_origins_and_garbage_are_ignored() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(1_000, 5_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let widget = registry.attach(FrameSpec {
        guid: "w-1".into(),
        source_url: "https://widgets.acme.com/embed".into(),
        origin: Origin::parse("https://widgets.acme.com").unwrap(),
    });
    let sso = registry.attach(sso_spec());

    // A widget must not be able to complete (or poison) the handshake.
    widget
        .to_host
        .send(r#"{"event":"auth.hubtoken","token":"forged","userId":666}"#.into())
        .await
        .unwrap();
    sso.to_host.send("garbage, not json".into()).await.unwrap();
    sso.to_host
        .send(r#"{"event":"something.else"}"#.into())
        .await
        .unwrap();
    sso.to_host
        .send(r#"{"event":"auth.hubtoken","token":"real","userId":7}"#.into())
        .await
        .unwrap();

    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    let BootstrapOutcome::Established(session) = outcome else {
        panic!("expected Established, got {outcome:?}");
    };
    assert_eq!(session.token, "real");
}

#[tokio::test]
async fn slow_notice_fires_once_and_handshake_still_completes() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        handshake(30, 2_000),
        EnvironmentSection::default(),
        shell.clone(),
    );

    let (registry, mut inbound) = FrameRegistry::new(64);
    let sso = registry.attach(sso_spec());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(90)).await;
        let _ = sso
            .to_host
            .send(r#"{"event":"auth.hubtoken","token":"abc","userId":7}"#.into())
            .await;
    });

    let outcome = boot.run(&settled_env(), PAGE_URL, &mut inbound).await;
    assert!(matches!(outcome, BootstrapOutcome::Established(_)));
    assert_eq!(shell.slow_notices.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn keepalive_refreshes_frame_until_stopped() {
    let shell = Arc::new(RecordingShell::default());
    let boot = SessionBootstrapper::new(
        HandshakeSection {
            slow_notice_ms: 1_000,
            fail_after_ms: 5_000,
            sso_refresh_ms: 25,
        },
        EnvironmentSection::default(),
        shell.clone(),
    );

    let keepalive = boot.spawn_sso_keepalive();
    tokio::time::sleep(Duration::from_millis(110)).await;
    keepalive.stop();

    let seen = shell.refreshes.load(Ordering::SeqCst);
    assert!(seen >= 2, "expected at least 2 refreshes, got {seen}");
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(shell.refreshes.load(Ordering::SeqCst), seen);
}
