use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use framehub_core::error::{FrameHubError, Result};
use framehub_core::{Envelope, Origin};

use crate::frames::{FrameHandle, FrameRegistry, InboundMessage};
use crate::policy::OriginPolicy;
use crate::telemetry::{DropReason, TelemetrySink};

/// Per-message context handed to a handler: who sent it (validated origin),
/// the push-back handle of the sending frame, and the request correlation
/// id to echo on replies.
pub struct CommandCtx {
    pub origin: Origin,
    pub frame: Option<FrameHandle>,
    pub txn: Option<String>,
}

impl CommandCtx {
    /// Deliver a response envelope into the originating frame,
    /// fire-and-forget, echoing the request `txn`.
    pub fn reply<T: Serialize>(&self, event: &str, payload: &T) -> Result<()> {
        let mut env = Envelope::command(event, payload)?;
        if let Some(txn) = &self.txn {
            env = env.with_txn(txn.clone());
        }
        let frame = self.frame.as_ref().ok_or(FrameHubError::ChannelClosed)?;
        frame.push(&env)
    }
}

/// One registered command. Handlers must be isolated: an `Err` is logged
/// and counted by the router but never stops the pump.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn event(&self) -> &'static str;
    async fn handle(&self, ctx: CommandCtx, env: Envelope) -> Result<()>;
}

/// Registry of `event -> handler`. Populated once at startup; the router
/// only reads it afterwards.
#[derive(Default)]
pub struct CommandTable {
    handlers: DashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(handler.event(), handler);
    }

    pub fn get(&self, event: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(event).map(|e| e.value().clone())
    }

    pub fn registered_events(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }
}

struct RunningPump {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<mpsc::Receiver<InboundMessage>>,
}

struct RouterState {
    /// Receiver held between runs; taken by `start`, returned by the pump.
    parked: Option<mpsc::Receiver<InboundMessage>>,
    running: Option<RunningPump>,
}

/// The single inbound listener for the page lifetime. Started once the
/// session is established; `start`/`stop` are idempotent.
pub struct CommandRouter {
    registry: Arc<FrameRegistry>,
    table: Arc<CommandTable>,
    policy: Arc<OriginPolicy>,
    telemetry: Arc<dyn TelemetrySink>,
    state: Mutex<RouterState>,
}

impl CommandRouter {
    pub fn new(
        registry: Arc<FrameRegistry>,
        table: Arc<CommandTable>,
        policy: Arc<OriginPolicy>,
        telemetry: Arc<dyn TelemetrySink>,
        inbound: mpsc::Receiver<InboundMessage>,
    ) -> Self {
        Self {
            registry,
            table,
            policy,
            telemetry,
            state: Mutex::new(RouterState {
                parked: Some(inbound),
                running: None,
            }),
        }
    }

    /// Start the pump. A second call while running is a no-op.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.running.is_some() {
            debug!("command router already started");
            return Ok(());
        }
        let mut inbound = state
            .parked
            .take()
            .ok_or_else(|| FrameHubError::Internal("router inbound receiver lost".into()))?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let this = Arc::clone(self);
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    msg = inbound.recv() => {
                        match msg {
                            // A message is processed fully before the next
                            // is taken; handlers run in mutual exclusion.
                            Some(msg) => this.process(msg).await,
                            None => break,
                        }
                    }
                }
            }
            inbound
        });

        state.running = Some(RunningPump { stop_tx, task });
        debug!("command router started");
        Ok(())
    }

    /// Stop the pump and park the receiver for a later `start`. A second
    /// call while stopped is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        let Some(pump) = state.running.take() else {
            debug!("command router already stopped");
            return;
        };
        let _ = pump.stop_tx.send(true);
        match pump.task.await {
            Ok(inbound) => state.parked = Some(inbound),
            Err(e) => warn!(error = %e, "router pump did not shut down cleanly"),
        }
        debug!("command router stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running.is_some()
    }

    async fn process(&self, msg: InboundMessage) {
        if !self.policy.is_allowed(&msg.origin) {
            debug!(origin = %msg.origin, "dropping message from rejected origin");
            self.telemetry.dropped(DropReason::RejectedOrigin);
            return;
        }

        let env = match Envelope::parse(&msg.text) {
            Ok(env) => env,
            Err(e) => {
                debug!(error = %e, "dropping unparseable inbound message");
                self.telemetry.dropped(DropReason::Parse);
                return;
            }
        };

        let Some(handler) = self.table.get(&env.event) else {
            debug!(event = %env.event, "dropping envelope with unregistered event");
            self.telemetry.dropped(DropReason::UnknownCommand);
            return;
        };

        let event = env.event.clone();
        let ctx = CommandCtx {
            origin: msg.origin.clone(),
            frame: self.registry.get(msg.frame_id),
            txn: env.txn.clone(),
        };

        if let Err(e) = handler.handle(ctx, env).await {
            warn!(event = %event, code = e.code().as_str(), error = %e, "command handler failed");
            self.telemetry.handler_error(&event, e.code());
        }
        self.telemetry.command(&event, &msg.origin);
    }
}
