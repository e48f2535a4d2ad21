//! Attached-frame registry and the aggregated inbound queue.
//!
//! The embedder owns attach/detach; the router only reads the registry to
//! push envelopes back into a frame. Each attached frame gets a bounded
//! up/down channel pair plus a pump task that stamps every inbound text
//! with the frame id and the transport-asserted origin before forwarding
//! into the host's single inbound queue. Frames never supply their own
//! origin, so it cannot be forged in-band. Per-frame send order is
//! preserved; there is no ordering guarantee across frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use framehub_core::error::{FrameHubError, Result};
use framehub_core::{Envelope, Origin};

/// Registry-assigned frame identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the embedder knows about a frame at attach time.
#[derive(Debug, Clone)]
pub struct FrameSpec {
    /// Widget instance guid, as carried in RPC payloads.
    pub guid: String,
    /// The document URL loaded into the frame.
    pub source_url: String,
    /// Origin the transport asserted for the frame's document.
    pub origin: Origin,
}

/// One message on the aggregated inbound queue.
#[derive(Debug)]
pub struct InboundMessage {
    pub frame_id: FrameId,
    pub origin: Origin,
    pub text: String,
}

/// The frame's end of the channel pair, handed back from `attach`.
pub struct FrameLink {
    pub frame_id: FrameId,
    /// Frame-to-host direction.
    pub to_host: mpsc::Sender<String>,
    /// Host-to-frame direction.
    pub from_host: mpsc::Receiver<String>,
}

struct FrameEntry {
    spec: FrameSpec,
    down_tx: mpsc::Sender<String>,
    pump: JoinHandle<()>,
}

/// Frame registry: `FrameId -> (spec, downstream sender)`.
pub struct FrameRegistry {
    frames: DashMap<u64, FrameEntry>,
    seq: AtomicU64,
    inbound_tx: mpsc::Sender<InboundMessage>,
    queue_capacity: usize,
}

impl FrameRegistry {
    /// Create the registry together with the single inbound receiver. The
    /// receiver is consumed first by the session bootstrapper, then owned
    /// by the command router.
    pub fn new(queue_capacity: usize) -> (Arc<Self>, mpsc::Receiver<InboundMessage>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(queue_capacity);
        let registry = Arc::new(Self {
            frames: DashMap::new(),
            seq: AtomicU64::new(1),
            inbound_tx,
            queue_capacity,
        });
        (registry, inbound_rx)
    }

    pub fn attach(&self, spec: FrameSpec) -> FrameLink {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        let frame_id = FrameId(id);

        let (up_tx, mut up_rx) = mpsc::channel::<String>(self.queue_capacity);
        let (down_tx, down_rx) = mpsc::channel::<String>(self.queue_capacity);

        let origin = spec.origin.clone();
        let inbound = self.inbound_tx.clone();
        let pump = tokio::spawn(async move {
            while let Some(text) = up_rx.recv().await {
                let msg = InboundMessage {
                    frame_id,
                    origin: origin.clone(),
                    text,
                };
                if inbound.send(msg).await.is_err() {
                    break;
                }
            }
        });

        debug!(frame = %frame_id, guid = %spec.guid, origin = %spec.origin, "frame attached");
        self.frames.insert(id, FrameEntry { spec, down_tx, pump });

        FrameLink {
            frame_id,
            to_host: up_tx,
            from_host: down_rx,
        }
    }

    pub fn detach(&self, frame_id: FrameId) {
        if let Some((_, entry)) = self.frames.remove(&frame_id.0) {
            entry.pump.abort();
            debug!(frame = %frame_id, guid = %entry.spec.guid, "frame detached");
        }
    }

    /// Push-back handle for a still-attached frame.
    pub fn get(&self, frame_id: FrameId) -> Option<FrameHandle> {
        self.frames.get(&frame_id.0).map(|e| FrameHandle {
            frame_id,
            guid: e.spec.guid.clone(),
            down_tx: e.down_tx.clone(),
        })
    }

    pub fn attached_count(&self) -> usize {
        self.frames.len()
    }
}

/// Cheap clone of one frame's downstream side, used by handlers to deliver
/// response envelopes.
#[derive(Clone)]
pub struct FrameHandle {
    pub frame_id: FrameId,
    pub guid: String,
    down_tx: mpsc::Sender<String>,
}

impl FrameHandle {
    /// Fire-and-forget delivery into the frame's queue. A full queue is a
    /// drop, not a wait; the router must never block on a slow frame.
    pub fn push(&self, env: &Envelope) -> Result<()> {
        let text = env.to_text()?;
        match self.down_tx.try_send(text) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(FrameHubError::Internal(format!(
                "frame {} downstream queue full",
                self.frame_id
            ))),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(FrameHubError::ChannelClosed),
        }
    }
}
