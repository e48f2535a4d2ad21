//! Overlay handlers: modals, app mode, deep links, toasts.

use std::sync::Arc;

use async_trait::async_trait;

use framehub_core::error::Result;
use framehub_core::protocol::commands::{events, AppMode, DeepLink, ModalOpen, Toast};
use framehub_core::Envelope;

use crate::collab::{OverlayController, PortalBackend};
use crate::dispatch::{CommandCtx, CommandHandler};

/// Shown when share-link generation fails; the one protocol failure that
/// is user-visible by design.
const SHARE_FAILED_MESSAGE: &str = "Could not create a share link for this widget.";

/// `modal.createincident` / `modal.custom`.
pub struct OpenModal {
    event: &'static str,
    overlay: Arc<dyn OverlayController>,
}

impl OpenModal {
    pub fn incident(overlay: Arc<dyn OverlayController>) -> Self {
        Self {
            event: events::MODAL_CREATE_INCIDENT,
            overlay,
        }
    }

    pub fn custom(overlay: Arc<dyn OverlayController>) -> Self {
        Self {
            event: events::MODAL_CUSTOM,
            overlay,
        }
    }
}

#[async_trait]
impl CommandHandler for OpenModal {
    fn event(&self) -> &'static str {
        self.event
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let open: ModalOpen = env.decode()?;
        self.overlay.open_modal(&open.url, &open.options).await
    }
}

/// `appmode`.
pub struct OpenAppMode {
    overlay: Arc<dyn OverlayController>,
}

impl OpenAppMode {
    pub fn new(overlay: Arc<dyn OverlayController>) -> Self {
        Self { overlay }
    }
}

#[async_trait]
impl CommandHandler for OpenAppMode {
    fn event(&self) -> &'static str {
        events::APPMODE
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let mode: AppMode = env.decode()?;
        self.overlay.open_app_mode(&mode.title, &mode.url).await
    }
}

/// `modal.deeplink`: turn widget state into a shareable link and show it.
pub struct ShareDeepLink {
    backend: Arc<dyn PortalBackend>,
    overlay: Arc<dyn OverlayController>,
}

impl ShareDeepLink {
    pub fn new(backend: Arc<dyn PortalBackend>, overlay: Arc<dyn OverlayController>) -> Self {
        Self { backend, overlay }
    }
}

#[async_trait]
impl CommandHandler for ShareDeepLink {
    fn event(&self) -> &'static str {
        events::MODAL_DEEPLINK
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let link: DeepLink = env.decode()?;
        match self.backend.create_share_link(&link.guid, &link.json).await {
            Ok(url) => self.overlay.show_share_link(&url).await,
            Err(e) => {
                self.overlay
                    .show_toast(&Toast {
                        message: SHARE_FAILED_MESSAGE.into(),
                        icon: None,
                        color: Some("error".into()),
                        timer: None,
                    })
                    .await?;
                Err(e)
            }
        }
    }
}

/// `toast`.
pub struct ShowToast {
    overlay: Arc<dyn OverlayController>,
}

impl ShowToast {
    pub fn new(overlay: Arc<dyn OverlayController>) -> Self {
        Self { overlay }
    }
}

#[async_trait]
impl CommandHandler for ShowToast {
    fn event(&self) -> &'static str {
        events::TOAST
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let toast: Toast = env.decode()?;
        self.overlay.show_toast(&toast).await
    }
}
