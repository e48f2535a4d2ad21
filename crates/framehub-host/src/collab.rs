//! Collaborator seams.
//!
//! Rendering, layout, the inactivity timer, and the business REST client
//! live outside this core. Handlers and the heartbeat loop reach them only
//! through these traits, injected at construction; there is no ambient
//! lookup of host state.

use async_trait::async_trait;
use serde_json::Value;

use framehub_core::error::Result;
use framehub_core::protocol::commands::{ModalOptions, Toast, TokenGrant};

use crate::heartbeat::{HeartbeatDelta, HeartbeatQuery};

/// Layout/grid engine for the active workspace.
#[async_trait]
pub trait WorkspaceController: Send + Sync {
    async fn spawn_by_name(&self, name: &str) -> Result<()>;
    async fn spawn_by_guid(&self, guid: &str) -> Result<()>;
    async fn resize_widget(&self, guid: &str, width: u32, height: u32) -> Result<()>;
    async fn rename_widget(&self, guid: &str, name: &str) -> Result<()>;
    /// Reload one widget instance, optionally replacing its config blob.
    async fn reload_widget(&self, target: &str, cfg: Option<&Value>) -> Result<()>;
    /// Reload the active app-mode view. `target` is absent when the sender
    /// did not identify itself.
    async fn reload_app_mode(&self, target: Option<&str>) -> Result<()>;
    async fn switch_desktop(&self, desktop_id: &str) -> Result<()>;
    async fn clear_alerts(&self) -> Result<()>;
    async fn refresh_desktop_menu(&self) -> Result<()>;
    async fn refresh_news(&self) -> Result<()>;
}

/// Modal/app-mode/toast presentation surface.
#[async_trait]
pub trait OverlayController: Send + Sync {
    async fn open_modal(&self, url: &str, options: &ModalOptions) -> Result<()>;
    async fn open_app_mode(&self, title: &str, url: &str) -> Result<()>;
    /// Present a generated share link to the user.
    async fn show_share_link(&self, url: &str) -> Result<()>;
    async fn show_toast(&self, toast: &Toast) -> Result<()>;
    /// Ask the user whether to leave for the maintenance page. `true` means
    /// go.
    async fn confirm_maintenance(&self) -> bool;
}

/// The session inactivity timer widgets may pause or nudge.
pub trait InactivityTimer: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn reset(&self);
}

/// The opaque business backend: token issuance, profile lookup, share-link
/// generation, and the heartbeat poll.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    async fn issue_widget_token(&self, guid: &str) -> Result<TokenGrant>;
    async fn current_user(&self, guid: &str) -> Result<Value>;
    async fn create_share_link(&self, guid: &str, state_json: &str) -> Result<String>;
    async fn poll_updates(&self, query: HeartbeatQuery) -> Result<HeartbeatDelta>;
}
