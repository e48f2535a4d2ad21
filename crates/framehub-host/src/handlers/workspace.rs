//! Workspace handlers: spawning, geometry, reloads, desktop switching, and
//! the inactivity-expiration toggles.

use std::sync::Arc;

use async_trait::async_trait;

use framehub_core::error::{FrameHubError, Result};
use framehub_core::protocol::commands::{
    events, ExpirationToggle, SpawnWidget, SwitchDesktop, WidgetReload, WidgetRename,
    WidgetResize,
};
use framehub_core::Envelope;

use crate::collab::{InactivityTimer, WorkspaceController};
use crate::dispatch::{CommandCtx, CommandHandler};

/// `spawnwidget.name` / `spawnwidget.guid`.
pub struct SpawnOnWorkspace {
    event: &'static str,
    workspace: Arc<dyn WorkspaceController>,
}

impl SpawnOnWorkspace {
    pub fn by_name(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self {
            event: events::SPAWN_WIDGET_NAME,
            workspace,
        }
    }

    pub fn by_guid(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self {
            event: events::SPAWN_WIDGET_GUID,
            workspace,
        }
    }
}

#[async_trait]
impl CommandHandler for SpawnOnWorkspace {
    fn event(&self) -> &'static str {
        self.event
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let spawn: SpawnWidget = env.decode()?;
        if spawn.val.trim().is_empty() {
            return Err(FrameHubError::BadRequest(format!(
                "{} requires a non-empty val",
                self.event
            )));
        }
        if self.event == events::SPAWN_WIDGET_GUID {
            self.workspace.spawn_by_guid(&spawn.val).await
        } else {
            self.workspace.spawn_by_name(&spawn.val).await
        }
    }
}

/// `widget.resize`.
pub struct ResizeWidget {
    workspace: Arc<dyn WorkspaceController>,
}

impl ResizeWidget {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for ResizeWidget {
    fn event(&self) -> &'static str {
        events::WIDGET_RESIZE
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let resize: WidgetResize = env.decode()?;
        if resize.width == 0 || resize.height == 0 {
            return Err(FrameHubError::BadRequest(
                "widget.resize dimensions must be positive".into(),
            ));
        }
        self.workspace
            .resize_widget(&resize.guid, resize.width, resize.height)
            .await
    }
}

/// `widget.rename`.
pub struct RenameWidget {
    workspace: Arc<dyn WorkspaceController>,
}

impl RenameWidget {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for RenameWidget {
    fn event(&self) -> &'static str {
        events::WIDGET_RENAME
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let rename: WidgetRename = env.decode()?;
        self.workspace
            .rename_widget(&rename.guid, &rename.name)
            .await
    }
}

/// `configwidget` / `widgetrefresh`: both reload a widget instance, they
/// only differ in which payload key names the target.
pub struct ReloadWidget {
    event: &'static str,
    workspace: Arc<dyn WorkspaceController>,
}

impl ReloadWidget {
    pub fn config_widget(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self {
            event: events::CONFIG_WIDGET,
            workspace,
        }
    }

    pub fn widget_refresh(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self {
            event: events::WIDGET_REFRESH,
            workspace,
        }
    }
}

#[async_trait]
impl CommandHandler for ReloadWidget {
    fn event(&self) -> &'static str {
        self.event
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let reload: WidgetReload = env.decode()?;
        let target = reload.target().ok_or_else(|| {
            FrameHubError::BadRequest(format!("{} requires guid or instanceGuid", self.event))
        })?;
        self.workspace.reload_widget(target, reload.cfg.as_ref()).await
    }
}

/// `appmoderefresh`. Unlike widget reloads the target is optional; with no
/// payload the active app-mode view reloads.
pub struct ReloadAppMode {
    workspace: Arc<dyn WorkspaceController>,
}

impl ReloadAppMode {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for ReloadAppMode {
    fn event(&self) -> &'static str {
        events::APPMODE_REFRESH
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let reload: WidgetReload = env.decode()?;
        self.workspace.reload_app_mode(reload.target()).await
    }
}

/// `switch-desktop`.
pub struct ChangeDesktop {
    workspace: Arc<dyn WorkspaceController>,
}

impl ChangeDesktop {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for ChangeDesktop {
    fn event(&self) -> &'static str {
        events::SWITCH_DESKTOP
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let switch: SwitchDesktop = env.decode()?;
        if switch.desktopid.trim().is_empty() {
            return Err(FrameHubError::BadRequest(
                "switch-desktop requires a desktopid".into(),
            ));
        }
        self.workspace.switch_desktop(&switch.desktopid).await
    }
}

/// `alerts.clear`.
pub struct ClearAlerts {
    workspace: Arc<dyn WorkspaceController>,
}

impl ClearAlerts {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for ClearAlerts {
    fn event(&self) -> &'static str {
        events::ALERTS_CLEAR
    }

    async fn handle(&self, _ctx: CommandCtx, _env: Envelope) -> Result<()> {
        self.workspace.clear_alerts().await
    }
}

/// `refresh.desktopmenu`.
pub struct RefreshDesktopMenu {
    workspace: Arc<dyn WorkspaceController>,
}

impl RefreshDesktopMenu {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for RefreshDesktopMenu {
    fn event(&self) -> &'static str {
        events::REFRESH_DESKTOP_MENU
    }

    async fn handle(&self, _ctx: CommandCtx, _env: Envelope) -> Result<()> {
        self.workspace.refresh_desktop_menu().await
    }
}

/// `refresh.news`.
pub struct RefreshNews {
    workspace: Arc<dyn WorkspaceController>,
}

impl RefreshNews {
    pub fn new(workspace: Arc<dyn WorkspaceController>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl CommandHandler for RefreshNews {
    fn event(&self) -> &'static str {
        events::REFRESH_NEWS
    }

    async fn handle(&self, _ctx: CommandCtx, _env: Envelope) -> Result<()> {
        self.workspace.refresh_news().await
    }
}

/// `expiration.enabled`.
pub struct ExpirationEnabled {
    timer: Arc<dyn InactivityTimer>,
}

impl ExpirationEnabled {
    pub fn new(timer: Arc<dyn InactivityTimer>) -> Self {
        Self { timer }
    }
}

#[async_trait]
impl CommandHandler for ExpirationEnabled {
    fn event(&self) -> &'static str {
        events::EXPIRATION_ENABLED
    }

    async fn handle(&self, _ctx: CommandCtx, env: Envelope) -> Result<()> {
        let toggle: ExpirationToggle = env.decode()?;
        self.timer.set_enabled(toggle.val);
        Ok(())
    }
}

/// `expiration.reset`. The wire carries a `val` field here too; a reset is
/// unconditional, so the value is not inspected.
pub struct ExpirationReset {
    timer: Arc<dyn InactivityTimer>,
}

impl ExpirationReset {
    pub fn new(timer: Arc<dyn InactivityTimer>) -> Self {
        Self { timer }
    }
}

#[async_trait]
impl CommandHandler for ExpirationReset {
    fn event(&self) -> &'static str {
        events::EXPIRATION_RESET
    }

    async fn handle(&self, _ctx: CommandCtx, _env: Envelope) -> Result<()> {
        self.timer.reset();
        Ok(())
    }
}
