//! Built-in command handlers, grouped by the collaborator they drive.
//!
//! `standard_table` registers the full public command surface. The two
//! bootstrap events (`auth.hubtoken`, `login.redirect`) are deliberately
//! absent: once the router is live they are unregistered events and drop
//! silently.

pub mod authrpc;
pub mod hostinfo;
pub mod overlay;
pub mod workspace;

use std::sync::Arc;

use crate::collab::{InactivityTimer, OverlayController, PortalBackend, WorkspaceController};
use crate::dispatch::CommandTable;

use authrpc::{GenerateToken, GetUser};
use hostinfo::{GetApiBaseUrl, GetHostName};
use overlay::{OpenAppMode, OpenModal, ShareDeepLink, ShowToast};
use workspace::{
    ChangeDesktop, ClearAlerts, ExpirationEnabled, ExpirationReset, RefreshDesktopMenu,
    RefreshNews, ReloadAppMode, ReloadWidget, RenameWidget, ResizeWidget, SpawnOnWorkspace,
};

/// The injected collaborators the built-in handlers delegate to.
#[derive(Clone)]
pub struct Collaborators {
    pub workspace: Arc<dyn WorkspaceController>,
    pub overlay: Arc<dyn OverlayController>,
    pub inactivity: Arc<dyn InactivityTimer>,
    pub backend: Arc<dyn PortalBackend>,
}

/// Config-derived identity used to answer host info queries.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub hostname: String,
    pub api_base_url: String,
}

/// Build the full command table for the public surface.
pub fn standard_table(collab: &Collaborators, info: &HostInfo) -> CommandTable {
    let table = CommandTable::new();

    table.register(Arc::new(OpenModal::incident(collab.overlay.clone())));
    table.register(Arc::new(OpenModal::custom(collab.overlay.clone())));
    table.register(Arc::new(OpenAppMode::new(collab.overlay.clone())));
    table.register(Arc::new(ShareDeepLink::new(
        collab.backend.clone(),
        collab.overlay.clone(),
    )));
    table.register(Arc::new(ShowToast::new(collab.overlay.clone())));

    table.register(Arc::new(SpawnOnWorkspace::by_name(collab.workspace.clone())));
    table.register(Arc::new(SpawnOnWorkspace::by_guid(collab.workspace.clone())));
    table.register(Arc::new(ResizeWidget::new(collab.workspace.clone())));
    table.register(Arc::new(RenameWidget::new(collab.workspace.clone())));
    table.register(Arc::new(ReloadWidget::config_widget(collab.workspace.clone())));
    table.register(Arc::new(ReloadWidget::widget_refresh(collab.workspace.clone())));
    table.register(Arc::new(ReloadAppMode::new(collab.workspace.clone())));
    table.register(Arc::new(ChangeDesktop::new(collab.workspace.clone())));
    table.register(Arc::new(ClearAlerts::new(collab.workspace.clone())));
    table.register(Arc::new(RefreshDesktopMenu::new(collab.workspace.clone())));
    table.register(Arc::new(RefreshNews::new(collab.workspace.clone())));

    table.register(Arc::new(ExpirationEnabled::new(collab.inactivity.clone())));
    table.register(Arc::new(ExpirationReset::new(collab.inactivity.clone())));

    table.register(Arc::new(GenerateToken::new(collab.backend.clone())));
    table.register(Arc::new(GetUser::new(collab.backend.clone())));
    table.register(Arc::new(GetHostName::new(info.hostname.clone())));
    table.register(Arc::new(GetApiBaseUrl::new(info.api_base_url.clone())));

    table
}
