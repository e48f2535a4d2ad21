//! The named call surface widgets program against.
//!
//! Every call validates its required arguments first and sends nothing on
//! failure; a partially-valid envelope never goes out. Fire-and-forget
//! calls return as soon as the envelope is enqueued; RPC calls await the
//! correlated response under the configured timeout.

use serde_json::Value;

use framehub_core::error::{FrameHubError, Result};
use framehub_core::protocol::commands::{
    events, ApiBaseUrlResponse, AppMode, DeepLink, ExpirationToggle, HostNameResponse,
    ModalOpen, ModalOptions, RpcRequest, SpawnWidget, SwitchDesktop, Toast, TokenGrant,
    UserReturned, WidgetReload, WidgetRename, WidgetResize,
};
use framehub_core::Envelope;

use crate::client::WidgetClient;

fn required(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FrameHubError::BadRequest(format!(
            "{name} must be a non-empty string"
        )));
    }
    Ok(())
}

impl WidgetClient {
    // ---- overlays ----

    /// Open the incident-creation modal over the workspace.
    pub async fn open_incident_modal(&self, url: &str, options: ModalOptions) -> Result<()> {
        required("url", url)?;
        self.send(Envelope::command(
            events::MODAL_CREATE_INCIDENT,
            &ModalOpen {
                url: url.into(),
                options,
            },
        )?)
        .await
    }

    /// Open an arbitrary page in a modal overlay.
    pub async fn open_modal(&self, url: &str, options: ModalOptions) -> Result<()> {
        required("url", url)?;
        self.send(Envelope::command(
            events::MODAL_CUSTOM,
            &ModalOpen {
                url: url.into(),
                options,
            },
        )?)
        .await
    }

    /// Open a full-view (app mode) overlay.
    pub async fn open_app_mode(&self, title: &str, url: &str) -> Result<()> {
        required("title", title)?;
        required("url", url)?;
        self.send(Envelope::command(
            events::APPMODE,
            &AppMode {
                title: title.into(),
                url: url.into(),
            },
        )?)
        .await
    }

    /// Ask the host to turn this widget's serialized state into a
    /// shareable link and present it.
    pub async fn share_deep_link(&self, state_json: &str) -> Result<()> {
        required("state_json", state_json)?;
        self.send(Envelope::command(
            events::MODAL_DEEPLINK,
            &DeepLink {
                guid: self.guid().into(),
                json: state_json.into(),
            },
        )?)
        .await
    }

    pub async fn toast(
        &self,
        message: &str,
        icon: Option<&str>,
        color: Option<&str>,
        timer_ms: Option<u64>,
    ) -> Result<()> {
        required("message", message)?;
        self.send(Envelope::command(
            events::TOAST,
            &Toast {
                message: message.into(),
                icon: icon.map(Into::into),
                color: color.map(Into::into),
                timer: timer_ms,
            },
        )?)
        .await
    }

    // ---- workspace ----

    pub async fn spawn_widget_by_name(&self, name: &str) -> Result<()> {
        required("name", name)?;
        self.send(Envelope::command(
            events::SPAWN_WIDGET_NAME,
            &SpawnWidget { val: name.into() },
        )?)
        .await
    }

    pub async fn spawn_widget_by_guid(&self, guid: &str) -> Result<()> {
        required("guid", guid)?;
        self.send(Envelope::command(
            events::SPAWN_WIDGET_GUID,
            &SpawnWidget { val: guid.into() },
        )?)
        .await
    }

    /// Request a supported size change for this widget instance.
    pub async fn resize(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(FrameHubError::BadRequest(
                "width and height must be positive".into(),
            ));
        }
        self.send(Envelope::command(
            events::WIDGET_RESIZE,
            &WidgetResize {
                guid: self.guid().into(),
                width,
                height,
            },
        )?)
        .await
    }

    pub async fn rename(&self, name: &str) -> Result<()> {
        required("name", name)?;
        self.send(Envelope::command(
            events::WIDGET_RENAME,
            &WidgetRename {
                guid: self.guid().into(),
                name: name.into(),
            },
        )?)
        .await
    }

    /// Reload another widget, optionally replacing its config blob.
    pub async fn reload_widget(&self, guid: &str, cfg: Option<Value>) -> Result<()> {
        required("guid", guid)?;
        self.send(Envelope::command(
            events::CONFIG_WIDGET,
            &WidgetReload {
                guid: Some(guid.into()),
                instance_guid: None,
                cfg,
            },
        )?)
        .await
    }

    /// Reload a widget addressed by instance guid.
    pub async fn reload_instance(&self, instance_guid: &str, cfg: Option<Value>) -> Result<()> {
        required("instance_guid", instance_guid)?;
        self.send(Envelope::command(
            events::WIDGET_REFRESH,
            &WidgetReload {
                guid: None,
                instance_guid: Some(instance_guid.into()),
                cfg,
            },
        )?)
        .await
    }

    /// Reload the app-mode view this widget lives in.
    pub async fn reload_app_mode(&self) -> Result<()> {
        self.send(Envelope::command(
            events::APPMODE_REFRESH,
            &WidgetReload {
                guid: Some(self.guid().into()),
                instance_guid: None,
                cfg: None,
            },
        )?)
        .await
    }

    pub async fn switch_desktop(&self, desktop_id: &str) -> Result<()> {
        required("desktop_id", desktop_id)?;
        self.send(Envelope::command(
            events::SWITCH_DESKTOP,
            &SwitchDesktop {
                desktopid: desktop_id.into(),
            },
        )?)
        .await
    }

    pub async fn clear_alerts(&self) -> Result<()> {
        self.send(Envelope::new(events::ALERTS_CLEAR)).await
    }

    pub async fn refresh_desktop_menu(&self) -> Result<()> {
        self.send(Envelope::new(events::REFRESH_DESKTOP_MENU)).await
    }

    pub async fn refresh_news(&self) -> Result<()> {
        self.send(Envelope::new(events::REFRESH_NEWS)).await
    }

    // ---- inactivity expiration ----

    pub async fn set_expiration_enabled(&self, enabled: bool) -> Result<()> {
        self.send(Envelope::command(
            events::EXPIRATION_ENABLED,
            &ExpirationToggle { val: enabled },
        )?)
        .await
    }

    /// Nudge the inactivity timer. The wire shape carries `val` here too,
    /// though the host resets unconditionally.
    pub async fn reset_expiration(&self) -> Result<()> {
        self.send(Envelope::command(
            events::EXPIRATION_RESET,
            &ExpirationToggle { val: true },
        )?)
        .await
    }

    // ---- request/response ----

    /// One-shot SSO token issuance.
    pub async fn generate_token(&self) -> Result<TokenGrant> {
        let resp = self
            .request(
                events::AUTH_GENERATE_TOKEN,
                &RpcRequest {
                    guid: self.guid().into(),
                },
            )
            .await?;
        resp.decode()
    }

    /// The current user's profile, as an opaque JSON document.
    pub async fn current_user(&self) -> Result<Value> {
        let resp = self
            .request(
                events::AUTH_GET_USER,
                &RpcRequest {
                    guid: self.guid().into(),
                },
            )
            .await?;
        let body: UserReturned = resp.decode()?;
        Ok(body.profile)
    }

    /// Which portal host is embedding this widget.
    pub async fn host_name(&self) -> Result<String> {
        let resp = self
            .request(
                events::GET_HOSTNAME,
                &RpcRequest {
                    guid: self.guid().into(),
                },
            )
            .await?;
        let body: HostNameResponse = resp.decode()?;
        Ok(body.hostname)
    }

    /// Base URL for the portal's REST API.
    pub async fn api_base_url(&self) -> Result<String> {
        let resp = self
            .request(
                events::GET_API_BASE_URL,
                &RpcRequest {
                    guid: self.guid().into(),
                },
            )
            .await?;
        let body: ApiBaseUrlResponse = resp.decode()?;
        Ok(body.baseurl)
    }
}
