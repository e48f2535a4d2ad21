//! Command vocabulary: the closed set of event names and their payloads.
//!
//! This table is the public compatibility contract with third-party widget
//! authors. Event names and payload field names (including their historical
//! casing, e.g. `userId`, `ssoToken`, `instanceGuid`, PascalCase modal
//! options) are frozen; adding fields is allowed, renaming is not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event names exchanged on the channel.
pub mod events {
    // Session bootstrap (handled before the router starts).
    pub const AUTH_HUBTOKEN: &str = "auth.hubtoken";
    pub const LOGIN_REDIRECT: &str = "login.redirect";

    // Overlays.
    pub const MODAL_CREATE_INCIDENT: &str = "modal.createincident";
    pub const MODAL_CUSTOM: &str = "modal.custom";
    pub const MODAL_DEEPLINK: &str = "modal.deeplink";
    pub const APPMODE: &str = "appmode";
    pub const TOAST: &str = "toast";

    // Workspace control.
    pub const SPAWN_WIDGET_NAME: &str = "spawnwidget.name";
    pub const SPAWN_WIDGET_GUID: &str = "spawnwidget.guid";
    pub const WIDGET_RESIZE: &str = "widget.resize";
    pub const WIDGET_RENAME: &str = "widget.rename";
    pub const CONFIG_WIDGET: &str = "configwidget";
    pub const WIDGET_REFRESH: &str = "widgetrefresh";
    pub const APPMODE_REFRESH: &str = "appmoderefresh";
    pub const SWITCH_DESKTOP: &str = "switch-desktop";
    pub const ALERTS_CLEAR: &str = "alerts.clear";
    pub const REFRESH_DESKTOP_MENU: &str = "refresh.desktopmenu";
    pub const REFRESH_NEWS: &str = "refresh.news";

    // Inactivity expiration.
    pub const EXPIRATION_ENABLED: &str = "expiration.enabled";
    pub const EXPIRATION_RESET: &str = "expiration.reset";

    // Request/response pairs.
    pub const AUTH_GENERATE_TOKEN: &str = "auth.generatetoken";
    pub const AUTH_TOKEN_GENERATED: &str = "auth.tokengenerated";
    pub const AUTH_GET_USER: &str = "auth.getuser";
    pub const AUTH_USER_RETURNED: &str = "auth.userreturned";
    pub const GET_HOSTNAME: &str = "gethostname";
    pub const GET_HOST_RESPONSE: &str = "gethost.response";
    pub const GET_API_BASE_URL: &str = "getapibaseurl";
    pub const GET_API_BASE_URL_RESPONSE: &str = "getapibaseurl.response";
}

/// Response event name for an RPC-style request, `None` for fire-and-forget
/// commands.
pub fn response_event(request_event: &str) -> Option<&'static str> {
    match request_event {
        events::AUTH_GENERATE_TOKEN => Some(events::AUTH_TOKEN_GENERATED),
        events::AUTH_GET_USER => Some(events::AUTH_USER_RETURNED),
        events::GET_HOSTNAME => Some(events::GET_HOST_RESPONSE),
        events::GET_API_BASE_URL => Some(events::GET_API_BASE_URL_RESPONSE),
        _ => None,
    }
}

/// Whether the event expects a correlated response envelope.
pub fn is_rpc_request(event: &str) -> bool {
    response_event(event).is_some()
}

// --------------------
// Bootstrap payloads
// --------------------

/// `auth.hubtoken` payload, delivered by the hidden SSO frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: i64,
}

impl HubToken {
    /// The token, if present and non-empty (the wire allows `null`).
    pub fn usable_token(&self) -> Option<&str> {
        match self.token.as_deref() {
            Some(t) if !t.is_empty() => Some(t),
            _ => None,
        }
    }
}

// --------------------
// Overlay payloads
// --------------------

/// Options block for `modal.createincident` / `modal.custom`. Keys are
/// PascalCase on the wire; unknown options pass through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModalOptions {
    #[serde(default, rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "Width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, rename = "Height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `modal.createincident` / `modal.custom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalOpen {
    pub url: String,
    #[serde(default)]
    pub options: ModalOptions,
}

/// `modal.deeplink`: widget state to turn into a shareable link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLink {
    pub guid: String,
    pub json: String,
}

/// `appmode`: full-view overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMode {
    pub title: String,
    pub url: String,
}

/// `toast`: transient notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

// --------------------
// Workspace payloads
// --------------------

/// `spawnwidget.name` / `spawnwidget.guid`: `val` names the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnWidget {
    pub val: String,
}

/// `widget.resize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetResize {
    pub guid: String,
    pub width: u32,
    pub height: u32,
}

/// `widget.rename`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetRename {
    pub guid: String,
    pub name: String,
}

/// `configwidget` / `widgetrefresh` / `appmoderefresh`. The instance is
/// addressed by `guid` or by `instanceGuid` depending on the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetReload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, rename = "instanceGuid", skip_serializing_if = "Option::is_none")]
    pub instance_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfg: Option<Value>,
}

impl WidgetReload {
    /// Whichever instance reference the sender supplied.
    pub fn target(&self) -> Option<&str> {
        self.guid.as_deref().or(self.instance_guid.as_deref())
    }
}

/// `switch-desktop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchDesktop {
    pub desktopid: String,
}

/// `expiration.enabled`: toggles the inactivity timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationToggle {
    pub val: bool,
}

// --------------------
// RPC payloads
// --------------------

/// Request body shared by all four RPC calls: the widget's identifying guid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub guid: String,
}

/// `auth.tokengenerated`: response to `auth.generatetoken`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    #[serde(rename = "ssoToken")]
    pub sso_token: String,
    pub domain: String,
}

/// `auth.userreturned`: response to `auth.getuser`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReturned {
    pub profile: Value,
}

/// `gethost.response`: response to `gethostname`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostNameResponse {
    pub hostname: String,
}

/// `getapibaseurl.response`: response to `getapibaseurl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiBaseUrlResponse {
    pub baseurl: String,
}
