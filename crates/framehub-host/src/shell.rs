//! The embedding page surface.

/// Page-level actions the bootstrap and heartbeat need from the embedder:
/// mounting the hidden SSO frame, top-level navigation, and the cosmetic
/// slow-handshake notice. All fire-and-forget.
pub trait HostShell: Send + Sync {
    /// Insert (or re-point) the hidden SSO frame at `url`.
    fn mount_sso_frame(&self, url: &str);
    /// Re-assign the SSO frame's current URL to keep the auth cookie alive.
    fn refresh_sso_frame(&self);
    /// Navigate the top-level document.
    fn navigate_top(&self, url: &str);
    /// Surface the "taking longer than usual" notice. At most once per
    /// handshake attempt.
    fn show_slow_notice(&self);
}
