use framehub_core::error::{FrameHubError, Result};
use framehub_core::Origin;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub version: u32,

    pub host: HostSection,

    #[serde(default)]
    pub environment: EnvironmentSection,

    #[serde(default)]
    pub handshake: HandshakeSection,

    #[serde(default)]
    pub heartbeat: HeartbeatSection,

    #[serde(default)]
    pub channel: ChannelSection,

    #[serde(default)]
    pub security: SecuritySection,
}

impl HostConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FrameHubError::BadRequest("version must be 1".into()));
        }

        self.host.validate()?;
        self.environment.validate()?;
        self.handshake.validate()?;
        self.heartbeat.validate()?;
        self.channel.validate()?;
        self.security.validate()?;

        Ok(())
    }
}

/// Identity the host answers `gethostname` / `getapibaseurl` queries with.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSection {
    pub name: String,
    pub api_base_url: String,
}

impl HostSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FrameHubError::BadRequest("host.name must not be empty".into()));
        }
        Origin::parse(&self.api_base_url)
            .map_err(|e| FrameHubError::BadRequest(format!("host.api_base_url: {e}")))?;
        Ok(())
    }
}

/// SSO environment endpoints. `base_url` stays optional here: the embedder
/// resolves the effective environment at runtime and may override it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentSection {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_sso_init_path")]
    pub sso_init_path: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_maintenance_url")]
    pub maintenance_url: String,
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            base_url: None,
            sso_init_path: default_sso_init_path(),
            login_path: default_login_path(),
            maintenance_url: default_maintenance_url(),
        }
    }
}

impl EnvironmentSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.base_url {
            Origin::parse(url)
                .map_err(|e| FrameHubError::BadRequest(format!("environment.base_url: {e}")))?;
        }
        if !self.sso_init_path.starts_with('/') {
            return Err(FrameHubError::BadRequest(
                "environment.sso_init_path must start with '/'".into(),
            ));
        }
        if !self.login_path.starts_with('/') {
            return Err(FrameHubError::BadRequest(
                "environment.login_path must start with '/'".into(),
            ));
        }
        if self.maintenance_url.trim().is_empty() {
            return Err(FrameHubError::BadRequest(
                "environment.maintenance_url must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_sso_init_path() -> String {
    "/sso/init".into()
}
fn default_login_path() -> String {
    "/login".into()
}
fn default_maintenance_url() -> String {
    "/maintenance".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandshakeSection {
    #[serde(default = "default_slow_notice_ms")]
    pub slow_notice_ms: u64,

    #[serde(default = "default_fail_after_ms")]
    pub fail_after_ms: u64,

    #[serde(default = "default_sso_refresh_ms")]
    pub sso_refresh_ms: u64,
}

impl Default for HandshakeSection {
    fn default() -> Self {
        Self {
            slow_notice_ms: default_slow_notice_ms(),
            fail_after_ms: default_fail_after_ms(),
            sso_refresh_ms: default_sso_refresh_ms(),
        }
    }
}

impl HandshakeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=120000).contains(&self.slow_notice_ms) {
            return Err(FrameHubError::BadRequest(
                "handshake.slow_notice_ms must be between 1000 and 120000".into(),
            ));
        }
        if !(5000..=600000).contains(&self.fail_after_ms) {
            return Err(FrameHubError::BadRequest(
                "handshake.fail_after_ms must be between 5000 and 600000".into(),
            ));
        }
        if self.fail_after_ms <= self.slow_notice_ms {
            return Err(FrameHubError::BadRequest(
                "handshake.fail_after_ms must be greater than slow_notice_ms".into(),
            ));
        }
        if !(60_000..=86_400_000).contains(&self.sso_refresh_ms) {
            return Err(FrameHubError::BadRequest(
                "handshake.sso_refresh_ms must be between 60000 and 86400000".into(),
            ));
        }
        Ok(())
    }
}

fn default_slow_notice_ms() -> u64 {
    10_000
}
fn default_fail_after_ms() -> u64 {
    30_000
}
fn default_sso_refresh_ms() -> u64 {
    3_600_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatSection {
    #[serde(default = "default_heartbeat_interval_ms")]
    pub interval_ms: u64,
}

impl Default for HeartbeatSection {
    fn default() -> Self {
        Self {
            interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl HeartbeatSection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=600000).contains(&self.interval_ms) {
            return Err(FrameHubError::BadRequest(
                "heartbeat.interval_ms must be between 5000 and 600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_heartbeat_interval_ms() -> u64 {
    45_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ChannelSection {
    pub fn validate(&self) -> Result<()> {
        if !(16..=65536).contains(&self.queue_capacity) {
            return Err(FrameHubError::BadRequest(
                "channel.queue_capacity must be between 16 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_queue_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecuritySection {
    /// Origins allowed to talk to the router. Entry format is
    /// `scheme://host[:port]`; the host part may be `*.suffix`.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl SecuritySection {
    pub fn validate(&self) -> Result<()> {
        if self.allowed_origins.is_empty() {
            return Err(FrameHubError::BadRequest(
                "security.allowed_origins must not be empty".into(),
            ));
        }
        Ok(())
    }
}
