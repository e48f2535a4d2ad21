//! Host config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use framehub_core::error::{FrameHubError, Result};

pub use schema::{
    ChannelSection, EnvironmentSection, HandshakeSection, HeartbeatSection, HostConfig,
    HostSection, SecuritySection,
};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<HostConfig> {
    let s = fs::read_to_string(path.as_ref())
        .map_err(|e| FrameHubError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<HostConfig> {
    let cfg: HostConfig = serde_yaml::from_str(s)
        .map_err(|e| FrameHubError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
