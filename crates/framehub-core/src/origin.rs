//! Sender origin (scheme + host, optional port).
//!
//! Every inbound message carries the transport-asserted origin of the frame
//! that sent it. Only the scheme+host portion is meaningful to the protocol;
//! paths and query strings are ignored on parse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FrameHubError, Result};

/// Effective origin of a frame: `scheme://host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Origin {
    /// Parse an origin from a URL-ish string, keeping only scheme and
    /// authority. Trailing path/query segments are accepted and dropped.
    pub fn parse(s: &str) -> Result<Origin> {
        let s = s.trim();
        let (scheme, rest) = s
            .split_once("://")
            .ok_or_else(|| FrameHubError::BadRequest(format!("origin missing scheme: {s}")))?;
        if scheme.is_empty() {
            return Err(FrameHubError::BadRequest(format!("origin missing scheme: {s}")));
        }

        let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
        if authority.is_empty() {
            return Err(FrameHubError::BadRequest(format!("origin missing host: {s}")));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => {
                let port: u16 = p.parse().map_err(|_| {
                    FrameHubError::BadRequest(format!("origin has invalid port: {s}"))
                })?;
                (h, Some(port))
            }
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(FrameHubError::BadRequest(format!("origin missing host: {s}")));
        }

        Ok(Origin {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            port,
        })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(p) => write!(f, "{}://{}:{}", self.scheme, self.host, p),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}
