//! Origin allowlist compilation and matching.
//!
//! Inbound messages are checked against these rules before dispatch. An
//! empty rule set is a strict deny. Entry format is `scheme://host[:port]`;
//! the host may be written `*.suffix` to match any subdomain of `suffix`
//! (the bare apex does not match). A rule without a port matches any port.

use framehub_core::error::{FrameHubError, Result};
use framehub_core::Origin;

#[derive(Debug, Clone)]
enum HostMatch {
    Exact(String),
    /// Stored with the leading dot, e.g. `.acme.com`.
    Suffix(String),
}

#[derive(Debug, Clone)]
struct OriginRule {
    scheme: String,
    host: HostMatch,
    port: Option<u16>, // None => wildcard
}

impl OriginRule {
    fn matches(&self, origin: &Origin) -> bool {
        if self.scheme != origin.scheme {
            return false;
        }
        if let Some(p) = self.port {
            if origin.port != Some(p) {
                return false;
            }
        }
        match &self.host {
            HostMatch::Exact(h) => *h == origin.host,
            HostMatch::Suffix(s) => origin.host.ends_with(s.as_str()),
        }
    }
}

/// Compiled allowlist. Construct once at startup, then share via `Arc`.
#[derive(Debug)]
pub struct OriginPolicy {
    rules: Vec<OriginRule>,
}

impl OriginPolicy {
    pub fn compile(raw: &[String]) -> Result<Self> {
        let mut rules = Vec::with_capacity(raw.len());
        for entry in raw {
            rules.push(compile_rule(entry)?);
        }
        Ok(Self { rules })
    }

    pub fn is_allowed(&self, origin: &Origin) -> bool {
        self.rules.iter().any(|r| r.matches(origin))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

fn compile_rule(entry: &str) -> Result<OriginRule> {
    // `Origin::parse` accepts the `*.suffix` host form unchanged, so rule
    // entries share the normalization (lowercasing, port split) of real
    // origins.
    let parsed = Origin::parse(entry).map_err(|e| {
        FrameHubError::BadRequest(format!("invalid allowed_origins entry: {entry} ({e})"))
    })?;

    let host = if let Some(suffix) = parsed.host.strip_prefix("*.") {
        if suffix.is_empty() || suffix.contains('*') {
            return Err(FrameHubError::BadRequest(format!(
                "invalid allowed_origins wildcard: {entry} (expected *.suffix)"
            )));
        }
        HostMatch::Suffix(format!(".{suffix}"))
    } else if parsed.host.contains('*') {
        return Err(FrameHubError::BadRequest(format!(
            "invalid allowed_origins wildcard: {entry} (only a leading *. is supported)"
        )));
    } else {
        HostMatch::Exact(parsed.host)
    };

    Ok(OriginRule {
        scheme: parsed.scheme,
        host,
        port: parsed.port,
    })
}
