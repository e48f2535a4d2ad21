//! Session types and the bootstrap state machine.

pub mod bootstrap;

use std::fmt;

pub use bootstrap::{
    BootstrapOutcome, EnvironmentState, FatalReason, SessionBootstrapper, SsoKeepalive,
};

/// The established `(token, user)` pair gating all protocol activity.
/// Written once per page lifetime; replacement only happens via a full
/// reload re-running bootstrap.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
}

// The bearer token never lands in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
