//! Auth RPC handlers: token issuance and profile lookup, answered with a
//! correlated response envelope pushed back into the requesting frame.

use std::sync::Arc;

use async_trait::async_trait;

use framehub_core::error::Result;
use framehub_core::protocol::commands::{events, RpcRequest, UserReturned};
use framehub_core::Envelope;

use crate::collab::PortalBackend;
use crate::dispatch::{CommandCtx, CommandHandler};

/// `auth.generatetoken` -> `auth.tokengenerated`.
pub struct GenerateToken {
    backend: Arc<dyn PortalBackend>,
}

impl GenerateToken {
    pub fn new(backend: Arc<dyn PortalBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CommandHandler for GenerateToken {
    fn event(&self) -> &'static str {
        events::AUTH_GENERATE_TOKEN
    }

    async fn handle(&self, ctx: CommandCtx, env: Envelope) -> Result<()> {
        let req: RpcRequest = env.decode()?;
        let grant = self.backend.issue_widget_token(&req.guid).await?;
        ctx.reply(events::AUTH_TOKEN_GENERATED, &grant)
    }
}

/// `auth.getuser` -> `auth.userreturned`.
pub struct GetUser {
    backend: Arc<dyn PortalBackend>,
}

impl GetUser {
    pub fn new(backend: Arc<dyn PortalBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CommandHandler for GetUser {
    fn event(&self) -> &'static str {
        events::AUTH_GET_USER
    }

    async fn handle(&self, ctx: CommandCtx, env: Envelope) -> Result<()> {
        let req: RpcRequest = env.decode()?;
        let profile = self.backend.current_user(&req.guid).await?;
        ctx.reply(events::AUTH_USER_RETURNED, &UserReturned { profile })
    }
}
