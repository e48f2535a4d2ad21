//! Host identity RPCs, answered straight from config. The request payload
//! carries the caller's `guid` for wire compatibility, but delivery uses
//! the sending frame's handle, so the guid is not inspected here.

use async_trait::async_trait;

use framehub_core::error::Result;
use framehub_core::protocol::commands::{events, ApiBaseUrlResponse, HostNameResponse};
use framehub_core::Envelope;

use crate::dispatch::{CommandCtx, CommandHandler};

/// `gethostname` -> `gethost.response`.
pub struct GetHostName {
    hostname: String,
}

impl GetHostName {
    pub fn new(hostname: String) -> Self {
        Self { hostname }
    }
}

#[async_trait]
impl CommandHandler for GetHostName {
    fn event(&self) -> &'static str {
        events::GET_HOSTNAME
    }

    async fn handle(&self, ctx: CommandCtx, _env: Envelope) -> Result<()> {
        ctx.reply(
            events::GET_HOST_RESPONSE,
            &HostNameResponse {
                hostname: self.hostname.clone(),
            },
        )
    }
}

/// `getapibaseurl` -> `getapibaseurl.response`.
pub struct GetApiBaseUrl {
    baseurl: String,
}

impl GetApiBaseUrl {
    pub fn new(baseurl: String) -> Self {
        Self { baseurl }
    }
}

#[async_trait]
impl CommandHandler for GetApiBaseUrl {
    fn event(&self) -> &'static str {
        events::GET_API_BASE_URL
    }

    async fn handle(&self, ctx: CommandCtx, _env: Envelope) -> Result<()> {
        ctx.reply(
            events::GET_API_BASE_URL_RESPONSE,
            &ApiBaseUrlResponse {
                baseurl: self.baseurl.clone(),
            },
        )
    }
}
