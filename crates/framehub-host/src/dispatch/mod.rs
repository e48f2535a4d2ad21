//! Command dispatch: the static handler table and the router pump.

pub mod router;

pub use router::{CommandCtx, CommandHandler, CommandRouter, CommandTable};
