//! Top-level facade crate for framehub.
//!
//! Re-exports the protocol core, the host runtime, and the widget client
//! SDK so embedders can depend on a single crate.

pub mod core {
    pub use framehub_core::*;
}

pub mod host {
    pub use framehub_host::*;
}

pub mod client {
    pub use framehub_client::*;
}
