//! framehub widget client SDK.
//!
//! The library linked into frame-side widget code: wraps outbound envelope
//! construction and inbound response correlation behind named calls. This
//! is the only legitimate way embedded content reaches the host. It
//! depends on `framehub-core` alone, never on the host runtime.
//!
//! Like the core crate, panics are compile-denied: widget code runs inside
//! third-party pages and must degrade to errors, not crashes.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

mod calls;
mod client;

pub use client::{HostLink, WidgetClient, WidgetClientConfig, WidgetEvents};
