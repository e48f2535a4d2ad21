//! framehub core: the cross-frame wire protocol, command vocabulary, and
//! error surface shared by the host runtime and the widget client SDK.
//!
//! This crate defines what travels over the channel between a portal host
//! and its embedded frames. It intentionally carries no transport or runtime
//! dependencies so both sides of the channel (and test harnesses) can reuse
//! it without dragging in an executor.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every envelope that arrives over the channel was authored by third-party
//! widget code; all fallible paths must surface as `FrameHubError`/`Result`
//! instead of crashing the host page.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod origin;
pub mod protocol;

/// Shared result type.
pub use error::{FrameHubError, Result};
pub use origin::Origin;
pub use protocol::envelope::Envelope;
