//! framehub host runtime.
//!
//! This crate wires the frame registry, origin policy, command router,
//! session bootstrap, and heartbeat loop into the host side of the portal
//! messaging core. It is consumed by the embedding page (the `framehub`
//! facade binary in this workspace is a loopback embedder) and by
//! integration tests.

pub mod collab;
pub mod config;
pub mod dispatch;
pub mod frames;
pub mod handlers;
pub mod heartbeat;
pub mod policy;
pub mod session;
pub mod shell;
pub mod telemetry;
