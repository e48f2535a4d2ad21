//! Wire protocol: the envelope format and the command vocabulary.
//!
//! Everything on the channel is a UTF-8 JSON object tagged with an `event`
//! name. The vocabulary in [`commands`] is the public compatibility contract
//! with third-party widget authors: event names and payload field names are
//! frozen and must be preserved field-for-field.
//!
//! All parsers are panic-free: malformed input is reported as
//! `FrameHubError` so hostile or buggy frame traffic can never take down the
//! host page.

pub mod commands;
pub mod envelope;

pub use envelope::Envelope;
