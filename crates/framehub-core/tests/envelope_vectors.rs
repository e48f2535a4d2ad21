//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use framehub_core::error::ErrorCode;
use framehub_core::Envelope;

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_envelope_min() {
    let env = Envelope::parse(&load("envelope_min.json")).unwrap();
    assert_eq!(env.event, "alerts.clear");
    assert!(env.txn.is_none());
    assert!(env.fields.is_empty());
}

#[test]
fn parse_envelope_full() {
    let env = Envelope::parse(&load("envelope_full.json")).unwrap();
    assert_eq!(env.event, "widget.resize");
    assert_eq!(env.txn.as_deref(), Some("txn-1"));
    assert_eq!(env.field("guid").and_then(|v| v.as_str()), Some("w-42"));
    assert_eq!(env.field("width").and_then(|v| v.as_u64()), Some(4));
    assert_eq!(env.field("height").and_then(|v| v.as_u64()), Some(2));
}

#[test]
fn unknown_event_still_parses() {
    // An unrecognized event is a router concern, not a parse failure.
    let env = Envelope::parse(&load("envelope_unknown_event.json")).unwrap();
    assert_eq!(env.event, "fancy.newthing");
    assert!(env.field("payload").is_some());
}

#[test]
fn missing_event_is_bad_envelope() {
    let err = Envelope::parse(&load("envelope_missing_event.json")).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::BadEnvelope);
}

#[test]
fn non_object_is_bad_envelope() {
    let err = Envelope::parse(&load("envelope_not_object.json")).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::BadEnvelope);
}

#[test]
fn garbage_is_bad_envelope() {
    let err = Envelope::parse("not json at all {{{").expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::BadEnvelope);
}

#[test]
fn round_trip_preserves_payload_and_txn() {
    let env = Envelope::new("toast")
        .with_txn("txn-9")
        .with("message", "saved")
        .with("timer", 4000);
    let text = env.to_text().unwrap();
    let back = Envelope::parse(&text).unwrap();
    assert_eq!(back.event, "toast");
    assert_eq!(back.txn.as_deref(), Some("txn-9"));
    assert_eq!(back.field("message").and_then(|v| v.as_str()), Some("saved"));
    assert_eq!(back.field("timer").and_then(|v| v.as_u64()), Some(4000));
}

#[test]
fn txn_absent_from_wire_when_unset() {
    let text = Envelope::new("alerts.clear").to_text().unwrap();
    assert!(!text.contains("txn"));
}
